//! HTML listing page parser
//!
//! Some collections are only published as rendered HTML listings. This
//! module extracts:
//! - Pagination metadata from the `.pagination` element
//! - The next page identifier (`data-next`, or the `page` query parameter of
//!   a `rel="next"` link)
//! - One item per `.bookmark` element

use crate::model::{Item, PageId, PageMeta, PageResponse};
use crate::parse::{check_meta, PageParser};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parses rendered HTML listing pages
///
/// # Expected Markup
///
/// ```html
/// <link rel="next" href="?page=2">
/// <div class="pagination" data-page="1" data-total-pages="3" data-total-elements="5"></div>
/// <li class="bookmark" data-id="17">
///   <a href="https://rust-lang.org">Rust</a>
///   <p class="description">The Rust language</p>
///   <span class="tag">lang</span>
/// </li>
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlPageParser;

impl PageParser for HtmlPageParser {
    fn parse(&self, raw: &str) -> Result<PageResponse, String> {
        let document = Html::parse_document(raw);

        let page_meta = extract_meta(&document)?;
        let items = extract_items(&document)?;

        let response = PageResponse { page_meta, items };
        check_meta(&response)?;
        Ok(response)
    }
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))
}

/// Extracts pagination metadata
fn extract_meta(document: &Html) -> Result<PageMeta, String> {
    let pagination_selector = selector(".pagination")?;
    let pagination = document
        .select(&pagination_selector)
        .next()
        .ok_or_else(|| "missing .pagination element".to_string())?;

    let number = numeric_attr(&pagination, "data-page")?;
    let total = numeric_attr(&pagination, "data-total-pages")?;
    let total_elements = numeric_attr(&pagination, "data-total-elements")?;

    let next = match pagination.value().attr("data-next").map(str::trim) {
        Some(next) if !next.is_empty() => Some(PageId::new(next)),
        _ => extract_next_link(document)?,
    };

    Ok(PageMeta {
        number,
        total,
        total_elements,
        next,
    })
}

fn numeric_attr<T: std::str::FromStr>(element: &ElementRef, name: &str) -> Result<T, String> {
    let value = element
        .value()
        .attr(name)
        .ok_or_else(|| format!("pagination is missing {}", name))?;

    value
        .trim()
        .parse()
        .map_err(|_| format!("{} is not a number: '{}'", name, value))
}

/// Reads the `page` query parameter from a `rel="next"` link
fn extract_next_link(document: &Html) -> Result<Option<PageId>, String> {
    let next_selector = selector("link[rel='next'][href], a[rel='next'][href]")?;

    let Some(href) = document
        .select(&next_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
    else {
        return Ok(None);
    };

    // Relative hrefs only need a base for query parsing
    let base = Url::parse("http://localhost/").map_err(|e| e.to_string())?;
    let resolved = base
        .join(href.trim())
        .map_err(|e| format!("invalid next link '{}': {}", href, e))?;

    let page = resolved
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| PageId::new(value.into_owned()))
        .ok_or_else(|| format!("next link '{}' has no page parameter", href))?;

    Ok(Some(page))
}

/// Extracts all bookmarks in document order
fn extract_items(document: &Html) -> Result<Vec<Item>, String> {
    let bookmark_selector = selector(".bookmark")?;
    let link_selector = selector("a[href]")?;
    let description_selector = selector(".description")?;
    let tag_selector = selector(".tag")?;

    let mut items = Vec::new();

    for bookmark in document.select(&bookmark_selector) {
        let id = bookmark
            .value()
            .attr("data-id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "bookmark is missing data-id".to_string())?;

        let link = bookmark
            .select(&link_selector)
            .next()
            .ok_or_else(|| format!("bookmark {} has no link", id))?;

        let url = link.value().attr("href").unwrap_or_default().trim();
        let title = element_text(&link);

        let mut item = Item::new(id, title, url);
        item.description = bookmark
            .select(&description_selector)
            .next()
            .map(|element| element_text(&element))
            .filter(|s| !s.is_empty());
        item.tags = bookmark
            .select(&tag_selector)
            .map(|element| element_text(&element))
            .filter(|s| !s.is_empty())
            .collect();

        items.push(item);
    }

    Ok(items)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
