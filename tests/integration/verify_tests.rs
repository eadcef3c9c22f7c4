//! Reachability checks against mock sites

use crate::common::mount_link;
use shiori_harvest::model::Item;
use shiori_harvest::progress::NullProgress;
use shiori_harvest::verify::{
    HttpReachabilityChecker, ReachabilityChecker, UrlCheck, VerificationPipeline,
};
use shiori_harvest::ValidityOutcome;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn checker() -> HttpReachabilityChecker {
    HttpReachabilityChecker::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_reachable_link() {
    let server = MockServer::start().await;
    mount_link(&server, "ok", 200).await;

    let outcome = checker()
        .check(&format!("{}/links/ok", server.uri()))
        .await
        .unwrap();
    assert_eq!(outcome, ValidityOutcome::Reachable);
}

#[tokio::test]
async fn test_dead_link() {
    let server = MockServer::start().await;
    mount_link(&server, "gone", 404).await;

    let outcome = checker()
        .check(&format!("{}/links/gone", server.uri()))
        .await
        .unwrap();
    assert_eq!(outcome, ValidityOutcome::unreachable(Some(404), "Dead link"));
}

#[tokio::test]
async fn test_head_rejected_falls_back_to_get() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/links/nohead"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/links/nohead"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = checker()
        .check(&format!("{}/links/nohead", server.uri()))
        .await
        .unwrap();
    assert_eq!(outcome, ValidityOutcome::Reachable);
}

#[tokio::test]
async fn test_unsupported_scheme_is_an_error() {
    assert!(checker().check("ftp://files.example/a").await.is_err());
}

#[tokio::test]
async fn test_slow_link_recorded_as_error() {
    let server = MockServer::start().await;

    Mock::given(path("/links/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let check = UrlCheck::new(Arc::new(checker()), Duration::from_millis(100));
    let pipeline = VerificationPipeline::new().with_check(Arc::new(check));

    let mut items = vec![
        Item::new("1", "Slow", format!("{}/links/slow", server.uri())),
        Item::new("2", "Broken", "not a url"),
    ];
    let summary = pipeline.verify(&mut items, &NullProgress).await;

    assert_eq!(summary.items, 2);
    assert_eq!(summary.errors, 2);
    assert!(items.iter().all(|item| item.validity_of("url").unwrap().is_error()));
}
