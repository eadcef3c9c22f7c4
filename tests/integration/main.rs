//! Integration tests for Shiori-Harvest
//!
//! These tests use wiremock to stand in for the collection API and the
//! bookmarked sites, and exercise the harvest end to end.

mod common;
mod harvest_tests;
mod verify_tests;
