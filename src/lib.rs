//! Catalog Harvester
//!
//! Collects product listings from two online catalogs, one server-rendered
//! and walked over plain HTTP, one client-rendered and walked through a
//! headless browser, and merges them into a single five-column table.

pub mod crawling;
pub mod domain;
pub mod infrastructure;
