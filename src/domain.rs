//! Domain module - Core records produced by the collection pipeline
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod item_record;
pub mod consolidated_table;
pub mod source;

pub use consolidated_table::ConsolidatedTable;
pub use item_record::{DetailFields, ItemRecord};
pub use source::SourceKind;
