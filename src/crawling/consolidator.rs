//! Merge per-source record sequences into the consolidated table

use tracing::info;

use crate::domain::{ConsolidatedTable, ItemRecord};
use crate::infrastructure::config::ConsolidationOrder;

/// Concatenate both sources in the configured order. Rows are neither
/// deduplicated nor reordered within a source.
pub fn consolidate(
    static_rows: Vec<ItemRecord>,
    browser_rows: Vec<ItemRecord>,
    order: ConsolidationOrder,
) -> ConsolidatedTable {
    let (static_count, browser_count) = (static_rows.len(), browser_rows.len());

    let (mut rows, tail) = match order {
        ConsolidationOrder::StaticFirst => (static_rows, browser_rows),
        ConsolidationOrder::BrowserFirst => (browser_rows, static_rows),
    };
    rows.extend(tail);

    info!(
        "Consolidated {} rows ({} static, {} browser, {:?})",
        rows.len(),
        static_count,
        browser_count,
        order
    );
    ConsolidatedTable::from(rows)
}
