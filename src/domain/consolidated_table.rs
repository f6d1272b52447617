use serde::{Deserialize, Serialize};

use super::ItemRecord;

/// Ordered rows from every source, the artifact handed to persistence and
/// publishing. Position is the only identity a row has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsolidatedTable {
    rows: Vec<ItemRecord>,
}

impl ConsolidatedTable {
    pub fn new(rows: Vec<ItemRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ItemRecord> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[ItemRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemRecord> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<ItemRecord> {
        self.rows
    }
}

impl From<Vec<ItemRecord>> for ConsolidatedTable {
    fn from(rows: Vec<ItemRecord>) -> Self {
        Self::new(rows)
    }
}

impl<'a> IntoIterator for &'a ConsolidatedTable {
    type Item = &'a ItemRecord;
    type IntoIter = std::slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
