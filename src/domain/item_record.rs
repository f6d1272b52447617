use serde::{Deserialize, Serialize};

/// One collected listing entry, normalized to the five output columns.
///
/// Every field is independently nullable. A record is never mutated after it
/// has been built; [`ItemRecord::with_detail`] consumes the listing-stage
/// record and yields the completed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItemRecord {
    title: Option<String>,
    #[serde(rename = "image link")]
    image_link: Option<String>,
    url: Option<String>,
    brand: Option<String>,
    description: Option<String>,
}

/// Secondary fields that only a detail page can provide
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailFields {
    pub brand: Option<String>,
    pub description: Option<String>,
}

impl DetailFields {
    pub fn new(brand: Option<String>, description: Option<String>) -> Self {
        Self { brand, description }
    }

    /// Both fields absent; used when a detail page cannot be fetched or parsed
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.brand.is_none() && self.description.is_none()
    }
}

impl ItemRecord {
    /// Build the listing-stage record. Brand and description stay null until
    /// the detail page has been visited.
    pub fn from_listing(
        title: Option<String>,
        image_link: Option<String>,
        url: Option<String>,
    ) -> Self {
        Self {
            title,
            image_link,
            url,
            brand: None,
            description: None,
        }
    }

    /// Build a record with all five fields at once
    pub fn new(
        title: Option<String>,
        image_link: Option<String>,
        url: Option<String>,
        brand: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            title,
            image_link,
            url,
            brand,
            description,
        }
    }

    /// Merge detail-page fields into a listing-stage record
    #[must_use]
    pub fn with_detail(self, detail: DetailFields) -> Self {
        Self {
            brand: detail.brand,
            description: detail.description,
            ..self
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn image_link(&self) -> Option<&str> {
        self.image_link.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
