//! Two-step media publisher for a Graph-style API
//!
//! A row is posted by creating a media container from its image and
//! caption, waiting, then publishing that container. Each step must answer
//! with an `id`; anything else is an error carrying the response body.

use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{ConsolidatedTable, ItemRecord};
use crate::infrastructure::config::{PublishingConfig, RowSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    CreateContainer,
    Publish,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateContainer => write!(f, "container creation"),
            Self::Publish => write!(f, "publishing"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Publishing is not configured: {0} is empty")]
    NotConfigured(&'static str),

    #[error("Row has no {0}")]
    MissingField(&'static str),

    #[error("No row at index {index} (table has {len} rows)")]
    NoSuchRow { index: usize, len: usize },

    #[error("HTTP client setup failed: {0}")]
    Setup(#[source] reqwest::Error),

    #[error("Request failed during {stage}: {source}")]
    Transport {
        stage: PublishStage,
        #[source]
        source: reqwest::Error,
    },

    #[error("No id returned during {stage}: {body}")]
    Api { stage: PublishStage, body: Value },
}

/// Ids returned by a successful post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub creation_id: String,
    pub media_id: String,
}

/// Listing images are often protocol-relative (`//cdn...`)
pub fn normalize_image_url(link: &str) -> String {
    let link = link.trim();
    if link.starts_with("//") {
        format!("https:{link}")
    } else {
        link.to_string()
    }
}

/// Pick the row to post
pub fn select_row(
    table: &ConsolidatedTable,
    selection: RowSelection,
) -> Result<&ItemRecord, PublishError> {
    let len = table.len();
    let index = match selection {
        RowSelection::First => 0,
        RowSelection::Index(index) => index,
        RowSelection::Random if len > 0 => fastrand::usize(..len),
        RowSelection::Random => 0,
    };
    table.get(index).ok_or(PublishError::NoSuchRow { index, len })
}

/// The image URL and caption a row is posted with
pub fn post_content(record: &ItemRecord) -> Result<(String, String), PublishError> {
    let image = record
        .image_link()
        .filter(|link| !link.trim().is_empty())
        .ok_or(PublishError::MissingField("image link"))?;
    let caption = record
        .title()
        .filter(|title| !title.trim().is_empty())
        .ok_or(PublishError::MissingField("title"))?;
    Ok((normalize_image_url(image), caption.to_string()))
}

fn extract_id(stage: PublishStage, body: Value) -> Result<String, PublishError> {
    let id = match body.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };
    id.ok_or(PublishError::Api { stage, body })
}

pub struct GraphPublisher {
    client: Client,
    config: PublishingConfig,
}

impl GraphPublisher {
    pub fn new(config: PublishingConfig) -> Result<Self, PublishError> {
        if config.account_id.trim().is_empty() {
            return Err(PublishError::NotConfigured("account_id"));
        }
        if config.access_token.trim().is_empty() {
            return Err(PublishError::NotConfigured("access_token"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(PublishError::Setup)?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, edge: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.account_id,
            edge
        )
    }

    async fn post_form(
        &self,
        stage: PublishStage,
        edge: &str,
        form: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let body: Value = self
            .client
            .post(self.endpoint(edge))
            .form(form)
            .send()
            .await
            .map_err(|source| PublishError::Transport { stage, source })?
            .json()
            .await
            .map_err(|source| PublishError::Transport { stage, source })?;

        debug!("{} response: {}", stage, body);
        extract_id(stage, body)
    }

    /// Create a media container; returns its creation id
    pub async fn create_container(
        &self,
        image_url: &str,
        caption: &str,
    ) -> Result<String, PublishError> {
        self.post_form(
            PublishStage::CreateContainer,
            "media",
            &[
                ("image_url", image_url),
                ("caption", caption),
                ("access_token", self.config.access_token.as_str()),
            ],
        )
        .await
    }

    /// Publish a previously created container; returns the media id
    pub async fn publish_container(&self, creation_id: &str) -> Result<String, PublishError> {
        self.post_form(
            PublishStage::Publish,
            "media_publish",
            &[
                ("creation_id", creation_id),
                ("access_token", self.config.access_token.as_str()),
            ],
        )
        .await
    }

    /// Post one row: create, wait, publish
    pub async fn post_record(&self, record: &ItemRecord) -> Result<PublishedPost, PublishError> {
        let (image_url, caption) = post_content(record)?;

        let creation_id = self.create_container(&image_url, &caption).await?;
        info!("📦 Media container created: {}", creation_id);

        tokio::time::sleep(Duration::from_millis(self.config.publish_delay_ms)).await;

        let media_id = self.publish_container(&creation_id).await?;
        info!("📣 Published media: {}", media_id);

        Ok(PublishedPost {
            creation_id,
            media_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn table() -> ConsolidatedTable {
        ConsolidatedTable::from(vec![
            ItemRecord::new(
                Some("Book A".into()),
                Some("//cdn.example.com/a.jpg".into()),
                None,
                None,
                Some("First".into()),
            ),
            ItemRecord::new(Some("Book B".into()), None, None, None, None),
        ])
    }

    #[rstest]
    #[case("//cdn.example.com/a.jpg", "https://cdn.example.com/a.jpg")]
    #[case("https://cdn.example.com/a.jpg", "https://cdn.example.com/a.jpg")]
    #[case(" //cdn.example.com/a.jpg ", "https://cdn.example.com/a.jpg")]
    fn image_urls_are_absolute(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_image_url(input), expected);
    }

    #[test]
    fn first_and_indexed_selection() {
        let table = table();
        assert_eq!(
            select_row(&table, RowSelection::First).unwrap().title(),
            Some("Book A")
        );
        assert_eq!(
            select_row(&table, RowSelection::Index(1)).unwrap().title(),
            Some("Book B")
        );
        assert!(matches!(
            select_row(&table, RowSelection::Index(2)),
            Err(PublishError::NoSuchRow { index: 2, len: 2 })
        ));
    }

    #[test]
    fn random_selection_stays_in_bounds() {
        let table = table();
        for _ in 0..20 {
            assert!(select_row(&table, RowSelection::Random).is_ok());
        }
        assert!(select_row(&ConsolidatedTable::default(), RowSelection::Random).is_err());
    }

    #[test]
    fn row_without_image_cannot_be_posted() {
        let table = table();
        let row = table.get(1).unwrap();
        assert!(matches!(
            post_content(row),
            Err(PublishError::MissingField("image link"))
        ));
    }

    #[test]
    fn title_is_the_caption() {
        let table = table();
        let (image, caption) = post_content(table.get(0).unwrap()).unwrap();
        assert_eq!(image, "https://cdn.example.com/a.jpg");
        assert_eq!(caption, "Book A");
    }

    #[test]
    fn row_without_title_cannot_be_posted() {
        let record = ItemRecord::new(None, Some("//x/y.jpg".into()), None, None, None);
        assert!(matches!(
            post_content(&record),
            Err(PublishError::MissingField("title"))
        ));
    }

    #[test]
    fn id_is_required_in_response() {
        assert_eq!(
            extract_id(PublishStage::Publish, json!({"id": "1789"})).unwrap(),
            "1789"
        );
        assert_eq!(
            extract_id(PublishStage::Publish, json!({"id": 42})).unwrap(),
            "42"
        );

        let err = extract_id(
            PublishStage::CreateContainer,
            json!({"error": {"message": "Invalid OAuth access token"}}),
        )
        .unwrap_err();
        match err {
            PublishError::Api { stage, body } => {
                assert_eq!(stage, PublishStage::CreateContainer);
                assert!(body.get("error").is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn credentials_are_required() {
        let config = PublishingConfig::default();
        assert!(matches!(
            GraphPublisher::new(config),
            Err(PublishError::NotConfigured(_))
        ));
    }

    #[test]
    fn endpoints_join_account_and_edge() {
        let publisher = GraphPublisher::new(PublishingConfig {
            api_base_url: "https://graph.example.com/v19.0/".into(),
            account_id: "17841".into(),
            access_token: "token".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            publisher.endpoint("media_publish"),
            "https://graph.example.com/v19.0/17841/media_publish"
        );
    }
}
