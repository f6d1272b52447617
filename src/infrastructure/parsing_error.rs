//! Parsing error types for HTML extraction
//!
//! Missing optional elements are never errors; they become null fields.
//! These variants cover input that cannot be processed at all.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("HTML parsing failed: {message}")]
    HtmlParsingFailed {
        message: String,
        url: Option<String>,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },
}

impl ParsingError {
    /// The document carried no markup at all
    pub fn empty_document(url: Option<&str>) -> Self {
        Self::HtmlParsingFailed {
            message: "document is empty".to_string(),
            url: url.map(ToString::to_string),
        }
    }

    /// Create an invalid selector error
    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// A URL that could not be parsed or joined; `base_url` is set when
    /// `url` was being resolved against it
    pub fn url_resolution(url: &str, reason: impl ToString, base_url: Option<&str>) -> Self {
        Self::UrlResolutionFailed {
            url: url.to_string(),
            reason: reason.to_string(),
            base_url: base_url.map(ToString::to_string),
        }
    }

    /// Attach the page URL to an HTML parsing failure, if it has none yet
    #[must_use]
    pub fn with_url(self, page_url: &str) -> Self {
        match self {
            Self::HtmlParsingFailed { message, url: None } => Self::HtmlParsingFailed {
                message,
                url: Some(page_url.to_string()),
            },
            other => other,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
