use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which catalog a walker traverses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Server-rendered catalog with discoverable "next" links
    Static,
    /// Client-rendered catalog walked through a controlled browser
    Browser,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Browser => "browser",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
