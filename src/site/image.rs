use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    /// Opened in a new browsing context when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}
