use crate::site::ImageRef;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(default)]
    pub portfolio: Vec<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<About>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct About {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl PageContent {
    pub fn about_text(&self) -> Option<&str> {
        self.about
            .as_ref()
            .and_then(|about| about.text.as_deref())
            .filter(|text| !text.is_empty())
    }

    /// No images, only text.
    pub fn is_text_only(&self) -> bool {
        self.portfolio.is_empty() && self.about_text().is_some()
    }
}
