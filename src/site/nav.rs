use crate::site::PageId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavEntry {
    pub text: String,
    /// Page reference such as `#portfolio1`.
    #[serde(default)]
    pub link: String,
}

impl NavEntry {
    pub fn page_id(&self) -> Option<PageId> {
        PageId::from_fragment(&self.link)
    }
}
