use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Key of one content set in the site document.
///
/// Deserialized ids double as output directory names, so they are checked
/// with [`PageId::check`].
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PageId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid page id {0:?}: must be non-empty and can't contain '/', '\\' or \"..\"")]
pub struct InvalidPageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Strips one leading `#`. Returns `None` if nothing remains.
    ///
    /// Used both for URL fragments and for navbar links.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_fragment(&self) -> String {
        format!("#{}", self.0)
    }

    /// Accepts ids that name exactly one directory level.
    pub fn check(id: String) -> Result<Self, InvalidPageId> {
        if id.is_empty() || id == "." || id.contains(['/', '\\']) || id.contains("..") {
            Err(InvalidPageId(id))
        } else {
            Ok(Self(id))
        }
    }
}

impl TryFrom<String> for PageId {
    type Error = InvalidPageId;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::check(id)
    }
}

impl From<PageId> for String {
    fn from(id: PageId) -> Self {
        id.0
    }
}

impl Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::PageId;

    #[test]
    fn strips_single_marker() {
        assert_eq!(PageId::from_fragment("#portfolio1"), Some(PageId::new("portfolio1")));
        assert_eq!(PageId::from_fragment("portfolio1"), Some(PageId::new("portfolio1")));
        assert_eq!(PageId::from_fragment("##x"), Some(PageId::new("#x")));
    }

    #[test]
    fn path_like_ids_are_rejected() {
        for id in ["", ".", "..", "../x", "a/b", "/abs", "a\\b", "x..y"] {
            assert!(PageId::check(id.to_owned()).is_err(), "{id:?}");
        }
        assert_eq!(PageId::check("portfolio-2.old".to_owned()), Ok(PageId::new("portfolio-2.old")));

        let err = serde_json::from_str::<PageId>(r#""../escaped""#).unwrap_err();
        assert!(err.to_string().contains("invalid page id \"../escaped\""), "{err}");
        assert_eq!(serde_json::to_string(&PageId::new("creator")).unwrap(), r#""creator""#);
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(PageId::from_fragment(""), None);
        assert_eq!(PageId::from_fragment("#"), None);
    }
}
