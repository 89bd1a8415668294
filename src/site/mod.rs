use crate::config::SiteConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod image;
mod load;
mod nav;
mod page;
mod page_id;

pub use image::*;
pub use load::*;
pub use nav::*;
pub use page::*;
pub use page_id::*;

/// Parsed `data.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSiteDocument")]
pub struct SiteDocument {
    pub navbar: Vec<NavEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portrait: Option<ImageRef>,
    #[serde(flatten)]
    pub content: Content,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// Multi-page document, addressed by fragment.
    Pages { pages: BTreeMap<PageId, PageContent> },
    /// Flat `portfolio` + `about`.
    Single(PageContent),
}

/// Both shapes at once, so a malformed `pages` fails instead of
/// falling through to an empty flat document.
#[derive(Deserialize)]
struct RawSiteDocument {
    #[serde(default)]
    navbar: Vec<NavEntry>,
    #[serde(default)]
    portrait: Option<ImageRef>,
    #[serde(default)]
    pages: Option<BTreeMap<PageId, PageContent>>,
    #[serde(default)]
    portfolio: Vec<ImageRef>,
    #[serde(default)]
    about: Option<About>,
}

impl From<RawSiteDocument> for SiteDocument {
    fn from(raw: RawSiteDocument) -> Self {
        let content = match raw.pages {
            Some(pages) => Content::Pages { pages },
            None => Content::Single(PageContent {
                portfolio: raw.portfolio,
                about: raw.about,
            }),
        };
        Self {
            navbar: raw.navbar,
            portrait: raw.portrait,
            content,
        }
    }
}

impl SiteDocument {
    pub fn page(&self, id: &PageId) -> Option<&PageContent> {
        match &self.content {
            Content::Pages { pages } => pages.get(id),
            Content::Single(_) => None,
        }
    }

    pub fn page_ids(&self) -> impl Iterator<Item = &PageId> + '_ {
        let pages = match &self.content {
            Content::Pages { pages } => Some(pages.keys()),
            Content::Single(_) => None,
        };
        pages.into_iter().flatten()
    }

    /// The single list index-addressed navigation filters.
    ///
    /// For a multi-page document, this is the page named `fallback`.
    pub fn flat_content(&self, fallback: &PageId) -> Option<&PageContent> {
        match &self.content {
            Content::Pages { pages } => pages.get(fallback),
            Content::Single(content) => Some(content),
        }
    }

    /// Label of the first navbar entry linking to `id`.
    pub fn nav_label(&self, id: &PageId) -> Option<&str> {
        self.navbar
            .iter()
            .find(|entry| entry.page_id().as_ref() == Some(id))
            .map(|entry| entry.text.as_str())
    }
}

/// Everything needed to render the website.
#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    pub document: SiteDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_page_shape() {
        let document: SiteDocument = serde_json::from_str(
            r##"{
                "navbar": [{"text": "Work", "link": "#portfolio1"}],
                "portrait": {"src": "me.jpg", "alt": "Me"},
                "pages": {
                    "portfolio1": {"portfolio": [{"src": "a.jpg", "alt": "A", "link": "https://a"}]},
                    "creator": {"about": {"text": "Hello"}}
                }
            }"##,
        )
        .unwrap();

        assert_eq!(document.page_ids().count(), 2);
        let portfolio = document.page(&"portfolio1".into()).unwrap();
        assert_eq!(portfolio.portfolio[0].link.as_deref(), Some("https://a"));
        assert!(document.page(&"creator".into()).unwrap().is_text_only());
        assert_eq!(document.nav_label(&"portfolio1".into()), Some("Work"));
        assert!(document.page(&"missing".into()).is_none());
    }

    #[test]
    fn single_page_shape() {
        let document: SiteDocument = serde_json::from_str(
            r#"{
                "navbar": [],
                "portrait": {"src": "me.jpg", "alt": "Me"},
                "portfolio": [{"src": "a.jpg", "alt": "A"}, {"src": "b.jpg"}],
                "about": {"text": "About me"}
            }"#,
        )
        .unwrap();

        assert_eq!(document.page_ids().count(), 0);
        let content = document.flat_content(&"ignored".into()).unwrap();
        assert_eq!(content.portfolio.len(), 2);
        assert_eq!(content.portfolio[1].alt, "");
        assert_eq!(content.about_text(), Some("About me"));
    }

    #[test]
    fn malformed_pages_are_an_error() {
        let err = serde_json::from_str::<SiteDocument>(
            r#"{"navbar": [], "pages": {"portfolio1": {"portfolio": "oops"}}}"#,
        )
        .unwrap_err();
        assert!(err.is_data(), "{err}");

        assert!(serde_json::from_str::<SiteDocument>(r#"{"pages": []}"#).is_err());
        assert!(serde_json::from_str::<SiteDocument>(r#"{"portfolio": {}}"#).is_err());
    }

    #[test]
    fn path_like_page_ids_are_an_error() {
        for id in ["../escaped", "/abs", "a\\\\b", ""] {
            let json = format!(r#"{{"pages": {{"{id}": {{"about": {{"text": "x"}}}}}}}}"#);
            let err = serde_json::from_str::<SiteDocument>(&json).unwrap_err();
            assert!(err.to_string().contains("invalid page id"), "{id:?}: {err}");
        }
    }

    #[test]
    fn serializes_like_it_parses() {
        let json = r#"{"navbar":[],"pages":{"a":{"portfolio":[{"src":"a.jpg","alt":""}]}}}"#;
        let document: SiteDocument = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&document).unwrap(), json);
    }

    #[test]
    fn empty_about_text_is_absent() {
        let content: PageContent =
            serde_json::from_str(r#"{"portfolio": [], "about": {"text": ""}}"#).unwrap();
        assert_eq!(content.about_text(), None);
        assert!(!content.is_text_only());
    }
}
