use crate::site::PageId;

/// The externally observable routing state: the URL fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    fragment: String,
}

impl Location {
    /// `fragment` may include the leading `#`.
    pub fn new(fragment: &str) -> Self {
        Self {
            fragment: fragment.strip_prefix('#').unwrap_or(fragment).to_owned(),
        }
    }

    /// Without the leading `#`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns whether the fragment changed.
    pub fn set_fragment(&mut self, id: &PageId) -> bool {
        if self.fragment == id.as_str() {
            false
        } else {
            self.fragment = id.as_str().to_owned();
            true
        }
    }
}

/// Picks the active page from the fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub default_page: PageId,
}

impl Navigation {
    pub fn new(default_page: PageId) -> Self {
        Self { default_page }
    }

    pub fn resolve(&self, fragment: &str) -> PageId {
        PageId::from_fragment(fragment).unwrap_or_else(|| self.default_page.clone())
    }

    pub fn resolve_location(&self, location: &Location) -> PageId {
        self.resolve(location.fragment())
    }
}
