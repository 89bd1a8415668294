use crate::{
    dom::Viewport,
    engine::{AddressingMode, ContentFilter, EngineOptions, FanParams, UnfurlPolicy},
    site::PageId,
};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::info;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Path or `http://` URL of the site document.
    #[serde(default = "default_data")]
    pub data: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_title")]
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub root_url: Option<String>,
    #[serde(default = "default_page")]
    pub default_page: String,
    #[serde(default = "default_creator_page")]
    pub creator_page: Option<String>,
    #[serde(default)]
    pub addressing: AddressingMode,
    #[serde(default = "default_filters")]
    pub filters: Vec<ContentFilter>,
    #[serde(default)]
    pub unfurl: UnfurlPolicy,
    #[serde(default)]
    pub fan: FanParams,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_serve_address")]
    pub serve_address: String,
}

fn default_data() -> String {
    String::from("data.json")
}

fn default_output() -> String {
    String::from("./output")
}

fn default_title() -> String {
    "My Portfolio".to_owned()
}

fn default_page() -> String {
    "portfolio1".to_owned()
}

fn default_creator_page() -> Option<String> {
    Some("creator".to_owned())
}

fn default_filters() -> Vec<ContentFilter> {
    vec![ContentFilter::Natural, ContentFilter::Reversed]
}

fn default_serve_address() -> String {
    "0.0.0.0:8080".to_owned()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            output: default_output(),
            title: default_title(),
            author: None,
            description: None,
            root_url: None,
            default_page: default_page(),
            creator_page: default_creator_page(),
            addressing: AddressingMode::default(),
            filters: default_filters(),
            unfurl: UnfurlPolicy::default(),
            fan: FanParams::default(),
            viewport: Viewport::default(),
            serve_address: default_serve_address(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl SiteConfig {
    /// A missing file means all defaults.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("{path} not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            default_page: PageId::new(self.default_page.clone()),
            creator_page: self.creator_page.clone().map(PageId::new),
            addressing: self.addressing,
            filters: self.filters.clone(),
            unfurl: self.unfurl,
            fan: self.fan.clone(),
        }
    }

    pub fn subdirectory(&self, subdirectory: &str) -> String {
        Path::new(&self.output)
            .join(Path::new(subdirectory))
            .to_string_lossy()
            .into_owned()
    }

    /// Public path of a page's HTML, e.g. `/portfolio2/`.
    pub fn page_html<const PUBLIC: bool>(&self, id: &PageId) -> String {
        let base = format!("/{id}/");
        if PUBLIC {
            base
        } else {
            format!("{base}index.html")
        }
    }

    pub fn index_html<const PUBLIC: bool>(&self) -> String {
        if PUBLIC {
            "/".to_owned()
        } else {
            "/index.html".to_owned()
        }
    }
}
