use crate::{
    dom::{LayoutHost, Viewport},
    engine::{page_label, reachable_pages, Controller, Location, RenderError},
    site::{PageId, Site},
};
use sitemap_rs::{
    url::{ChangeFrequency, Url},
    url_builder::UrlBuilder,
    url_set::UrlSet,
};
use std::{collections::HashMap, sync::LazyLock};
use tracing::error;
use yew::{html, Html};

mod app;
mod build;
mod dom_html;
mod serve;
mod static_page;

pub use app::*;
pub use build::*;
pub use dom_html::*;
pub use serve::*;
pub use static_page::*;

pub type DynLazy<'a, T> = LazyLock<T, Box<dyn FnOnce() -> T + Send + Sync + 'a>>;

fn ret_insert<'a>(
    ret: &mut HashMap<String, DynLazy<'a, Vec<u8>>>,
    path: String,
    file: DynLazy<'a, Vec<u8>>,
) {
    if ret.insert(path.clone(), file).is_some() {
        error!("duplicate output {path}");
    }
}

impl Site {
    /// Every file of the website, rendered on first access.
    pub fn output(&self) -> HashMap<String, DynLazy<'_, Vec<u8>>> {
        let config = &self.config;
        let options = config.engine_options();
        let mut ret = HashMap::<String, DynLazy<'_, Vec<u8>>>::new();
        let mut sitemap = Vec::<Url>::new();

        let mut add_to_sitemap = |canonical: &str| {
            if let Some(root) = &config.root_url {
                match UrlBuilder::new(format!("{root}{canonical}"))
                    .change_frequency(ChangeFrequency::Monthly)
                    .build()
                {
                    Ok(url) => sitemap.push(url),
                    Err(e) => error!("sitemap entry {canonical}: {e:?}"),
                }
            }
        };

        add_to_sitemap(&config.index_html::<true>());
        ret_insert(
            &mut ret,
            config.index_html::<false>(),
            LazyLock::new(Box::new(move || {
                render_file(self, "", config.index_html::<true>())
            })),
        );

        for id in reachable_pages(&self.document, &options) {
            let canonical = config.page_html::<true>(&id);
            add_to_sitemap(&canonical);
            ret_insert(
                &mut ret,
                config.page_html::<false>(&id),
                LazyLock::new(Box::new(move || render_file(self, id.as_str(), canonical))),
            );
        }

        ret_insert(
            &mut ret,
            "/data.json".to_owned(),
            LazyLock::new(Box::new(move || {
                serde_json::to_vec_pretty(&self.document).unwrap_or_else(|e| {
                    error!("couldn't serialize data.json: {e}");
                    Vec::new()
                })
            })),
        );

        let mut robots_txt = String::from("User-agent: *\nAllow: /\n");
        if let Some(root) = &config.root_url {
            robots_txt.push_str(&format!("Sitemap: {root}/sitemap.xml\n"));
        }
        ret_insert(
            &mut ret,
            "/robots.txt".to_owned(),
            LazyLock::new(Box::new(move || robots_txt.into_bytes())),
        );

        if config.root_url.is_some() {
            match UrlSet::new(sitemap) {
                Ok(sitemap) => ret_insert(
                    &mut ret,
                    "/sitemap.xml".to_owned(),
                    LazyLock::new(Box::new(move || {
                        let mut buf = Vec::<u8>::new();
                        if let Err(e) = sitemap.write(&mut buf) {
                            error!("couldn't write sitemap: {e:?}");
                        }
                        buf
                    })),
                ),
                Err(e) => error!("couldn't build sitemap: {e:?}"),
            }
        }

        ret
    }

    /// Starts the engine at `fragment` with the configured viewport.
    pub fn controller(&self, fragment: &str) -> Result<Controller<'_, Viewport>, RenderError> {
        Controller::start(
            &self.document,
            self.config.engine_options(),
            self.config.viewport.clone(),
            Location::new(fragment),
        )
    }
}

fn render_file(site: &Site, fragment: &str, canonical: String) -> Vec<u8> {
    match site.controller(fragment) {
        Ok(controller) => render_snapshot(site, &controller, canonical),
        Err(e) => {
            error!("couldn't render {canonical}: {e}");
            Vec::new()
        }
    }
}

/// Renders whatever `controller` currently shows as a standalone page.
pub fn render_snapshot<L: LayoutHost>(
    site: &Site,
    controller: &Controller<'_, L>,
    canonical: String,
) -> Vec<u8> {
    let config = &site.config;
    let page = static_page(controller, config);

    let title = controller
        .state()
        .page
        .as_ref()
        .and_then(|id: &PageId| page_label(&site.document, controller.options(), id))
        .map(|label| format!("{label} | {}", config.title))
        .unwrap_or_else(|| config.title.clone());

    let head = html! {<>
        if !page.stylesheet.is_empty() {
            {Html::from_html_unchecked(format!("<style>\n{}</style>", page.stylesheet).into())}
        }
        if let Some(script) = &page.script {
            {Html::from_html_unchecked(format!("<script>\n{script}</script>").into())}
        }
    </>};

    render_html(AppProps {
        config,
        canonical,
        title: title.into(),
        head,
        body: children_html(&page.document, page.document.root()),
    })
}
