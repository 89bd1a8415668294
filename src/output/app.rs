use crate::config::SiteConfig;
use yew::{function_component, html, AttrValue, Html, LocalServerRenderer, Properties};

pub struct AppProps<'a> {
    pub config: &'a SiteConfig,
    pub canonical: String,
    pub title: AttrValue,
    pub head: Html,
    pub body: Html,
}

pub fn app(props: AppProps<'_>) -> Html {
    let style = Html::from_html_unchecked(
        r#"
        html {
            font-size: calc(10px + 0.4vw);
        }

        body {
            margin: 0;
            background-color: white;
            color: #212529;
            font-family: "Helvetica Neue", "Lucida Grande", Arial, Helvetica, sans-serif;
        }

        .navbar {
            display: flex;
            flex-direction: row;
            align-items: center;
            padding: 1rem 2rem;
            background-color: #f8f9fa;
            border-bottom: 1px solid #dee2e6;
        }

        .btn {
            display: inline-block;
            padding: 0.375rem 0.75rem;
            font-size: 1rem;
            line-height: 1.5;
            border: 1px solid transparent;
            border-radius: 0.25rem;
            background-color: transparent;
            text-decoration: none;
            cursor: pointer;
        }

        .btn-outline-success {
            color: #28a745;
            border-color: #28a745;
        }

        .btn-outline-success:hover, .btn-outline-success[aria-current] {
            color: white;
            background-color: #28a745;
        }

        .mr-2 {
            margin-right: 0.5rem;
        }

        .my-container {
            width: 60rem;
            max-width: 100%;
            margin: 0 auto;
        }

        #main-body {
            min-height: 45rem;
        }

        .flexbox {
            display: flex;
            flex-wrap: wrap;
            align-items: flex-start;
        }

        #portrait {
            position: absolute;
            left: 2rem;
            width: 8rem;
            border-radius: 50%;
        }

        label[for="unfurl"] {
            cursor: pointer;
        }

        #portfolio-container > .img {
            position: absolute;
        }

        #portfolio-container .img {
            width: 14rem;
            height: auto;
            border: 0.4rem solid white;
            box-shadow: 0 0.2rem 0.6rem rgba(0, 0, 0, 0.3);
        }

        #unfurl {
            display: none;
        }

        #text {
            padding: 1rem 2rem;
            line-height: 1.5;
        }
    "#
        .into(),
    );

    html! {
        <html lang="en">
            <head>
                <meta charset="UTF-8"/>
                <title>{props.title.clone()}</title>
                <meta property="og:title" content={props.title.clone()}/>
                <meta property="og:site_name" content={props.config.title.clone()}/>
                if let Some(description) = props.config.description.clone() {
                    <meta name="description" content={description.clone()}/>
                    <meta property="og:description" content={description}/>
                }
                if let Some(author) = props.config.author.clone() {
                    <meta name="author" content={author}/>
                }
                <meta name="generator" content="fanfolio"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <meta property="og:type" content="website" />
                if let Some(root) = &props.config.root_url {
                    <link rel="canonical" href={format!("{root}{}", props.canonical)}/>
                    <meta property="og:url" content={format!("{root}{}", props.canonical)}/>
                }
                <style>{style}</style>
                {props.head.clone()}
            </head>
            <body>
                {props.body.clone()}
            </body>
        </html>
    }
}

pub fn render_html(props: AppProps<'_>) -> Vec<u8> {
    let html = app(props);

    #[derive(Properties, PartialEq)]
    struct InnerAppProps {
        html: Html,
    }

    #[function_component(InnerApp)]
    fn inner_app(props: &InnerAppProps) -> Html {
        props.html.clone()
    }

    let renderer =
        LocalServerRenderer::<InnerApp>::with_props(InnerAppProps { html }).hydratable(false);
    let html = futures::executor::block_on(renderer.render());

    let mut options = markup_fmt::config::FormatOptions::default();
    options.layout.use_tabs = true;
    options.layout.indent_width = 1;
    let mut html =
        markup_fmt::format_text(&html, markup_fmt::Language::Html, &options, |code, _| {
            Ok::<_, std::convert::Infallible>(code.into())
        })
        .unwrap_or(html);

    html.insert_str(0, "<!DOCTYPE html>\n");

    html = html
        .lines()
        .filter(|l| !l.chars().all(|c| c.is_whitespace()))
        .map(|l| format!("{l}\n"))
        .collect();

    html.into_bytes()
}
