use clap::{Parser, Subcommand};
use fanfolio::{
    config::SiteConfig,
    engine::Event,
    output::{build, render_snapshot, serve},
    site::{self, Site},
};
use std::{
    io::{self, Write},
    process::ExitCode,
    time::Instant,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fanfolio", version, about = "Renders a fanned-out portfolio website")]
struct Cli {
    /// Site configuration
    #[arg(long, default_value = "fanfolio.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the website to the output directory (default)
    Build,
    /// Serve the website from memory
    Serve {
        /// Overrides `serve_address`
        #[arg(long)]
        address: Option<String>,
    },
    /// Replay interactions and print the resulting page
    Render {
        /// Initial fragment, e.g. `#portfolio2`
        #[arg(long, default_value = "")]
        fragment: String,
        /// Navbar positions to activate, in order
        #[arg(long)]
        nav: Vec<usize>,
        /// Click the portrait afterwards
        #[arg(long)]
        unfurl: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let start = Instant::now();

    let config = match SiteConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let document = match site::load(&config.data) {
        Ok(document) => document,
        Err(e) => {
            error!("Error loading data: {e}");
            return ExitCode::FAILURE;
        }
    };

    let site = Site { config, document };

    info!(
        "({:.1}s) Loaded {} with {} navbar entries",
        start.elapsed().as_secs_f32(),
        site.config.data,
        site.document.navbar.len(),
    );

    let result = match cli.command.unwrap_or(Command::Build) {
        Command::Build => build(start, &site, &site.output()),
        Command::Serve { address } => {
            let address = address.unwrap_or_else(|| site.config.serve_address.clone());
            serve(start, &address, &site.output())
        }
        Command::Render {
            fragment,
            nav,
            unfurl,
        } => render(&site, &fragment, &nav, unfurl),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn render(site: &Site, fragment: &str, nav: &[usize], unfurl: bool) -> io::Result<()> {
    let mut controller = site
        .controller(fragment)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    for index in nav {
        controller.dispatch(Event::NavActivated(*index));
    }
    if unfurl {
        if let Some(portrait) = controller.portrait() {
            controller.dispatch(Event::Click(portrait));
        }
    }

    let canonical = match &controller.state().page {
        Some(id) => site.config.page_html::<true>(id),
        None => site.config.index_html::<true>(),
    };
    let html = render_snapshot(site, &controller, canonical);
    io::stdout().lock().write_all(&html)
}
