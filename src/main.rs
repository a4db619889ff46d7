use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use folio::{FsLoader, PageComposer, PreviewEngine, ResourceLoader, SiteConfig, SiteContent, Visible};

#[derive(Parser)]
#[command(name = "folio", version, about = "Render and preview a single-page portfolio")]
struct Cli {
    /// JSON site configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON content file (defaults to the built-in site)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the HTML document
    Render {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the SHA-256 of the document instead of the document
        #[arg(long)]
        digest: bool,
        /// Footer year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Print title, anchors and card counts of the rendered page
    Snapshot,
    /// Resolve image resources and report which slots fall back
    Check {
        /// Directory serving site-absolute asset paths
        #[arg(long, conflicts_with = "base_url")]
        assets: Option<PathBuf>,
        /// Resolve images over HTTP against this URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Click a navigation control and report where the viewport lands
    Navigate { anchor: String },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_inputs(cli: &Cli) -> Result<(SiteConfig, SiteContent)> {
    let config = match &cli.config {
        Some(path) => SiteConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    let content = match &cli.content {
        Some(path) => SiteContent::from_path(path)
            .with_context(|| format!("loading content {}", path.display()))?,
        None => SiteContent::default(),
    };
    Ok((config, content))
}

fn preview(config: &SiteConfig, content: SiteContent) -> Result<PreviewEngine> {
    let html = folio::render_site(content, config);
    let mut engine = PreviewEngine::new(config.clone())?;
    engine.load_html(&html, "memory://index.html")?;
    Ok(engine)
}

fn loader_for(
    config: &SiteConfig,
    assets: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<Box<dyn ResourceLoader>> {
    if let Some(base) = base_url {
        #[cfg(feature = "http")]
        {
            return Ok(Box::new(folio::HttpLoader::new(config, &base)?));
        }
        #[cfg(not(feature = "http"))]
        {
            anyhow::bail!("--base-url {} requires the `http` feature", base);
        }
    }
    let root = assets.unwrap_or_else(|| config.asset_root.clone());
    Ok(Box::new(FsLoader::new(root)))
}

fn run(cli: Cli) -> Result<()> {
    let (config, content) = load_inputs(&cli)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Render { out: path, digest, year } => {
            let mut composer = PageComposer::new(content);
            if let Some(y) = year {
                composer = composer.with_year(y);
            }
            let html = composer.compose().render_document(&config);
            if digest {
                writeln!(out, "{}", folio::document_digest(&html))?;
            } else if let Some(path) = path {
                std::fs::write(&path, &html)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("wrote {} bytes to {}", html.len(), path.display());
            } else {
                writeln!(out, "{}", html)?;
            }
        }
        Command::Snapshot => {
            let snap = preview(&config, content)?.page_snapshot()?;
            writeln!(out, "Title: {}", snap.title)?;
            writeln!(out, "Anchors: {}", snap.anchors.join(", "))?;
            writeln!(out, "Sections: {}", snap.sections.join(", "))?;
            writeln!(out, "Projects ({}):", snap.projects.len())?;
            for p in &snap.projects {
                writeln!(out, "  - {} [{}]", p.title, p.tags.join(", "))?;
            }
            writeln!(out, "Technologies ({}): {}", snap.technologies.len(), snap.technologies.join(", "))?;
        }
        Command::Check { assets, base_url } => {
            let loader = loader_for(&config, assets, base_url)?;
            let mut engine = preview(&config, content)?;
            let events = engine.resolve_images(loader.as_ref())?;
            for slot in engine.page_snapshot()?.slots {
                let shown = match slot.visible {
                    Visible::Image => "image",
                    Visible::Placeholder => "placeholder",
                };
                writeln!(
                    out,
                    "slot {} {} -> {}",
                    slot.index,
                    slot.src.as_deref().unwrap_or("(none)"),
                    shown
                )?;
            }
            writeln!(out, "{} fallback(s) activated", events.len())?;
        }
        Command::Navigate { anchor } => {
            let mut engine = preview(&config, content)?;
            if engine.click(&anchor)? {
                engine.settle();
                writeln!(out, "#{} in view at y={}", anchor, engine.scroll_y())?;
            } else {
                writeln!(out, "no element with id {:?}; viewport unchanged", anchor)?;
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("folio: {:#}", e);
        std::process::exit(1);
    }
}
