//! Folio
//!
//! Renders a single-page personal portfolio (hero, about with an embedded
//! video, project gallery, technology badges, contact) from static content,
//! and previews the result headlessly.
//!
//! # Features
//!
//! - **Declarative composition**: content records are mapped into cards and
//!   placed in fixed sections, preserving list order
//! - **Explicit image fallback**: every image slot is `Loaded` or `Failed`;
//!   the rendered output is chosen from that state
//! - **Headless preview**: load the markup, resolve images through a
//!   `ResourceLoader` and click navigation triggers without a browser
//!
//! # Example
//!
//! ```
//! use folio::{PageComposer, SiteConfig, SiteContent};
//!
//! let config = SiteConfig::default();
//! let page = PageComposer::new(SiteContent::default()).compose();
//! let html = page.render_document(&config);
//! assert!(html.contains(r#"<section id="projetos""#));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod card;
pub mod content;
pub mod embed;
pub mod error;
pub mod loader;
pub mod page;
pub mod preview;
pub mod rendering;
pub mod viewport;

pub use card::{CardRenderer, ImageSlot, ImageState, ProjectCard, SlotSize, TechBadge, Visible};
pub use content::{Icon, NavAnchor, Profile, ProjectRecord, SiteContent, TechEntry};
pub use error::{Error, Result};
pub use loader::{FsLoader, ResourceLoader};
#[cfg(feature = "http")]
pub use loader::HttpLoader;
pub use page::{ImageTarget, NavTrigger, Page, PageComposer, TriggerState};
pub use preview::{ImageEvent, PageSnapshot, PreviewEngine, SlotSnapshot, TextSnapshot};
pub use viewport::{ScrollBehavior, ScrollState, ScrollView, Viewport};

/// Configuration for rendering and previewing the site
///
/// The defaults match the published site: Portuguese markup, smooth
/// scrolling, static assets served from `public/`.
///
/// # Examples
///
/// ```
/// let cfg = folio::SiteConfig::default();
/// assert_eq!(cfg.lang, "pt-BR");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Document language attribute
    pub lang: String,
    /// Viewport used for layout and navigation
    pub viewport: Viewport,
    /// Scroll behavior of navigation triggers
    pub scroll_behavior: ScrollBehavior,
    /// Directory that site-absolute asset paths (`/x.png`) resolve against
    pub asset_root: PathBuf,
    /// User agent string sent with HTTP resource requests
    pub user_agent: String,
    /// Timeout for HTTP requests in milliseconds
    pub timeout_ms: u64,
    /// Extra HTTP headers
    pub headers: HashMap<String, String>,
    /// Whether the preview engine resolves image resources
    pub enable_images: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            lang: "pt-BR".to_string(),
            viewport: Viewport::default(),
            scroll_behavior: ScrollBehavior::Smooth,
            asset_root: PathBuf::from("public"),
            user_agent: format!("folio/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30000,
            headers: HashMap::new(),
            enable_images: true,
        }
    }
}

impl SiteConfig {
    /// Read a JSON config file; omitted fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let cfg: SiteConfig = serde_json::from_str(&raw)?;
        if cfg.viewport.width == 0 || cfg.viewport.height == 0 {
            return Err(Error::ConfigError("viewport dimensions must be non-zero".into()));
        }
        Ok(cfg)
    }
}

/// Compose and render the full document for `content`.
pub fn render_site(content: SiteContent, config: &SiteConfig) -> String {
    PageComposer::new(content).compose().render_document(config)
}

/// SHA-256 of the rendered markup, hex encoded.
pub fn document_digest(html: &str) -> String {
    hex::encode(Sha256::digest(html.as_bytes()))
}
