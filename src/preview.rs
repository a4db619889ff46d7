//! Headless preview of rendered pages.
//!
//! The engine loads markup (from memory, disk or HTTP), parses it, resolves
//! image resources and performs anchor navigation. It runs no scripts:
//! image failures and clicks are modelled with the same `ImageSlot` and
//! `ScrollView` state the page itself uses.

use std::path::Path;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};

use crate::card::{ImageSlot, ImageState, SlotSize, Visible};
use crate::content::NavAnchor;
use crate::loader::ResourceLoader;
use crate::page::NavTrigger;
use crate::rendering::layout::{layout_sections, PageLayout};
use crate::rendering::Node;
use crate::viewport::{ScrollState, ScrollView};
use crate::{Error, Result, SiteConfig};

type OnLoadHandler = Arc<dyn Fn(&TextSnapshot) + Send + Sync>;
type OnImageErrorHandler = Arc<dyn Fn(&ImageEvent) + Send + Sync>;

/// A textual snapshot of a loaded page
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    /// Page title
    pub title: String,
    /// Body text, scripts excluded
    pub text: String,
    /// Location the page was loaded from
    pub url: String,
}

/// A fallback activation observed while resolving images
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEvent {
    /// Slot index in document order
    pub slot: usize,
    pub src: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotSnapshot {
    pub index: usize,
    pub src: Option<String>,
    pub state: ImageState,
    pub visible: Visible,
    pub size: SlotSize,
    pub fallback_activations: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCardSnapshot {
    pub title: String,
    pub tags: Vec<String>,
    /// Index into `PageSnapshot::slots`
    pub slot: Option<usize>,
}

/// Structural view of a loaded page
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub title: String,
    /// Navigation trigger targets, in nav order
    pub anchors: Vec<String>,
    /// Section ids, in page order
    pub sections: Vec<String>,
    /// Project cards, in grid order
    pub projects: Vec<ProjectCardSnapshot>,
    /// Technology badge names, in grid order
    pub technologies: Vec<String>,
    pub slots: Vec<SlotSnapshot>,
}

impl PageSnapshot {
    pub fn project_slot(&self, card: usize) -> Option<&SlotSnapshot> {
        self.projects
            .get(card)
            .and_then(|c| c.slot)
            .and_then(|i| self.slots.get(i))
    }
}

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text of `el` as displayed: script and style contents are skipped, as is
/// anything under a node listed in `hidden`.
fn visible_text(el: ElementRef, hidden: &[ElementRef]) -> String {
    el.descendants()
        .filter_map(|n| {
            let text = n.value().as_text()?;
            let skipped = n.ancestors().any(|a| {
                hidden.iter().any(|h| h.id() == a.id())
                    || a.value()
                        .as_element()
                        .map(|e| matches!(e.name(), "script" | "style"))
                        .unwrap_or(false)
            });
            if skipped {
                None
            } else {
                Some(text.to_string())
            }
        })
        .collect()
}

/// Rebuild slot state from markup. A slot rendered as failed carries no
/// image and therefore starts in `Failed`.
fn parse_slots(document: &Html) -> Vec<ImageSlot> {
    let img_sel = sel("img");
    let placeholder_sel = sel(".image-placeholder");
    let slots = document
        .select(&sel(".image-slot"))
        .map(|slot| {
            let failed = slot.value().attr("data-image-state").and_then(ImageState::parse)
                == Some(ImageState::Failed);
            let img = slot.select(&img_sel).next();
            let src = if failed {
                None
            } else {
                img.and_then(|i| i.value().attr("src"))
            };
            let alt = img.and_then(|i| i.value().attr("alt")).unwrap_or_default();
            let placeholder = slot
                .select(&placeholder_sel)
                .next()
                .map(text_of)
                .unwrap_or_default();
            let size = slot
                .value()
                .attr("data-slot")
                .and_then(SlotSize::parse)
                .unwrap_or(SlotSize { width: 0, height: 0 });
            ImageSlot::new(src, alt, Node::text(placeholder), size)
        })
        .collect();
    slots
}

/// Headless engine for rendered portfolio pages.
pub struct PreviewEngine {
    config: SiteConfig,
    #[cfg(feature = "http")]
    client: reqwest::blocking::Client,
    last_html: Option<String>,
    last_url: Option<String>,
    slots: Vec<ImageSlot>,
    layout: PageLayout,
    view: ScrollView,
    events: Vec<ImageEvent>,
    on_load: Option<OnLoadHandler>,
    on_image_error: Option<OnImageErrorHandler>,
}

impl PreviewEngine {
    pub fn new(config: SiteConfig) -> Result<Self> {
        #[cfg(feature = "http")]
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        let view = ScrollView::new(config.viewport, 0);
        Ok(Self {
            config,
            #[cfg(feature = "http")]
            client,
            last_html: None,
            last_url: None,
            slots: Vec::new(),
            layout: PageLayout::default(),
            view,
            events: Vec::new(),
            on_load: None,
            on_image_error: None,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Load markup directly. `url` is only recorded in snapshots.
    pub fn load_html(&mut self, html: &str, url: &str) -> Result<()> {
        let document = Html::parse_document(html);
        self.slots = parse_slots(&document);
        self.layout = layout_sections(&document, self.config.viewport);
        self.view = ScrollView::new(self.config.viewport, self.layout.height);
        self.events.clear();
        self.last_html = Some(html.to_string());
        self.last_url = Some(url.to_string());
        log::info!(
            "loaded {} ({} sections, {} image slots)",
            url,
            self.layout.sections.len(),
            self.slots.len()
        );

        if let Some(cb) = &self.on_load {
            if let Ok(snapshot) = self.render_text_snapshot() {
                cb(&snapshot);
            }
        }
        Ok(())
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let html = std::fs::read_to_string(path)
            .map_err(|e| Error::LoadError(format!("Failed to read {}: {}", path.display(), e)))?;
        let url = std::fs::canonicalize(path)
            .ok()
            .and_then(|p| url::Url::from_file_path(p).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.load_html(&html, &url)
    }

    #[cfg(feature = "http")]
    pub fn load_url(&mut self, url: &str) -> Result<()> {
        let mut req = self
            .client
            .get(url)
            .header("User-Agent", self.config.user_agent.as_str());
        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }
        let resp = req
            .send()
            .map_err(|e| Error::LoadError(format!("Failed to fetch {}: {}", url, e)))?;
        if !resp.status().is_success() {
            return Err(Error::LoadError(format!("{} returned {}", url, resp.status())));
        }
        let body = resp
            .text()
            .map_err(|e| Error::LoadError(format!("Failed to read response body: {}", e)))?;
        self.load_html(&body, url)
    }

    fn html(&self) -> Result<&str> {
        self.last_html
            .as_deref()
            .ok_or_else(|| Error::RenderError("No document loaded".into()))
    }

    /// Title and displayed text of the loaded page. Placeholders of slots
    /// still showing their image are left out; after a fallback the
    /// placeholder text replaces the image.
    pub fn render_text_snapshot(&self) -> Result<TextSnapshot> {
        let document = Html::parse_document(self.html()?);
        let placeholder_sel = sel(".image-placeholder");
        let hidden: Vec<ElementRef> = document
            .select(&sel(".image-slot"))
            .zip(&self.slots)
            .filter(|(_, slot)| slot.visible() == Visible::Image)
            .flat_map(|(el, _)| el.select(&placeholder_sel))
            .collect();
        let title = document
            .select(&sel("title"))
            .next()
            .map(|n| n.text().collect::<String>())
            .unwrap_or_default();
        let text = document
            .select(&sel("body"))
            .next()
            .map(|body| visible_text(body, &hidden))
            .unwrap_or_default();
        Ok(TextSnapshot {
            title,
            text,
            url: self.last_url.clone().unwrap_or_default(),
        })
    }

    pub fn page_snapshot(&self) -> Result<PageSnapshot> {
        let document = Html::parse_document(self.html()?);

        let slot_ids: Vec<_> = document.select(&sel(".image-slot")).map(|s| s.id()).collect();
        let slots = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, s)| SlotSnapshot {
                index,
                src: s.src().map(str::to_string),
                state: s.state(),
                visible: s.visible(),
                size: s.size(),
                fallback_activations: s.fallback_activations(),
            })
            .collect();

        let slot_sel = sel(".image-slot");
        let tag_sel = sel(".tag");
        let projects = document
            .select(&sel(r#"[data-card="project"]"#))
            .map(|card| ProjectCardSnapshot {
                title: card.select(&sel("h3")).next().map(text_of).unwrap_or_default(),
                tags: card.select(&tag_sel).map(text_of).collect(),
                slot: card
                    .select(&slot_sel)
                    .next()
                    .and_then(|s| slot_ids.iter().position(|id| *id == s.id())),
            })
            .collect();

        let technologies = document
            .select(&sel(r#"[data-card="tech"]"#))
            .map(|badge| badge.select(&sel("h4")).next().map(text_of).unwrap_or_default())
            .collect();

        Ok(PageSnapshot {
            title: document
                .select(&sel("title"))
                .next()
                .map(text_of)
                .unwrap_or_default(),
            anchors: document
                .select(&sel("nav [data-scroll-target]"))
                .filter_map(|b| b.value().attr("data-scroll-target"))
                .map(str::to_string)
                .collect(),
            sections: document
                .select(&sel("section[id]"))
                .filter_map(|s| s.value().attr("id"))
                .map(str::to_string)
                .collect(),
            projects,
            technologies,
            slots,
        })
    }

    /// Try every slot still showing its image; failed loads activate the
    /// placeholder. Returns the fallbacks activated by this call.
    pub fn resolve_images(&mut self, loader: &dyn ResourceLoader) -> Result<Vec<ImageEvent>> {
        self.html()?;
        if !self.config.enable_images {
            log::debug!("image loading disabled; skipping resolution");
            return Ok(Vec::new());
        }
        let mut activated = Vec::new();
        for index in 0..self.slots.len() {
            let src = match (self.slots[index].state(), self.slots[index].src()) {
                (ImageState::Loaded, Some(src)) => src.to_string(),
                _ => continue,
            };
            if let Err(e) = loader.load(&src) {
                if let Some(event) = self.fail_slot(index, &src, e.to_string()) {
                    activated.push(event);
                }
            }
        }
        Ok(activated)
    }

    /// Deliver a load-failure signal to one slot, as a browser would after
    /// the image request fails. Returns whether the fallback activated.
    pub fn signal_image_error(&mut self, slot: usize) -> Result<bool> {
        self.html()?;
        let src = self
            .slots
            .get(slot)
            .ok_or_else(|| Error::RenderError(format!("no image slot {}", slot)))?
            .src()
            .unwrap_or_default()
            .to_string();
        Ok(self.fail_slot(slot, &src, "load error".to_string()).is_some())
    }

    fn fail_slot(&mut self, index: usize, src: &str, reason: String) -> Option<ImageEvent> {
        if !self.slots[index].fail() {
            return None;
        }
        log::warn!("image {} failed to load ({}); showing placeholder", src, reason);
        let event = ImageEvent {
            slot: index,
            src: src.to_string(),
            reason,
        };
        if let Some(cb) = &self.on_image_error {
            cb(&event);
        }
        self.events.push(event.clone());
        Some(event)
    }

    /// All fallback activations since the page was loaded.
    pub fn image_events(&self) -> &[ImageEvent] {
        &self.events
    }

    /// Click the navigation control targeting `anchor_id`.
    ///
    /// Returns `Ok(false)` when the control exists but nothing on the page
    /// carries the id, matching a guarded `scrollIntoView`.
    pub fn click(&mut self, anchor_id: &str) -> Result<bool> {
        let document = Html::parse_document(self.html()?);
        let has_trigger = document
            .select(&sel("[data-scroll-target]"))
            .any(|b| b.value().attr("data-scroll-target") == Some(anchor_id));
        if !has_trigger {
            return Err(Error::NavigationError(format!(
                "no control targets #{}",
                anchor_id
            )));
        }
        let trigger = NavTrigger::new(NavAnchor::new(anchor_id));
        Ok(trigger.press(&self.layout, &mut self.view, self.config.scroll_behavior))
    }

    /// Complete an in-flight smooth scroll.
    pub fn settle(&mut self) -> Option<String> {
        self.view.settle().map(str::to_string)
    }

    /// Anchor of the section currently scrolled into view.
    pub fn focused_anchor(&self) -> Option<&str> {
        self.view.focused()
    }

    pub fn scroll_state(&self) -> &ScrollState {
        self.view.state()
    }

    pub fn scroll_y(&self) -> u32 {
        self.view.scroll_y()
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Register a callback invoked after each successful load.
    pub fn on_load<F>(&mut self, cb: F)
    where
        F: Fn(&TextSnapshot) + Send + Sync + 'static,
    {
        self.on_load = Some(Arc::new(cb));
    }

    pub fn clear_on_load(&mut self) {
        self.on_load = None;
    }

    /// Register a callback invoked when an image fallback activates.
    pub fn on_image_error<F>(&mut self, cb: F)
    where
        F: Fn(&ImageEvent) + Send + Sync + 'static,
    {
        self.on_image_error = Some(Arc::new(cb));
    }

    pub fn clear_on_image_error(&mut self) {
        self.on_image_error = None;
    }
}
