//! Card renderers for project records and technology entries.
//!
//! Image fallback is an explicit two-state value owned by the card's image
//! slot. The rendered markup is chosen from that state; the inline error
//! handler in the document only flips the slot's `data-image-state`
//! attribute, never sibling nodes.

use crate::content::{Icon, ProjectRecord, TechEntry};
use crate::rendering::Node;

/// Load state of an image slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Loaded,
    Failed,
}

impl ImageState {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageState::Loaded => "loaded",
            ImageState::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "loaded" => Some(ImageState::Loaded),
            "failed" => Some(ImageState::Failed),
            _ => None,
        }
    }

    /// Which child of the slot is shown in this state.
    pub fn visible(self) -> Visible {
        match self {
            ImageState::Loaded => Visible::Image,
            ImageState::Failed => Visible::Placeholder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visible {
    Image,
    Placeholder,
}

/// Fixed layout box shared by the image and its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSize {
    pub width: u32,
    pub height: u32,
}

impl SlotSize {
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once('x')?;
        Some(Self {
            width: w.trim().parse().ok()?,
            height: h.trim().parse().ok()?,
        })
    }
}

impl std::fmt::Display for SlotSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Project preview slot: one grid column wide, 208px tall.
pub const PROJECT_SLOT: SlotSize = SlotSize {
    width: 384,
    height: 208,
};

/// Hero portrait slot (square).
pub const PORTRAIT_SLOT: SlotSize = SlotSize {
    width: 560,
    height: 560,
};

/// Inline handler flipping the slot state; runs at most once per image.
const ONERROR: &str = "this.onerror=null;this.parentElement.dataset.imageState='failed'";

/// An image with a same-size placeholder fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSlot {
    src: Option<String>,
    alt: String,
    placeholder: Node,
    size: SlotSize,
    state: ImageState,
    fallbacks: u32,
}

impl ImageSlot {
    /// A slot without a source starts in the `Failed` state.
    pub fn new(src: Option<&str>, alt: &str, placeholder: Node, size: SlotSize) -> Self {
        let src = src.filter(|s| !s.trim().is_empty()).map(str::to_string);
        let state = if src.is_some() {
            ImageState::Loaded
        } else {
            ImageState::Failed
        };
        Self {
            src,
            alt: alt.to_string(),
            placeholder,
            size,
            state,
            fallbacks: 0,
        }
    }

    /// Deliver a load-failure signal. Returns true if this call activated
    /// the fallback; later signals are ignored.
    pub fn fail(&mut self) -> bool {
        match self.state {
            ImageState::Loaded => {
                self.state = ImageState::Failed;
                self.fallbacks += 1;
                true
            }
            ImageState::Failed => false,
        }
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn state(&self) -> ImageState {
        self.state
    }

    pub fn visible(&self) -> Visible {
        self.state.visible()
    }

    pub fn size(&self) -> SlotSize {
        self.size
    }

    /// Number of times the fallback was activated by a failure signal.
    pub fn fallback_activations(&self) -> u32 {
        self.fallbacks
    }

    pub fn render(&self) -> Node {
        let mut slot = Node::element("div")
            .class("image-slot")
            .attr("data-image-state", self.state.as_str())
            .attr("data-slot", self.size.to_string())
            .attr(
                "style",
                format!("max-width:{}px;height:{}px", self.size.width, self.size.height),
            );
        if let (ImageState::Loaded, Some(src)) = (self.state, &self.src) {
            slot = slot.child(
                Node::element("img")
                    .attr("src", src.as_str())
                    .attr("alt", self.alt.as_str())
                    .attr("onerror", ONERROR),
            );
        }
        slot.child(
            Node::element("div")
                .class("image-placeholder")
                .child(self.placeholder.clone()),
        )
    }
}

/// Common surface of the two card kinds.
pub trait CardRenderer {
    fn render(&self) -> Node;

    fn image_slot(&self) -> Option<&ImageSlot> {
        None
    }

    fn image_slot_mut(&mut self) -> Option<&mut ImageSlot> {
        None
    }
}

/// Gallery card for a `ProjectRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    record: ProjectRecord,
    slot: ImageSlot,
}

impl ProjectCard {
    pub fn new(record: &ProjectRecord) -> Self {
        let slot = ImageSlot::new(
            record.image.as_deref(),
            &record.title,
            Node::text("Screenshot do Projeto"),
            PROJECT_SLOT,
        );
        Self {
            record: record.clone(),
            slot,
        }
    }

    pub fn record(&self) -> &ProjectRecord {
        &self.record
    }
}

fn external_link(href: &str, icon: Icon, label: &str) -> Node {
    Node::element("a")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noreferrer")
        .child(Node::raw(icon.glyph(14)))
        .child(Node::text(format!(" {}", label)))
}

impl CardRenderer for ProjectCard {
    fn render(&self) -> Node {
        let tags = self
            .record
            .tags
            .iter()
            .map(|t| Node::element("span").class("tag").child(Node::text(t.as_str())));

        Node::element("article")
            .class("project-card")
            .attr("data-card", "project")
            .child(self.slot.render())
            .child(
                Node::element("div")
                    .class("card-body")
                    .child(Node::element("h3").child(Node::text(self.record.title.as_str())))
                    .child(Node::element("p").child(Node::text(self.record.description.as_str())))
                    .child(Node::element("div").class("tags").children(tags))
                    .child(
                        Node::element("div")
                            .class("card-links")
                            .child(external_link(&self.record.source_url, Icon::Github, "Repositório"))
                            .child(external_link(&self.record.demo_url, Icon::ExternalLink, "Demo")),
                    ),
            )
    }

    fn image_slot(&self) -> Option<&ImageSlot> {
        Some(&self.slot)
    }

    fn image_slot_mut(&mut self) -> Option<&mut ImageSlot> {
        Some(&mut self.slot)
    }
}

/// Badge for a `TechEntry`. Has no image slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TechBadge {
    entry: TechEntry,
}

impl TechBadge {
    pub fn new(entry: &TechEntry) -> Self {
        Self {
            entry: entry.clone(),
        }
    }

    pub fn entry(&self) -> &TechEntry {
        &self.entry
    }
}

impl CardRenderer for TechBadge {
    fn render(&self) -> Node {
        Node::element("div")
            .class("tech-badge")
            .attr("data-card", "tech")
            .child(
                Node::element("div")
                    .class("tech-icon")
                    .child(Node::raw(self.entry.icon.glyph(24))),
            )
            .child(Node::element("h4").child(Node::text(self.entry.name.as_str())))
            .child(Node::element("p").child(Node::text(self.entry.description.as_str())))
    }
}
