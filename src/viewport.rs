//! Viewport and scroll model.
//!
//! A navigation trigger only requests a scroll. The viewport owns the
//! in-flight animation: it settles it, or retargets it when a new request
//! arrives mid-flight.

use serde::{Deserialize, Serialize};

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

impl ScrollBehavior {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollBehavior::Smooth => "smooth",
            ScrollBehavior::Instant => "instant",
        }
    }

    /// Value of the CSS `scroll-behavior` property, which has no `instant`.
    pub fn css_value(self) -> &'static str {
        match self {
            ScrollBehavior::Smooth => "smooth",
            ScrollBehavior::Instant => "auto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    Scrolling { target: String, from: u32, to: u32 },
}

/// Scroll position and focus of a viewport over a laid-out page.
#[derive(Debug, Clone)]
pub struct ScrollView {
    viewport: Viewport,
    page_height: u32,
    scroll_y: u32,
    state: ScrollState,
    focused: Option<String>,
}

impl ScrollView {
    pub fn new(viewport: Viewport, page_height: u32) -> Self {
        Self {
            viewport,
            page_height,
            scroll_y: 0,
            state: ScrollState::Idle,
            focused: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Anchor of the region scrolled into view by the last settled scroll.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    fn max_scroll(&self) -> u32 {
        self.page_height.saturating_sub(self.viewport.height)
    }

    /// Bring the element at `y` to the top of the viewport, clamped to the
    /// scrollable range.
    pub fn scroll_into_view(&mut self, anchor: &str, y: u32, behavior: ScrollBehavior) {
        let to = y.min(self.max_scroll());
        match behavior {
            ScrollBehavior::Instant => {
                self.scroll_y = to;
                self.focused = Some(anchor.to_string());
                self.state = ScrollState::Idle;
            }
            ScrollBehavior::Smooth => {
                if let ScrollState::Scrolling { target, .. } = &self.state {
                    log::debug!("retargeting scroll from {} to {}", target, anchor);
                }
                self.state = ScrollState::Scrolling {
                    target: anchor.to_string(),
                    from: self.scroll_y,
                    to,
                };
            }
        }
    }

    /// Finish any in-flight smooth scroll. Returns the anchor that was reached.
    pub fn settle(&mut self) -> Option<&str> {
        if let ScrollState::Scrolling { target, to, .. } =
            std::mem::replace(&mut self.state, ScrollState::Idle)
        {
            self.scroll_y = to;
            self.focused = Some(target);
            return self.focused.as_deref();
        }
        None
    }

    pub fn is_scrolling(&self) -> bool {
        matches!(self.state, ScrollState::Scrolling { .. })
    }
}
