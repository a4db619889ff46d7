//! Block layout estimate for page sections.
//!
//! Sections are stacked vertically; each section's height is estimated from
//! its blocks: wrapped text lines, fixed image slots, video frames and
//! multi-column grids. The numbers are deterministic, not pixel-exact.
//! Heights saturate at `u32::MAX` since slot sizes and column counts come
//! from loaded markup.

use crate::card::SlotSize;
use crate::viewport::Viewport;
use scraper::{ElementRef, Html, Selector};

const MAX_CONTENT_WIDTH: u32 = 1280;
const SECTION_PADDING_X: u32 = 24;
const SECTION_PADDING_Y: u32 = 128;
const GRID_GAP: u32 = 40;
const BLOCK_MARGIN: u32 = 8;
/// Below this width grids collapse to one column.
const SINGLE_COLUMN_BELOW: u32 = 768;

const INLINE_TAGS: [&str; 9] = ["a", "span", "button", "strong", "em", "svg", "br", "b", "i"];

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub sections: Vec<SectionBox>,
    /// Total document height
    pub height: u32,
}

impl PageLayout {
    pub fn section(&self, id: &str) -> Option<&Rect> {
        self.sections.iter().find(|s| s.id == id).map(|s| &s.rect)
    }
}

fn line_height(tag: &str) -> u32 {
    match tag {
        "h1" => 72,
        "h2" => 48,
        "h3" => 32,
        _ => 24,
    }
}

/// Number of wrapped lines for `text` in `width` pixels, with the average
/// glyph width taken as a third of the line height.
fn wrapped_lines(text: &str, width: u32, line_h: u32) -> u32 {
    let char_w = (line_h / 3).max(1);
    let chars_per_line = ((width / char_w) as usize).max(1);
    let mut lines = 0u32;
    let mut cur = 0usize;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if cur == 0 {
            cur = len;
            lines += 1;
        } else if cur + 1 + len > chars_per_line {
            cur = len;
            lines += 1;
        } else {
            cur += 1 + len;
        }
    }
    lines
}

fn is_inline(el: &ElementRef) -> bool {
    INLINE_TAGS.contains(&el.value().name())
}

fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn block_height(el: ElementRef, width: u32) -> u32 {
    let tag = el.value().name();
    if matches!(tag, "script" | "style") {
        return 0;
    }
    if tag == "iframe" {
        return width * 9 / 16;
    }
    if has_class(&el, "image-slot") {
        return el
            .value()
            .attr("data-slot")
            .and_then(SlotSize::parse)
            .map(|s| s.height)
            .unwrap_or(0)
            .saturating_add(BLOCK_MARGIN);
    }

    let blocks: Vec<ElementRef> = el
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|c| !is_inline(c))
        .collect();

    if blocks.is_empty() {
        // line box: text and inline children only
        let text = el.text().collect::<String>();
        if text.trim().is_empty() {
            return 0;
        }
        let lh = line_height(tag);
        return wrapped_lines(&text, width, lh)
            .saturating_mul(lh)
            .saturating_add(BLOCK_MARGIN);
    }

    let columns = el
        .value()
        .attr("data-columns")
        .and_then(|c| c.parse::<u32>().ok())
        .filter(|&c| c > 1 && width >= SINGLE_COLUMN_BELOW)
        // a row never has more columns than there are cells
        .map(|c| c.min(u32::try_from(blocks.len()).unwrap_or(u32::MAX)).max(1));

    match columns {
        Some(cols) => {
            let col_w = width.saturating_sub(GRID_GAP.saturating_mul(cols - 1)) / cols;
            let rows: Vec<u32> = blocks
                .chunks(cols as usize)
                .map(|row| row.iter().map(|c| block_height(*c, col_w)).max().unwrap_or(0))
                .collect();
            let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
            let gaps = GRID_GAP.saturating_mul(row_count.saturating_sub(1));
            rows.iter().fold(gaps, |acc, h| acc.saturating_add(*h))
        }
        None => blocks
            .into_iter()
            .fold(0u32, |acc, c| acc.saturating_add(block_height(c, width))),
    }
}

/// Lay out every `section[id]` of the document, top to bottom.
pub fn layout_sections(document: &Html, viewport: Viewport) -> PageLayout {
    let section_sel = Selector::parse("section[id]").unwrap();
    let footer_sel = Selector::parse("footer").unwrap();

    let page_width = viewport.width;
    let content_w = page_width.min(MAX_CONTENT_WIDTH).saturating_sub(SECTION_PADDING_X * 2);
    let mut y = 0u32;
    let mut sections = Vec::new();

    for section in document.select(&section_sel) {
        let id = section.value().attr("id").unwrap_or_default().to_string();
        let height = block_height(section, content_w).saturating_add(SECTION_PADDING_Y * 2);
        sections.push(SectionBox {
            id,
            rect: Rect {
                x: 0,
                y: i32::try_from(y).unwrap_or(i32::MAX),
                width: page_width,
                height,
            },
        });
        y = y.saturating_add(height);
    }

    if let Some(footer) = document.select(&footer_sel).next() {
        y = y.saturating_add(block_height(footer, content_w).saturating_add(2 * 48));
    }

    PageLayout { sections, height: y }
}
