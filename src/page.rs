//! Page composition: turns `SiteContent` into ordered sections, cards and
//! navigation triggers.

use chrono::{Datelike, Utc};
use scraper::Html;

use crate::card::{CardRenderer, ImageSlot, ProjectCard, TechBadge, PORTRAIT_SLOT};
use crate::content::{Icon, NavAnchor, SiteContent, SECTION_IDS};
use crate::embed::VideoEmbed;
use crate::rendering::layout::{layout_sections, PageLayout};
use crate::rendering::Node;
use crate::viewport::{ScrollBehavior, ScrollState, ScrollView};
use crate::SiteConfig;

const STYLE: &str = ".image-slot{position:relative;overflow:hidden}\
.image-slot img{display:block;width:100%;height:100%;object-fit:cover}\
.image-placeholder{position:absolute;inset:0;display:flex;align-items:center;justify-content:center}\
.image-slot[data-image-state=loaded] .image-placeholder{display:none}\
.image-slot[data-image-state=failed] img{display:none}";

/// Identifies an image slot on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Portrait,
    Project(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Scrolling,
}

/// A clickable control that scrolls the viewport to an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTrigger {
    anchor: NavAnchor,
}

impl NavTrigger {
    pub fn new(anchor: NavAnchor) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> &NavAnchor {
        &self.anchor
    }

    /// Request a scroll to the trigger's section. Returns false, leaving the
    /// viewport untouched, when no section carries the anchor id.
    pub fn press(&self, layout: &PageLayout, view: &mut ScrollView, behavior: ScrollBehavior) -> bool {
        match layout.section(&self.anchor.id) {
            Some(rect) => {
                log::debug!("scrolling to #{} at y={}", self.anchor.id, rect.y);
                view.scroll_into_view(&self.anchor.id, rect.y.max(0) as u32, behavior);
                true
            }
            None => {
                log::debug!("no element with id {:?}; ignoring click", self.anchor.id);
                false
            }
        }
    }

    pub fn state(&self, view: &ScrollView) -> TriggerState {
        match view.state() {
            ScrollState::Scrolling { target, .. } if *target == self.anchor.id => {
                TriggerState::Scrolling
            }
            _ => TriggerState::Idle,
        }
    }

    pub fn render(&self) -> Node {
        Node::element("button")
            .attr("type", "button")
            .attr("data-scroll-target", self.anchor.id.as_str())
            .child(Node::text(self.anchor.label()))
    }
}

/// Composition root holding the fixed content lists.
#[derive(Debug, Clone)]
pub struct PageComposer {
    content: SiteContent,
    year: Option<i32>,
}

impl PageComposer {
    pub fn new(content: SiteContent) -> Self {
        Self {
            content,
            year: None,
        }
    }

    /// Pin the footer year instead of reading the clock.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    /// Instantiate one card per record, in list order.
    pub fn compose(&self) -> Page {
        let profile = &self.content.profile;
        Page {
            portrait: ImageSlot::new(
                profile.portrait.as_deref(),
                &profile.full_name(),
                Node::text(profile.initials.as_str()),
                PORTRAIT_SLOT,
            ),
            projects: self.content.projects.iter().map(ProjectCard::new).collect(),
            technologies: self.content.technologies.iter().map(TechBadge::new).collect(),
            triggers: self.content.anchors.iter().cloned().map(NavTrigger::new).collect(),
            year: self.year.unwrap_or_else(current_year),
            content: self.content.clone(),
        }
    }
}

/// A composed page with per-card presentation state.
#[derive(Debug, Clone)]
pub struct Page {
    content: SiteContent,
    portrait: ImageSlot,
    projects: Vec<ProjectCard>,
    technologies: Vec<TechBadge>,
    triggers: Vec<NavTrigger>,
    year: i32,
}

impl Page {
    pub fn projects(&self) -> &[ProjectCard] {
        &self.projects
    }

    pub fn technologies(&self) -> &[TechBadge] {
        &self.technologies
    }

    pub fn triggers(&self) -> &[NavTrigger] {
        &self.triggers
    }

    pub fn trigger(&self, anchor_id: &str) -> Option<&NavTrigger> {
        self.triggers.iter().find(|t| t.anchor.id == anchor_id)
    }

    pub fn image_slot(&self, target: ImageTarget) -> Option<&ImageSlot> {
        match target {
            ImageTarget::Portrait => Some(&self.portrait),
            ImageTarget::Project(i) => self.projects.get(i).and_then(|c| c.image_slot()),
        }
    }

    /// Every image slot on the page, portrait first.
    pub fn image_slots(&self) -> Vec<(ImageTarget, &ImageSlot)> {
        let mut slots = vec![(ImageTarget::Portrait, &self.portrait)];
        for (i, card) in self.projects.iter().enumerate() {
            if let Some(slot) = card.image_slot() {
                slots.push((ImageTarget::Project(i), slot));
            }
        }
        slots
    }

    /// Deliver a load-failure signal to one slot. Returns true if the
    /// fallback was activated by this call.
    pub fn image_failed(&mut self, target: ImageTarget) -> bool {
        let slot = match target {
            ImageTarget::Portrait => Some(&mut self.portrait),
            ImageTarget::Project(i) => self.projects.get_mut(i).and_then(|c| c.image_slot_mut()),
        };
        slot.map(ImageSlot::fail).unwrap_or(false)
    }

    pub fn render(&self) -> Node {
        Node::element("div")
            .class("site")
            .child(self.messaging_link())
            .child(self.nav())
            .child(self.hero())
            .child(self.about())
            .child(self.project_section())
            .child(self.technology_section())
            .child(self.contact())
            .child(self.footer())
    }

    /// Complete HTML5 document, including the fallback CSS and the scroll
    /// script for `[data-scroll-target]` controls.
    pub fn render_document(&self, config: &SiteConfig) -> String {
        let script = format!(
            "document.querySelectorAll('[data-scroll-target]').forEach(function(b){{\
b.addEventListener('click',function(){{\
var el=document.getElementById(b.dataset.scrollTarget);\
if(el)el.scrollIntoView({{behavior:'{}'}});}});}});",
            config.scroll_behavior.as_str()
        );
        let head = Node::element("head")
            .child(Node::element("meta").attr("charset", "utf-8"))
            .child(
                Node::element("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1"),
            )
            .child(Node::element("title").child(Node::text(self.title())))
            .child(Node::element("style").child(Node::raw(format!(
                "html{{scroll-behavior:{}}}{}",
                config.scroll_behavior.css_value(),
                STYLE
            ))));
        let body = Node::element("body")
            .child(self.render())
            .child(Node::element("script").child(Node::raw(script)));
        let html = Node::element("html")
            .attr("lang", config.lang.as_str())
            .child(head)
            .child(body);
        format!("<!DOCTYPE html>{}", html.to_html())
    }

    /// Section geometry of the rendered document for the given viewport.
    pub fn layout(&self, config: &SiteConfig) -> PageLayout {
        let document = Html::parse_document(&self.render_document(config));
        layout_sections(&document, config.viewport)
    }

    /// Press the trigger for `anchor_id`. Returns false when there is no
    /// such trigger or no section to scroll to.
    pub fn click(&self, anchor_id: &str, layout: &PageLayout, view: &mut ScrollView, behavior: ScrollBehavior) -> bool {
        self.trigger(anchor_id)
            .map(|t| t.press(layout, view, behavior))
            .unwrap_or(false)
    }

    pub fn title(&self) -> String {
        format!("{} | Portfolio", self.content.profile.full_name())
    }

    fn messaging_link(&self) -> Node {
        Node::element("a")
            .class("messaging-link")
            .attr("href", self.content.profile.messaging_url.as_str())
            .attr("target", "_blank")
            .attr("rel", "noreferrer")
            .child(Node::raw(Icon::MessageCircle.glyph(28)))
            .child(Node::element("span").child(Node::text("WhatsApp")))
    }

    fn nav(&self) -> Node {
        let p = &self.content.profile;
        Node::element("nav")
            .class("site-nav")
            .child(
                Node::element("div")
                    .class("brand")
                    .child(Node::element("span").class("highlight").child(Node::text(p.first_name.as_str())))
                    .child(Node::text(format!(" {}", p.last_name))),
            )
            .child(
                Node::element("div")
                    .class("nav-links")
                    .children(self.triggers.iter().map(NavTrigger::render)),
            )
            .child(
                Node::element("a")
                    .class("nav-contact")
                    .attr("href", format!("#{}", SECTION_IDS[4]))
                    .child(Node::text("Contato")),
            )
    }

    fn hero(&self) -> Node {
        let p = &self.content.profile;
        let mut heading = Node::element("h1");
        let last = p.headline.len().saturating_sub(1);
        for (i, line) in p.headline.iter().enumerate() {
            if i == last && i > 0 {
                heading = heading.child(Node::element("br")).child(
                    Node::element("span").class("highlight").child(Node::text(line.as_str())),
                );
            } else {
                heading = heading.child(Node::text(line.as_str()));
            }
        }
        let cta = NavTrigger::new(NavAnchor {
            id: p.cta_target.clone(),
            label: Some(format!("{} ", p.cta_label)),
        })
        .render()
        .class("cta")
        .child(Node::raw(Icon::ChevronRight.glyph(20)));

        section(SECTION_IDS[0]).child(
            Node::element("div")
                .class("grid")
                .attr("data-columns", "2")
                .child(
                    Node::element("div")
                        .class("hero-text")
                        .child(Node::element("div").class("availability").child(Node::text(p.availability.as_str())))
                        .child(heading)
                        .child(Node::element("p").class("lead").child(Node::text(p.lead.as_str())))
                        .child(Node::element("div").class("actions").child(cta)),
                )
                .child(Node::element("div").class("portrait").child(self.portrait.render())),
        )
    }

    fn about(&self) -> Node {
        let p = &self.content.profile;
        let status = Node::element("div")
            .class("status-card")
            .child(Node::element("p").class("status-caption").child(Node::text(p.status_caption.as_str())))
            .child(Node::element("p").child(Node::text(p.status.as_str())));
        section(SECTION_IDS[1]).child(
            Node::element("div")
                .class("grid")
                .attr("data-columns", "2")
                .child(
                    Node::element("div")
                        .class("about-media")
                        .child(VideoEmbed::youtube(&p.video_id).render())
                        .child(status),
                )
                .child(
                    Node::element("div")
                        .class("about-text")
                        .child(heading_with_icon(Icon::User, &p.about_title))
                        .children(p.about.iter().map(|para| Node::element("p").child(Node::text(para.as_str())))),
                ),
        )
    }

    fn project_section(&self) -> Node {
        section(SECTION_IDS[2])
            .child(heading_with_icon(Icon::Briefcase, &self.content.profile.projects_title))
            .child(
                Node::element("div")
                    .class("grid project-grid")
                    .attr("data-columns", "3")
                    .children(self.projects.iter().map(|c| c.render())),
            )
    }

    fn technology_section(&self) -> Node {
        section(SECTION_IDS[3])
            .child(Node::element("h2").child(Node::text(self.content.profile.technologies_title.as_str())))
            .child(
                Node::element("div")
                    .class("grid tech-grid")
                    .attr("data-columns", "4")
                    .children(self.technologies.iter().map(|b| b.render())),
            )
    }

    fn contact(&self) -> Node {
        let p = &self.content.profile;
        section(SECTION_IDS[4]).child(
            Node::element("div")
                .class("contact-card")
                .child(Node::element("h2").child(Node::text(p.contact_heading.as_str())))
                .child(
                    Node::element("div")
                        .class("contact-links")
                        .child(
                            Node::element("a")
                                .attr("href", format!("mailto:{}", p.email))
                                .child(Node::raw(Icon::Mail.glyph(20)))
                                .child(Node::text(" E-mail")),
                        )
                        .child(
                            Node::element("a")
                                .attr("href", p.social_url.as_str())
                                .attr("target", "_blank")
                                .attr("rel", "noopener noreferrer")
                                .child(Node::raw(Icon::Linkedin.glyph(20)))
                                .child(Node::text(" LinkedIn")),
                        ),
                ),
        )
    }

    fn footer(&self) -> Node {
        Node::element("footer").child(Node::element("div").child(Node::text(format!(
            "© {} — {}",
            self.year,
            self.content.profile.full_name()
        ))))
    }
}

fn section(id: &str) -> Node {
    Node::element("section").attr("id", id)
}

fn heading_with_icon(icon: Icon, title: &str) -> Node {
    Node::element("h2")
        .child(Node::raw(icon.glyph(24)))
        .child(Node::text(title))
}

fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Visible;
    use crate::viewport::Viewport;

    fn page() -> Page {
        PageComposer::new(SiteContent::default()).with_year(2025).compose()
    }

    #[test]
    fn sections_render_in_order() {
        let html = page().render().to_html();
        let positions: Vec<usize> = SECTION_IDS
            .iter()
            .map(|id| html.find(&format!(r#"<section id="{}""#, id)).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn one_trigger_per_anchor() {
        let p = page();
        let node = p.render();
        for id in SECTION_IDS {
            // nav trigger, plus the hero call-to-action for projetos
            let expected = if id == "projetos" { 2 } else { 1 };
            assert_eq!(node.find_all("data-scroll-target", id).len(), expected, "{}", id);
        }
        assert_eq!(p.triggers().len(), 5);
    }

    #[test]
    fn cta_uses_label_not_id() {
        let node = page().render();
        let cta = node
            .find_all("class", "cta")
            .into_iter()
            .next()
            .expect("cta button");
        assert_eq!(cta.text_content(), "Explorar Projetos ");
    }

    #[test]
    fn portrait_failure_falls_back_to_initials() {
        let mut p = page();
        assert_eq!(p.image_slot(ImageTarget::Portrait).unwrap().visible(), Visible::Image);
        assert!(p.image_failed(ImageTarget::Portrait));
        assert!(!p.image_failed(ImageTarget::Portrait));
        let html = p.render().to_html();
        assert!(!html.contains(r#"src="/MinhaImagem.png""#));
        assert!(html.contains(r#"<div class="image-placeholder">LG</div>"#));
    }

    #[test]
    fn failure_signal_for_unknown_project_is_ignored() {
        let mut p = page();
        assert!(!p.image_failed(ImageTarget::Project(99)));
        assert_eq!(p.image_slots().len(), 3);
    }

    #[test]
    fn click_on_missing_anchor_is_noop() {
        let mut content = SiteContent::default();
        content.anchors.push(NavAnchor::new("blog"));
        let p = PageComposer::new(content).with_year(2025).compose();
        let cfg = SiteConfig::default();
        let layout = p.layout(&cfg);
        let mut view = ScrollView::new(Viewport::default(), layout.height);
        assert!(!p.click("blog", &layout, &mut view, ScrollBehavior::Smooth));
        assert!(!p.click("nope", &layout, &mut view, ScrollBehavior::Smooth));
        assert!(!view.is_scrolling());
    }

    #[test]
    fn trigger_state_follows_viewport() {
        let p = page();
        let cfg = SiteConfig::default();
        let layout = p.layout(&cfg);
        let mut view = ScrollView::new(cfg.viewport, layout.height);
        let trigger = p.trigger("projetos").unwrap();
        assert_eq!(trigger.state(&view), TriggerState::Idle);
        assert!(trigger.press(&layout, &mut view, ScrollBehavior::Smooth));
        assert_eq!(trigger.state(&view), TriggerState::Scrolling);
        assert_eq!(p.trigger("sobre").unwrap().state(&view), TriggerState::Idle);
        view.settle();
        assert_eq!(trigger.state(&view), TriggerState::Idle);
        assert_eq!(view.focused(), Some("projetos"));
    }

    #[test]
    fn footer_carries_year() {
        let html = page().render().to_html();
        assert!(html.contains("© 2025 — Leonildo Freitas Gomes"));
    }

    #[test]
    fn document_has_title_lang_and_script() {
        let doc = page().render_document(&SiteConfig::default());
        assert!(doc.starts_with("<!DOCTYPE html><html lang=\"pt-BR\">"));
        assert!(doc.contains("<title>Leonildo Freitas Gomes | Portfolio</title>"));
        assert!(doc.contains("scrollIntoView({behavior:'smooth'})"));
        assert!(doc.contains("<style>html{scroll-behavior:smooth}"));
    }

    #[test]
    fn instant_config_disables_smooth_css() {
        let cfg = SiteConfig {
            scroll_behavior: ScrollBehavior::Instant,
            ..SiteConfig::default()
        };
        let doc = page().render_document(&cfg);
        assert!(doc.contains("<style>html{scroll-behavior:auto}"));
        assert!(!doc.contains("scroll-behavior:smooth"));
        assert!(doc.contains("scrollIntoView({behavior:'instant'})"));
    }

    #[test]
    fn unpinned_year_reads_the_clock() {
        let p = PageComposer::new(SiteContent::default()).compose();
        let html = p.render().to_html();
        assert!(html.contains(&format!("© {} — ", Utc::now().year())));
    }
}
