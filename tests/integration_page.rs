//! Page-level behavior: card counts and order, image fallback, navigation

use folio::{
    Icon, ImageState, ImageTarget, PageComposer, PreviewEngine, ProjectRecord, ResourceLoader,
    ScrollBehavior, ScrollView, SiteConfig, SiteContent, TechEntry, Visible,
};

fn project(title: &str, image: Option<&str>) -> ProjectRecord {
    ProjectRecord {
        title: title.to_string(),
        description: format!("{} description", title),
        tags: vec!["Rust".to_string()],
        demo_url: "https://example.com/demo".to_string(),
        source_url: "https://example.com/src".to_string(),
        image: image.map(str::to_string),
    }
}

fn tech(name: &str) -> TechEntry {
    TechEntry {
        icon: Icon::Layers,
        name: name.to_string(),
        description: format!("{} description", name),
    }
}

fn fixture() -> SiteContent {
    SiteContent {
        projects: vec![project("First", Some("/first.png")), project("Second", None)],
        technologies: vec![tech("A"), tech("B"), tech("C"), tech("D")],
        ..Default::default()
    }
}

fn engine_for(content: SiteContent) -> PreviewEngine {
    let config = SiteConfig::default();
    let html = PageComposer::new(content)
        .with_year(2025)
        .compose()
        .render_document(&config);
    let mut engine = PreviewEngine::new(config).expect("engine");
    engine.load_html(&html, "memory://fixture").expect("load");
    engine
}

struct Missing(&'static str);

impl ResourceLoader for Missing {
    fn load(&self, src: &str) -> folio::Result<()> {
        if src == self.0 {
            Err(folio::Error::LoadError(format!("{} not found", src)))
        } else {
            Ok(())
        }
    }
}

#[test]
fn project_without_image_shows_placeholder() {
    let snap = engine_for(fixture()).page_snapshot().unwrap();
    let slot = snap.project_slot(1).expect("second card slot");
    assert_eq!(slot.src, None);
    assert_eq!(slot.visible, Visible::Placeholder);
}

#[test]
fn project_with_image_shows_image() {
    let snap = engine_for(fixture()).page_snapshot().unwrap();
    let slot = snap.project_slot(0).expect("first card slot");
    assert_eq!(slot.src.as_deref(), Some("/first.png"));
    assert_eq!(slot.visible, Visible::Image);
}

#[test]
fn clicking_projetos_scrolls_to_projects_section() {
    let mut engine = engine_for(fixture());
    assert!(engine.click("projetos").unwrap());
    assert!(matches!(
        engine.scroll_state(),
        folio::ScrollState::Scrolling { target, .. } if target == "projetos"
    ));
    assert_eq!(engine.settle().as_deref(), Some("projetos"));
    assert_eq!(engine.focused_anchor(), Some("projetos"));

    let target = engine.layout().section("projetos").unwrap().y as u32;
    let max_scroll = engine.layout().height - engine.config().viewport.height;
    assert_eq!(engine.scroll_y(), target.min(max_scroll));
    assert!(engine.scroll_y() > 0);
}

#[test]
fn card_count_and_order_follow_records() {
    let snap = engine_for(fixture()).page_snapshot().unwrap();
    let titles: Vec<_> = snap.projects.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["First", "Second"]);
}

#[test]
fn badge_count_follows_entries() {
    let snap = engine_for(fixture()).page_snapshot().unwrap();
    assert_eq!(snap.technologies, ["A", "B", "C", "D"]);
}

#[test]
fn empty_lists_render_empty_grids() {
    let content = SiteContent {
        projects: Vec::new(),
        technologies: Vec::new(),
        ..Default::default()
    };
    let snap = engine_for(content).page_snapshot().unwrap();
    assert!(snap.projects.is_empty());
    assert!(snap.technologies.is_empty());
    assert_eq!(snap.sections.len(), 5);
}

#[test]
fn late_failure_activates_fallback_once_without_resizing() {
    let mut engine = engine_for(fixture());
    let before = engine.page_snapshot().unwrap();
    let first = before.project_slot(0).unwrap().clone();
    assert_eq!(first.state, ImageState::Loaded);

    let events = engine.resolve_images(&Missing("/first.png")).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].src, "/first.png");
    assert!(!engine.signal_image_error(first.index).unwrap());

    let after = engine.page_snapshot().unwrap();
    let slot = after.project_slot(0).unwrap();
    assert_eq!(slot.visible, Visible::Placeholder);
    assert_eq!(slot.fallback_activations, 1);
    assert_eq!(slot.size, first.size);
}

#[test]
fn composer_failure_signal_matches_preview() {
    let mut page = PageComposer::new(fixture()).with_year(2025).compose();
    let size = page.image_slot(ImageTarget::Project(0)).unwrap().size();
    assert!(page.image_failed(ImageTarget::Project(0)));
    assert!(!page.image_failed(ImageTarget::Project(0)));
    let slot = page.image_slot(ImageTarget::Project(0)).unwrap();
    assert_eq!(slot.visible(), Visible::Placeholder);
    assert_eq!(slot.size(), size);

    // re-rendered markup carries the failed state
    let config = SiteConfig::default();
    let mut engine = PreviewEngine::new(config.clone()).unwrap();
    engine.load_html(&page.render_document(&config), "memory://").unwrap();
    let snap = engine.page_snapshot().unwrap();
    assert_eq!(snap.project_slot(0).unwrap().visible, Visible::Placeholder);
}

#[test]
fn composer_click_without_preview() {
    let page = PageComposer::new(fixture()).with_year(2025).compose();
    let config = SiteConfig::default();
    let layout = page.layout(&config);
    let mut view = ScrollView::new(config.viewport, layout.height);
    assert!(page.click("sobre", &layout, &mut view, ScrollBehavior::Instant));
    assert_eq!(view.focused(), Some("sobre"));
    assert_eq!(view.scroll_y(), layout.section("sobre").unwrap().y as u32);
}
