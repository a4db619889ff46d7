//! Static site content: projects, technology entries, navigation anchors and
//! the owner profile.
//!
//! Content is plain immutable data handed to the composition root. The
//! `Default` impl carries the published site; tests and the CLI may load a
//! replacement from JSON.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A project shown in the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    /// Display order is list order; may be empty.
    #[serde(default)]
    pub tags: Vec<String>,
    pub demo_url: String,
    pub source_url: String,
    /// Preview image path. `None` renders the placeholder.
    #[serde(default)]
    pub image: Option<String>,
}

/// A technology shown in the badge grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechEntry {
    pub icon: Icon,
    pub name: String,
    pub description: String,
}

/// A named page region reachable from the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavAnchor {
    /// Element id of the target section
    pub id: String,
    /// Button text; defaults to the id
    #[serde(default)]
    pub label: Option<String>,
}

impl NavAnchor {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: None,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Symbolic icon identifiers, resolved to inline SVG glyphs at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Layout,
    Smartphone,
    Layers,
    Zap,
    Github,
    Linkedin,
    Mail,
    ExternalLink,
    User,
    Briefcase,
    ChevronRight,
    MessageCircle,
}

impl Icon {
    /// SVG body (without the outer `<svg>`) in a 24x24 stroke grid.
    fn paths(self) -> &'static str {
        match self {
            Icon::Layout => r#"<rect x="3" y="3" width="18" height="18" rx="2"/><path d="M3 9h18M9 21V9"/>"#,
            Icon::Smartphone => r#"<rect x="5" y="2" width="14" height="20" rx="2"/><path d="M12 18h.01"/>"#,
            Icon::Layers => r#"<path d="m12 2 10 5-10 5L2 7z"/><path d="m2 17 10 5 10-5M2 12l10 5 10-5"/>"#,
            Icon::Zap => r#"<path d="M13 2 3 14h9l-1 8 10-12h-9z"/>"#,
            Icon::Github => r#"<path d="M15 22v-4a4.8 4.8 0 0 0-1-3.5c3 0 6-2 6-5.5.08-1.25-.27-2.48-1-3.5.28-1.15.28-2.35 0-3.5 0 0-1 0-3 1.5-2.64-.5-5.36-.5-8 0C6 2 5 2 5 2c-.3 1.15-.3 2.35 0 3.5A5.4 5.4 0 0 0 4 9c0 3.5 3 5.5 6 5.5-.39.49-.68 1.05-.85 1.65S8.93 17.38 9 18v4"/><path d="M9 18c-4.51 2-5-2-7-2"/>"#,
            Icon::Linkedin => r#"<path d="M16 8a6 6 0 0 1 6 6v7h-4v-7a2 2 0 0 0-4 0v7h-4v-7a6 6 0 0 1 6-6zM2 9h4v12H2z"/><circle cx="4" cy="4" r="2"/>"#,
            Icon::Mail => r#"<rect x="2" y="4" width="20" height="16" rx="2"/><path d="m22 7-10 6L2 7"/>"#,
            Icon::ExternalLink => r#"<path d="M15 3h6v6M10 14 21 3M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6"/>"#,
            Icon::User => r#"<circle cx="12" cy="8" r="5"/><path d="M20 21a8 8 0 0 0-16 0"/>"#,
            Icon::Briefcase => r#"<rect x="2" y="7" width="20" height="14" rx="2"/><path d="M16 21V5a2 2 0 0 0-2-2h-4a2 2 0 0 0-2 2v16"/>"#,
            Icon::ChevronRight => r#"<path d="m9 18 6-6-6-6"/>"#,
            Icon::MessageCircle => r#"<path d="M7.9 20A9 9 0 1 0 4 16.1L2 22z"/>"#,
        }
    }

    /// Inline SVG markup for this icon at the given pixel size.
    pub fn glyph(self, size: u32) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">{}</svg>"#,
            self.paths()
        )
    }
}

/// Owner details used by the hero, about, contact and footer sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Highlighted part of the name in the nav bar
    pub first_name: String,
    pub last_name: String,
    pub availability: String,
    /// Hero heading; the last line is highlighted
    pub headline: Vec<String>,
    pub lead: String,
    pub cta_label: String,
    /// Anchor the hero call-to-action scrolls to
    pub cta_target: String,
    #[serde(default)]
    pub portrait: Option<String>,
    /// Shown when the portrait is missing or fails to load
    pub initials: String,
    pub video_id: String,
    pub status_caption: String,
    pub status: String,
    pub about_title: String,
    pub about: Vec<String>,
    pub projects_title: String,
    pub technologies_title: String,
    pub contact_heading: String,
    pub email: String,
    pub social_url: String,
    pub messaging_url: String,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            first_name: "Leonildo".to_string(),
            last_name: "Freitas Gomes".to_string(),
            availability: "Disponível para novos desafios".to_string(),
            headline: vec!["Front-end".to_string(), "Developer.".to_string()],
            lead: "Especialista em criar interfaces de alto desempenho, escaláveis e focadas na experiência do usuário final.".to_string(),
            cta_label: "Explorar Projetos".to_string(),
            cta_target: "projetos".to_string(),
            portrait: Some("/MinhaImagem.png".to_string()),
            initials: "LG".to_string(),
            video_id: "Q162FvWPbI0".to_string(),
            status_caption: "Status Atual".to_string(),
            status: "Finalizando Formação EBAC 🎓".to_string(),
            about_title: "Sobre Mim".to_string(),
            about: vec![
                "Minha jornada no desenvolvimento proporcionou a formalização da minha própria empresa (MEI). O que era uma ferramenta de trabalho tornou-se uma paixão profissional.".to_string(),
                "No vídeo ao lado, explico um pouco mais sobre minha transição de carreira e os desafios que superei para dominar o Front End.".to_string(),
            ],
            projects_title: "Projetos em Destaque".to_string(),
            technologies_title: "Stack Tecnológica".to_string(),
            contact_heading: "Vamos construir algo incrível juntos?".to_string(),
            email: "leonildogomes.dev@outlook.com".to_string(),
            social_url: "https://www.linkedin.com/in/leonildo-freitas-gomes-059a3627b".to_string(),
            messaging_url: "https://wa.me/5511992095721".to_string(),
        }
    }
}

/// Everything the page is composed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default = "default_anchors")]
    pub anchors: Vec<NavAnchor>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub technologies: Vec<TechEntry>,
}

/// Section ids in page order: home, about, projects, technologies, contact.
pub const SECTION_IDS: [&str; 5] = ["home", "sobre", "projetos", "tecnologias", "contato"];

fn default_anchors() -> Vec<NavAnchor> {
    SECTION_IDS.iter().map(|id| NavAnchor::new(id)).collect()
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            anchors: default_anchors(),
            projects: vec![
                ProjectRecord {
                    title: "Safira Digital".to_string(),
                    description: "Projeto real desenvolvido para minha empresa aplicando conceitos de UX/UI e SEO.".to_string(),
                    tags: vec!["React".to_string(), "Business".to_string(), "SEO".to_string()],
                    demo_url: "https://arcano5.github.io/SafiraDigital/".to_string(),
                    source_url: "https://github.com/Arcano5/SafiraDigital.git".to_string(),
                    image: Some("/safira-print.png".to_string()),
                },
                ProjectRecord {
                    title: "Verificador de Notas de Alunos".to_string(),
                    description: "Aplicação funcional para gestão e cálculo de médias escolares de forma offline.".to_string(),
                    tags: vec!["PWA".to_string(), "Service Workers".to_string()],
                    demo_url: "#".to_string(),
                    source_url: "https://github.com/Arcano5/Mini-projetos/tree/42a352e14b8e746e9ba0d903031b172a63e90ff4/%23004%20Calcular%20notas".to_string(),
                    image: Some("/notasdosalunos.png".to_string()),
                },
            ],
            technologies: vec![
                TechEntry {
                    icon: Icon::Layout,
                    name: "React & Hooks".to_string(),
                    description: "Interfaces modernas com estados otimizados.".to_string(),
                },
                TechEntry {
                    icon: Icon::Smartphone,
                    name: "PWA".to_string(),
                    description: "Experiência de app nativo em qualquer navegador.".to_string(),
                },
                TechEntry {
                    icon: Icon::Layers,
                    name: "Microfrontends".to_string(),
                    description: "Arquitetura modular para projetos escaláveis.".to_string(),
                },
                TechEntry {
                    icon: Icon::Zap,
                    name: "Performance".to_string(),
                    description: "Otimização rigorosa de Web Vitals.".to_string(),
                },
            ],
        }
    }
}

impl SiteContent {
    /// Parse content from a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let content: SiteContent = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    /// Read content from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        log::debug!("loaded site content from {}", path.display());
        Self::from_json_str(&raw)
    }

    /// Anchor ids must be non-empty and unique since they become element ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for anchor in &self.anchors {
            if anchor.id.trim().is_empty() {
                return Err(Error::ConfigError("anchor id must not be empty".into()));
            }
            if anchor.id.chars().any(char::is_whitespace) {
                return Err(Error::ConfigError(format!(
                    "anchor id {:?} must not contain whitespace",
                    anchor.id
                )));
            }
            if !seen.insert(anchor.id.as_str()) {
                return Err(Error::ConfigError(format!(
                    "duplicate anchor id {:?}",
                    anchor.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_content_matches_published_site() {
        let c = SiteContent::default();
        assert_eq!(c.projects.len(), 2);
        assert_eq!(c.technologies.len(), 4);
        let ids: Vec<_> = c.anchors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, SECTION_IDS);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn json_content_fills_defaults() {
        let json = r##"{
            "projects": [
                {"title": "A", "description": "d", "demo_url": "#", "source_url": "https://x"}
            ],
            "technologies": [
                {"icon": "zap", "name": "Speed", "description": "fast"}
            ]
        }"##;
        let c = SiteContent::from_json_str(json).expect("parse");
        assert!(c.projects[0].tags.is_empty());
        assert!(c.projects[0].image.is_none());
        assert_eq!(c.projects[0].demo_url, "#");
        assert_eq!(c.technologies[0].icon, Icon::Zap);
        assert_eq!(c.anchors.len(), 5);
        assert_eq!(c.profile.initials, "LG");
    }

    #[test]
    fn unknown_icon_is_rejected() {
        let json = r#"{"technologies": [{"icon": "rocket", "name": "n", "description": "d"}]}"#;
        assert!(matches!(
            SiteContent::from_json_str(json),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn duplicate_anchor_is_rejected() {
        let mut c = SiteContent::default();
        c.anchors.push(NavAnchor::new("home"));
        assert!(matches!(c.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn anchor_label_falls_back_to_id() {
        let a = NavAnchor::new("sobre");
        assert_eq!(a.label(), "sobre");
        let b = NavAnchor {
            id: "sobre".into(),
            label: Some("About".into()),
        };
        assert_eq!(b.label(), "About");
    }

    #[test]
    fn glyph_is_sized_svg() {
        let svg = Icon::Zap.glyph(24);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="24""#));
    }
}
