//! Preview engine against a served site and files on disk

use std::sync::{Arc, Mutex};

use folio::{FsLoader, PreviewEngine, SiteConfig, SiteContent, Visible};

fn rendered() -> String {
    folio::PageComposer::new(SiteContent::default())
        .with_year(2025)
        .compose()
        .render_document(&SiteConfig::default())
}

#[cfg(feature = "http")]
#[test]
fn served_site_with_one_missing_asset() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let page = rendered();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = match request.url() {
                "/" => tiny_http::Response::from_string(page.clone()).with_header(
                    "Content-Type: text/html; charset=utf-8"
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                ),
                "/MinhaImagem.png" | "/safira-print.png" => tiny_http::Response::from_string("png"),
                _ => tiny_http::Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    let base = format!("http://{}/", addr);
    let config = SiteConfig::default();
    let mut engine = PreviewEngine::new(config.clone()).expect("engine");
    engine.load_url(&base).expect("load");

    let loader = folio::HttpLoader::new(&config, &base).expect("loader");
    let events = engine.resolve_images(&loader).expect("resolve");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].src, "/notasdosalunos.png");

    let snap = engine.page_snapshot().unwrap();
    assert_eq!(snap.project_slot(0).unwrap().visible, Visible::Image);
    assert_eq!(snap.project_slot(1).unwrap().visible, Visible::Placeholder);
    assert_eq!(snap.slots[0].visible, Visible::Image);
}

#[cfg(feature = "http")]
#[test]
fn load_url_reports_http_errors() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let _ = request.respond(tiny_http::Response::from_string("gone").with_status_code(404));
        }
    });
    let mut engine = PreviewEngine::new(SiteConfig::default()).unwrap();
    let err = engine.load_url(&format!("http://{}/", addr)).unwrap_err();
    assert!(matches!(err, folio::Error::LoadError(_)));
}

#[cfg(feature = "http")]
#[test]
fn load_url_sends_configured_headers() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let page = rendered();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let authorized = request.headers().iter().any(|h| {
                h.field.equiv("X-Preview-Token") && h.value.as_str() == "secret"
            });
            let response = if authorized {
                tiny_http::Response::from_string(page)
            } else {
                tiny_http::Response::from_string("forbidden").with_status_code(403)
            };
            let _ = request.respond(response);
        }
    });

    let mut config = SiteConfig::default();
    config
        .headers
        .insert("X-Preview-Token".to_string(), "secret".to_string());
    let mut engine = PreviewEngine::new(config).unwrap();
    engine
        .load_url(&format!("http://{}/", addr))
        .expect("header should authorize the request");
    assert_eq!(engine.page_snapshot().unwrap().projects.len(), 2);
}

#[test]
fn file_site_with_asset_directory() {
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("index.html");
    std::fs::write(&index, rendered()).unwrap();
    let assets = dir.path().join("public");
    std::fs::create_dir(&assets).unwrap();
    std::fs::write(assets.join("safira-print.png"), b"png").unwrap();
    std::fs::write(assets.join("notasdosalunos.png"), b"png").unwrap();

    let loaded = Arc::new(Mutex::new(Vec::new()));
    let sink = loaded.clone();
    let mut engine = PreviewEngine::new(SiteConfig::default()).unwrap();
    engine.on_load(move |snap| sink.lock().unwrap().push(snap.title.clone()));
    engine.load_file(&index).unwrap();
    assert_eq!(loaded.lock().unwrap().as_slice(), ["Leonildo Freitas Gomes | Portfolio"]);

    let events = engine.resolve_images(&FsLoader::new(&assets)).unwrap();
    // only the portrait is missing; it falls back to initials
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].slot, 0);
    let snap = engine.page_snapshot().unwrap();
    assert_eq!(snap.slots[0].visible, Visible::Placeholder);
    assert_eq!(snap.slots[0].fallback_activations, 1);
    assert_eq!(snap.project_slot(0).unwrap().visible, Visible::Image);
    assert_eq!(snap.project_slot(1).unwrap().visible, Visible::Image);

    let text = engine.render_text_snapshot().unwrap();
    assert!(text.url.starts_with("file://"));
    assert!(text.text.contains("LG"));
    assert!(!text.text.contains("Screenshot do Projeto"));
}

#[test]
fn load_file_missing_is_load_error() {
    let mut engine = PreviewEngine::new(SiteConfig::default()).unwrap();
    assert!(matches!(
        engine.load_file("/definitely/not/here.html"),
        Err(folio::Error::LoadError(_))
    ));
}
