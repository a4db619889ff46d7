//! Image resource loaders used by the preview engine.
//!
//! A loader only answers whether a resource can be loaded. Any error is
//! turned into a fallback by the caller and never reaches the page.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Resolves an image `src` to a loadable resource.
pub trait ResourceLoader {
    fn load(&self, src: &str) -> Result<()>;
}

/// Serves site-absolute paths (`/img.png`) from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map `src` to a file under the root; `None` for remote URLs and paths
    /// escaping the root.
    pub fn resolve(&self, src: &str) -> Option<PathBuf> {
        if let Ok(parsed) = url::Url::parse(src) {
            return match parsed.scheme() {
                "file" => parsed.to_file_path().ok(),
                _ => None,
            };
        }
        let rel = Path::new(src.trim_start_matches('/'));
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(rel))
    }
}

impl ResourceLoader for FsLoader {
    fn load(&self, src: &str) -> Result<()> {
        let path = self
            .resolve(src)
            .ok_or_else(|| Error::LoadError(format!("{} is not a local asset", src)))?;
        if path.is_file() {
            Ok(())
        } else {
            Err(Error::LoadError(format!("{} not found", path.display())))
        }
    }
}

/// Fetches resources over HTTP relative to a base URL.
#[cfg(feature = "http")]
pub struct HttpLoader {
    client: reqwest::blocking::Client,
    base: url::Url,
    user_agent: String,
    headers: std::collections::HashMap<String, String>,
}

#[cfg(feature = "http")]
impl HttpLoader {
    pub fn new(config: &crate::SiteConfig, base_url: &str) -> Result<Self> {
        let base = url::Url::parse(base_url)
            .map_err(|e| Error::ConfigError(format!("invalid base URL {}: {}", base_url, e)))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base,
            user_agent: config.user_agent.clone(),
            headers: config.headers.clone(),
        })
    }

    pub fn base(&self) -> &url::Url {
        &self.base
    }
}

#[cfg(feature = "http")]
impl ResourceLoader for HttpLoader {
    fn load(&self, src: &str) -> Result<()> {
        let url = self
            .base
            .join(src)
            .map_err(|e| Error::LoadError(format!("invalid resource URL {}: {}", src, e)))?;
        let mut req = self
            .client
            .get(url.clone())
            .header("User-Agent", self.user_agent.as_str());
        for (k, v) in &self.headers {
            req = req.header(k.as_str(), v.as_str());
        }
        let resp = req
            .send()
            .map_err(|e| Error::NetworkError(format!("GET {} failed: {}", url, e)))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Error::LoadError(format!("GET {} returned {}", url, resp.status())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_loader_finds_existing_asset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("safira-print.png"), b"png").unwrap();
        let loader = FsLoader::new(dir.path());
        assert!(loader.load("/safira-print.png").is_ok());
        assert!(loader.load("safira-print.png").is_ok());
        assert!(matches!(loader.load("/missing.png"), Err(Error::LoadError(_))));
    }

    #[test]
    fn fs_loader_rejects_remote_and_escaping_paths() {
        let loader = FsLoader::new("public");
        assert!(loader.resolve("https://example.com/a.png").is_none());
        assert!(loader.resolve("/../secret.png").is_none());
        assert_eq!(loader.resolve("/a.png"), Some(PathBuf::from("public").join("a.png")));
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_loader_reports_status() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();
        std::thread::spawn(move || {
            for request in server.incoming_requests().take(2) {
                let response = if request.url() == "/ok.png" {
                    tiny_http::Response::from_string("png")
                } else {
                    tiny_http::Response::from_string("Not Found").with_status_code(404)
                };
                let _ = request.respond(response);
            }
        });

        let base = format!("http://{}/", addr);
        let loader = HttpLoader::new(&crate::SiteConfig::default(), &base).unwrap();
        assert!(loader.load("/ok.png").is_ok());
        assert!(matches!(loader.load("/gone.png"), Err(Error::LoadError(_))));
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_loader_rejects_bad_base() {
        assert!(matches!(
            HttpLoader::new(&crate::SiteConfig::default(), "not a url"),
            Err(Error::ConfigError(_))
        ));
    }
}
