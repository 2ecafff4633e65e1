//! Blocking HTTP access to the GADM boundary service, with a URL-keyed
//! on-disk response cache.
//!
//! Responses never expire: the upstream dataset is versioned, so the
//! content behind a given URL does not change.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

use crate::error::Error;

const USER_AGENT: &str = concat!("gadm-rs/", env!("CARGO_PKG_VERSION"));

/// Boundary file URL for a country and level.
pub fn boundary_url(iso3: &str, level: u8) -> String {
    format!("https://geodata.ucdavis.edu/gadm/gadm4.1/json/gadm41_{iso3}_{level}.json")
}

/// HTTP client for the boundary service.
pub struct BoundaryClient {
    http: Client,
    cache_dir: PathBuf,
}

impl BoundaryClient {
    /// Client caching under the system temp directory.
    pub fn new() -> Self {
        Self::with_cache_dir(std::env::temp_dir().join("gadm-cache"))
    }

    /// Client with an explicit cache directory (used by tests and the
    /// refresh tool).
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self {
            http: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(60))
                .build()
                .expect("failed to create HTTP client"),
            cache_dir,
        }
    }

    /// GET a URL, serving repeats from the on-disk cache.
    pub fn get(&self, url: &str) -> Result<String, Error> {
        let path = self.cache_path(url);
        if let Ok(cached) = fs::read_to_string(&path) {
            debug!(url, "cache hit");
            return Ok(cached);
        }

        debug!(url, "fetching");
        let body = self.fetch(url)?;

        // A failed cache write is not fatal; the next call refetches.
        if fs::create_dir_all(&self.cache_dir).is_ok() {
            let _ = fs::write(&path, &body);
        }
        Ok(body)
    }

    fn fetch(&self, url: &str) -> Result<String, Error> {
        let wrap = |reason: String| Error::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| wrap(e.to_string()))?
            .error_for_status()
            .map_err(|e| wrap(e.to_string()))?;
        response.text().map_err(|e| wrap(e.to_string()))
    }

    /// Cache file for a URL (xxh64 of the URL as the name).
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{:016x}.json", xxh64(url.as_bytes(), 0)))
    }
}

impl Default for BoundaryClient {
    fn default() -> Self {
        Self::new()
    }
}
