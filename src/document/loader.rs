use crate::document::error::DocumentError;
use crate::document::Language;
use log::{info, warn};
use reqwest::{header, Client, StatusCode};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::{fs, task};

const CACHE_PREFIX: &str = "yrno_";

/// Rarely-visited places answer HTTP 500 for the first handful of requests,
/// so the probe keeps going this many times before giving up.
const PROBE_ATTEMPTS: usize = 7;

/// Outcome of probing the service before a first-time fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// HTTP 200 with an XML content type.
    Ok,
    /// HTTP 200 with a non-XML content type, or HTTP 404. Usually a place
    /// path that does not match the service's naming.
    LocationInvalid,
    /// No conclusive answer after all probe attempts.
    Unknown,
}

/// The two raw XML documents describing one place.
#[derive(Debug, Clone)]
pub struct LocationDocuments {
    pub periodic: String,
    pub hourly: String,
}

/// Fetches the service documents, keeping a copy of each on disk and
/// re-downloading only once the copy is older than the caller's TTL.
pub struct DocumentLoader {
    cache_dir: PathBuf,
    client: Client,
}

impl DocumentLoader {
    pub fn new(cache_dir: &Path) -> DocumentLoader {
        DocumentLoader {
            cache_dir: cache_dir.to_path_buf(),
            client: Client::new(),
        }
    }

    /// Fetches the periodic and hourly documents for a place. On a first
    /// fetch (no cache files yet) the service is probed first so an invalid
    /// place fails fast with a clear error.
    pub async fn fetch_documents(
        &self,
        place: &str,
        language: Language,
        cache_ttl: Duration,
    ) -> Result<LocationDocuments, DocumentError> {
        let base_url = language.base_url();
        let location_url = format!("{base_url}{place}");

        let periodic_path = self.cache_path(&base_url, place, "periodic");
        let hourly_path = self.cache_path(&base_url, place, "hourly");

        let have_cache = fs::metadata(&periodic_path).await.is_ok()
            && fs::metadata(&hourly_path).await.is_ok();
        if !have_cache {
            match self.service_status(&location_url).await? {
                ServiceStatus::Ok => {}
                ServiceStatus::LocationInvalid => {
                    return Err(DocumentError::LocationInvalid {
                        place: place.to_string(),
                    });
                }
                ServiceStatus::Unknown => {
                    return Err(DocumentError::ServiceUnknown {
                        url: location_url,
                        attempts: PROBE_ATTEMPTS,
                    });
                }
            }
        }

        let periodic = self
            .fetch_with_cache(&format!("{location_url}/forecast.xml"), &periodic_path, cache_ttl)
            .await?;
        let hourly = self
            .fetch_with_cache(
                &format!("{location_url}/forecast_hour_by_hour.xml"),
                &hourly_path,
                cache_ttl,
            )
            .await?;

        Ok(LocationDocuments { periodic, hourly })
    }

    /// Probes the service for a place URL. The hourly endpoint answers
    /// first; only when it is OK does the periodic endpoint's answer decide.
    pub async fn service_status(&self, location_url: &str) -> Result<ServiceStatus, DocumentError> {
        let hourly = self
            .endpoint_status(&format!("{location_url}/forecast_hour_by_hour.xml"))
            .await?;
        if hourly != ServiceStatus::Ok {
            return Ok(hourly);
        }

        self.endpoint_status(&format!("{location_url}/forecast.xml"))
            .await
    }

    async fn endpoint_status(&self, url: &str) -> Result<ServiceStatus, DocumentError> {
        for _ in 0..PROBE_ATTEMPTS {
            let response = self
                .client
                .head(url)
                .send()
                .await
                .map_err(|e| DocumentError::NetworkRequest(url.to_string(), e))?;
            let status = response.status();

            // HTTP 500 only burns one attempt.
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                continue;
            }

            let is_xml = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.contains("text/xml"));

            if status == StatusCode::NOT_FOUND || (status == StatusCode::OK && !is_xml) {
                return Ok(ServiceStatus::LocationInvalid);
            }
            if status == StatusCode::OK && is_xml {
                return Ok(ServiceStatus::Ok);
            }
        }

        warn!("no conclusive service state for {url} after {PROBE_ATTEMPTS} attempts");
        Ok(ServiceStatus::Unknown)
    }

    /// Returns the cached document when it is younger than `ttl`, otherwise
    /// re-fetches. A fetch that fails or comes back empty falls back to the
    /// stale cache when one exists; only a non-empty response rewrites it.
    pub(crate) async fn fetch_with_cache(
        &self,
        url: &str,
        cache_path: &Path,
        ttl: Duration,
    ) -> Result<String, DocumentError> {
        if self.cache_fresh(cache_path, ttl).await? {
            info!("cache hit for {url} at {}", cache_path.display());
            return fs::read_to_string(cache_path)
                .await
                .map_err(|e| DocumentError::CacheRead(cache_path.to_path_buf(), e));
        }

        warn!("cache miss for {url}, downloading");
        match self.download(url).await {
            Ok(body) if !body.is_empty() => {
                self.write_cache(cache_path, &body).await?;
                info!("cached document for {url} to {}", cache_path.display());
                Ok(body)
            }
            Ok(_) => self.stale_fallback(url, cache_path, None).await,
            Err(error) => self.stale_fallback(url, cache_path, Some(error)).await,
        }
    }

    async fn stale_fallback(
        &self,
        url: &str,
        cache_path: &Path,
        error: Option<DocumentError>,
    ) -> Result<String, DocumentError> {
        if fs::metadata(cache_path).await.is_ok() {
            warn!("fetch for {url} yielded nothing, falling back to stale cache");
            return fs::read_to_string(cache_path)
                .await
                .map_err(|e| DocumentError::CacheRead(cache_path.to_path_buf(), e));
        }

        Err(error.unwrap_or_else(|| DocumentError::EmptyResponse {
            url: url.to_string(),
        }))
    }

    async fn cache_fresh(&self, cache_path: &Path, ttl: Duration) -> Result<bool, DocumentError> {
        let metadata = match fs::metadata(cache_path).await {
            Ok(metadata) => metadata,
            Err(_) => return Ok(false),
        };

        let modified = metadata
            .modified()
            .map_err(|e| DocumentError::CacheMetadataRead(cache_path.to_path_buf(), e))?;
        let age = modified
            .elapsed()
            .map_err(|e| DocumentError::CacheAge(cache_path.to_path_buf(), e))?;

        Ok(age <= ttl)
    }

    async fn download(&self, url: &str) -> Result<String, DocumentError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DocumentError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(error) => {
                warn!("HTTP error for {url}: {error:?}");
                return Err(match error.status() {
                    Some(status) => DocumentError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: error,
                    },
                    None => DocumentError::NetworkRequest(url.to_string(), error),
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| DocumentError::NetworkRequest(url.to_string(), e))
    }

    async fn write_cache(&self, cache_path: &Path, body: &str) -> Result<(), DocumentError> {
        let cache_dir = self.cache_dir.clone();
        let cache_path = cache_path.to_path_buf();
        let body = body.to_string();

        task::spawn_blocking(move || {
            // The temp file lives in the cache dir so the final rename stays
            // on one filesystem.
            let mut temp = NamedTempFile::new_in(&cache_dir)
                .map_err(|e| DocumentError::CacheWrite(cache_path.clone(), e))?;
            temp.write_all(body.as_bytes())
                .map_err(|e| DocumentError::CacheWrite(cache_path.clone(), e))?;
            temp.persist(&cache_path)
                .map_err(|e| DocumentError::CacheWrite(cache_path, e.error))?;
            Ok::<(), DocumentError>(())
        })
        .await??;

        Ok(())
    }

    pub(crate) fn cache_path(&self, base_url: &str, place: &str, suffix: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        base_url.hash(&mut hasher);
        place.hash(&mut hasher);

        self.cache_dir
            .join(format!("{CACHE_PREFIX}{:016x}_{suffix}.xml", hasher.finish()))
    }
}
