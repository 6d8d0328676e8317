//! This module provides the main entry point for the yr.no client. It wires
//! the document loader (disk cache + fetch) to the assembly step and hands
//! back a populated [`Location`].

use crate::assemble;
use crate::document::{DocumentLoader, Language};
use crate::error::YrError;
use crate::types::Location;
use crate::utils::{default_cache_dir, ensure_cache_dir_exists};
use bon::bon;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CACHE_TTL_MINUTES: u64 = 10;

/// The client for the yr.no XML weather service.
///
/// Raw service documents are cached on disk; parsing happens on every call,
/// so each returned [`Location`] is an independent value.
///
/// Create an instance with [`Yr::new()`] for the default cache directory or
/// [`Yr::with_cache_folder()`] to control where the documents are stored.
///
/// # Examples
///
/// ```no_run
/// # use yrno::{Yr, YrError};
/// # async fn run() -> Result<(), YrError> {
/// let client = Yr::new().await?;
/// let oslo = client.location().place("Norway/Oslo/Oslo/Oslo").call().await?;
/// println!("{} ({})", oslo.name(), oslo.country());
/// # Ok(())
/// # }
/// ```
pub struct Yr {
    loader: DocumentLoader,
}

#[bon]
impl Yr {
    /// Creates a client with a specific cache directory, creating the
    /// directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`YrError::CacheDirCreation`] when the directory cannot be
    /// created or the path points at something that is not a directory.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Yr, YrError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| YrError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Yr {
            loader: DocumentLoader::new(&cache_folder),
        })
    }

    /// Creates a client using the default cache directory (the system cache
    /// directory via the `dirs` crate, e.g. `~/.cache/yrno_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`YrError::CacheDirResolution`] when no system cache
    /// directory can be determined, or [`YrError::CacheDirCreation`] when it
    /// cannot be created.
    pub async fn new() -> Result<Yr, YrError> {
        let cache_folder = default_cache_dir().map_err(YrError::CacheDirResolution)?;
        Yr::with_cache_folder(cache_folder).await
    }

    /// Fetches and assembles the weather for one place.
    ///
    /// The place is the path as the yr.no site spells it, e.g.
    /// `Norway/Oslo/Oslo/Oslo` for
    /// `http://www.yr.no/place/Norway/Oslo/Oslo/Oslo/`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.place(&str)`: **Required.** The place path.
    /// * `.language(Language)`: Optional. URL language segment, defaults to
    ///   [`Language::English`].
    /// * `.cache_ttl_minutes(u64)`: Optional. How long cached documents stay
    ///   fresh. Defaults to 10 minutes.
    ///
    /// # Errors
    ///
    /// Returns [`YrError::InvalidPlace`] for an empty or blank place before
    /// any I/O, a [`YrError::Document`] variant when the probe rejects the
    /// place or fetching fails with no cache to fall back on, and a
    /// [`YrError::Assemble`] variant when the documents cannot be turned
    /// into a [`Location`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use yrno::{Language, Yr, YrError};
    /// # async fn run() -> Result<(), YrError> {
    /// let client = Yr::new().await?;
    /// let sandefjord = client
    ///     .location()
    ///     .place("Norway/Vestfold/Sandefjord/Sandefjord")
    ///     .language(Language::Norwegian)
    ///     .cache_ttl_minutes(30)
    ///     .call()
    ///     .await?;
    ///
    /// if let Some(current) = sandefjord.current_forecast() {
    ///     println!("now: {:?} {:?}", current.symbol_name(), current.temperature_value());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn location(
        &self,
        place: &str,
        language: Option<Language>,
        cache_ttl_minutes: Option<u64>,
    ) -> Result<Location, YrError> {
        if place.trim().is_empty() {
            return Err(YrError::InvalidPlace);
        }

        let language = language.unwrap_or_default();
        let cache_ttl =
            Duration::from_secs(cache_ttl_minutes.unwrap_or(DEFAULT_CACHE_TTL_MINUTES) * 60);

        let documents = self
            .loader
            .fetch_documents(place, language, cache_ttl)
            .await?;

        Ok(assemble::assemble_location(
            &documents.periodic,
            &documents.hourly,
        )?)
    }

    /// Assembles a [`Location`] from documents the caller already has, e.g.
    /// from tests or an alternate transport. No fetching, no cache.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use yrno::{Yr, YrError};
    /// # fn run() -> Result<(), YrError> {
    /// let periodic = std::fs::read_to_string("forecast.xml").unwrap();
    /// let hourly = std::fs::read_to_string("forecast_hour_by_hour.xml").unwrap();
    ///
    /// let location = Yr::location_from_xml(&periodic, &hourly)?;
    /// println!("{} hourly forecasts", location.hourly_forecasts().len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn location_from_xml(periodic_xml: &str, hourly_xml: &str) -> Result<Location, YrError> {
        Ok(assemble::assemble_location(periodic_xml, hourly_xml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::fixtures;
    use tempfile::TempDir;

    #[tokio::test]
    async fn blank_place_is_rejected_before_any_io() {
        let dir = TempDir::new().unwrap();
        let client = Yr::with_cache_folder(dir.path().to_path_buf()).await.unwrap();

        let result = client.location().place("  ").call().await;
        assert!(matches!(result, Err(YrError::InvalidPlace)));
    }

    #[tokio::test]
    async fn client_creates_its_cache_folder() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("yr");
        Yr::with_cache_folder(cache.clone()).await.unwrap();
        assert!(cache.is_dir());
    }

    #[test]
    fn location_from_xml_needs_no_client() {
        let location = Yr::location_from_xml(fixtures::PERIODIC, fixtures::HOURLY).unwrap();
        assert_eq!(location.name(), "Oslo");
        assert_eq!(location.hourly_forecasts().len(), 3);
    }

    #[test]
    fn location_from_xml_has_no_state_between_calls() {
        let first = Yr::location_from_xml(fixtures::PERIODIC, fixtures::HOURLY).unwrap();
        let second = Yr::location_from_xml(fixtures::PERIODIC, fixtures::HOURLY).unwrap();
        assert_eq!(first, second);
    }
}
