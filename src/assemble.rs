//! Turns the two raw service documents into one populated [`Location`].
//! Individual forecast, textual-forecast and station nodes that fail to
//! parse are skipped: the upstream data is known to be occasionally
//! incomplete, and a partial-but-usable location beats no location.

use crate::types::{
    parse_xml_datetime, Forecast, Location, ParseError, PlaceInfo, TextualForecast, WeatherStation,
};
use crate::xml::{self, XmlElement, XmlError};
use chrono::NaiveDateTime;
use log::{info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("missing required metadata field '{field}'")]
    MissingMetadata { field: &'static str },

    #[error("invalid metadata field '{field}'")]
    Metadata {
        field: &'static str,
        #[source]
        source: ParseError,
    },
}

/// Result of parsing a list of sibling nodes: whatever parsed, plus how many
/// siblings were dropped on the way.
pub(crate) struct ParsedBatch<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

pub(crate) fn assemble_location(
    periodic_xml: &str,
    hourly_xml: &str,
) -> Result<Location, AssembleError> {
    let periodic = xml::parse_document(periodic_xml)?;
    let hourly = xml::parse_document(hourly_xml)?;

    let forecasts_periodic =
        collect_items("periodic forecast", tabular_times(&periodic), Forecast::from_xml);
    let forecasts_hourly =
        collect_items("hourly forecast", tabular_times(&hourly), Forecast::from_xml);

    // Not every place has these sections; absence is normal.
    let textual_forecasts = collect_items(
        "textual forecast",
        textual_times(&hourly),
        TextualForecast::from_xml,
    );
    let weather_stations = collect_items(
        "weather station",
        observation_stations(&hourly),
        WeatherStation::from_xml,
    );

    let place = place_info(&periodic)?;
    let (last_updated, next_update) = update_times(&periodic)?;

    let mut location = Location::new(
        place,
        forecasts_periodic.items,
        forecasts_hourly.items,
        last_updated,
        next_update,
    );
    location.set_textual_forecasts(textual_forecasts.items);
    location.set_weather_stations(weather_stations.items);

    for link in periodic
        .child("links")
        .into_iter()
        .flat_map(|links| links.children("link"))
    {
        match (link.attribute("id"), link.attribute("url")) {
            (Some(id), Some(url)) => location.add_link(id, url),
            _ => warn!("skipping link without id/url"),
        }
    }

    if let Some(credit) = periodic.child("credit").and_then(|credit| credit.child("link")) {
        if let (Some(text), Some(url)) = (credit.attribute("text"), credit.attribute("url")) {
            location.set_credit(text, url);
        }
    }

    if let Some(sun) = periodic.child("sun") {
        if let Some(rise) = sun.attribute("rise") {
            location.set_sunrise(metadata_datetime("rise", rise)?);
        }
        if let Some(set) = sun.attribute("set") {
            location.set_sunset(metadata_datetime("set", set)?);
        }
    }

    Ok(location)
}

pub(crate) fn collect_items<'a, T>(
    label: &str,
    nodes: impl Iterator<Item = &'a XmlElement>,
    parse: impl Fn(&XmlElement) -> Result<T, ParseError>,
) -> ParsedBatch<T> {
    let mut items = Vec::new();
    let mut skipped = 0;

    for node in nodes {
        match parse(node) {
            Ok(item) => items.push(item),
            Err(error) => {
                warn!("skipping {label} entry: {error}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        info!("parsed {} {label} entries, skipped {skipped}", items.len());
    }

    ParsedBatch { items, skipped }
}

fn tabular_times(document: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    document
        .child("forecast")
        .and_then(|forecast| forecast.child("tabular"))
        .into_iter()
        .flat_map(|tabular| tabular.children("time"))
}

fn textual_times(document: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    document
        .child("forecast")
        .and_then(|forecast| forecast.child("text"))
        .and_then(|text| text.child("location"))
        .into_iter()
        .flat_map(|location| location.children("time"))
}

fn observation_stations(document: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    document
        .child("observations")
        .into_iter()
        .flat_map(|observations| observations.children("weatherstation"))
}

fn place_info(periodic: &XmlElement) -> Result<PlaceInfo, AssembleError> {
    let location = periodic
        .child("location")
        .ok_or(AssembleError::MissingMetadata { field: "location" })?;
    let data = location.convert();

    let meta_text = |field: &'static str| {
        data.text(field)
            .map(str::to_string)
            .ok_or(AssembleError::MissingMetadata { field })
    };

    Ok(PlaceInfo {
        name: meta_text("name")?,
        kind: meta_text("type")?,
        country: meta_text("country")?,
        timezone: data
            .map("timezone")
            .and_then(|timezone| timezone.text("id"))
            .map(str::to_string)
            .ok_or(AssembleError::MissingMetadata { field: "timezone id" })?,
        latitude: data
            .map("location")
            .and_then(|position| position.text("latitude"))
            .map(str::to_string)
            .ok_or(AssembleError::MissingMetadata { field: "latitude" })?,
        longitude: data
            .map("location")
            .and_then(|position| position.text("longitude"))
            .map(str::to_string)
            .ok_or(AssembleError::MissingMetadata { field: "longitude" })?,
    })
}

fn update_times(periodic: &XmlElement) -> Result<(NaiveDateTime, NaiveDateTime), AssembleError> {
    let meta = periodic
        .child("meta")
        .ok_or(AssembleError::MissingMetadata { field: "meta" })?;
    let data = meta.convert();

    let last_updated = data
        .text("lastupdate")
        .ok_or(AssembleError::MissingMetadata { field: "lastupdate" })
        .and_then(|value| metadata_datetime("lastupdate", value))?;
    let next_update = data
        .text("nextupdate")
        .ok_or(AssembleError::MissingMetadata { field: "nextupdate" })
        .and_then(|value| metadata_datetime("nextupdate", value))?;

    Ok((last_updated, next_update))
}

fn metadata_datetime(field: &'static str, value: &str) -> Result<NaiveDateTime, AssembleError> {
    parse_xml_datetime(field, value).map_err(|source| AssembleError::Metadata { field, source })
}
