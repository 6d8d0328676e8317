use crate::types::{Forecast, TextualForecast, WeatherStation};
use chrono::{Duration, NaiveDateTime, Utc};
use std::collections::HashMap;

/// Place metadata extracted from the periodic document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceInfo {
    pub name: String,
    /// The place category, e.g. `By` (city).
    pub kind: String,
    pub country: String,
    /// IANA timezone id, e.g. `Europe/Oslo`.
    pub timezone: String,
    /// Decimal degrees, verbatim as the service printed them.
    pub latitude: String,
    pub longitude: String,
}

/// The root aggregate for one place: forecast collections, metadata, credit
/// and sun times from one pair of service documents.
///
/// A `Location` is built once per fetch-and-parse cycle and read-only after
/// assembly; the setters exist for the assembly step itself. Nothing is
/// shared between instances, so two assemblies of identical documents
/// compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    place: PlaceInfo,
    forecasts_hourly: Vec<Forecast>,
    forecasts_periodic: Vec<Forecast>,
    textual_forecasts: Vec<TextualForecast>,
    weather_stations: Vec<WeatherStation>,
    links: HashMap<String, String>,
    credit_text: Option<String>,
    credit_url: Option<String>,
    last_updated: NaiveDateTime,
    next_update: NaiveDateTime,
    sunrise: Option<NaiveDateTime>,
    sunset: Option<NaiveDateTime>,
}

impl Location {
    pub fn new(
        place: PlaceInfo,
        forecasts_periodic: Vec<Forecast>,
        forecasts_hourly: Vec<Forecast>,
        last_updated: NaiveDateTime,
        next_update: NaiveDateTime,
    ) -> Location {
        Location {
            place,
            forecasts_hourly,
            forecasts_periodic,
            textual_forecasts: Vec::new(),
            weather_stations: Vec::new(),
            links: HashMap::new(),
            credit_text: None,
            credit_url: None,
            last_updated,
            next_update,
            sunrise: None,
            sunset: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.place.name
    }

    pub fn kind(&self) -> &str {
        &self.place.kind
    }

    pub fn country(&self) -> &str {
        &self.place.country
    }

    pub fn timezone(&self) -> &str {
        &self.place.timezone
    }

    pub fn latitude(&self) -> &str {
        &self.place.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.place.longitude
    }

    pub fn lat_long(&self) -> (&str, &str) {
        (&self.place.latitude, &self.place.longitude)
    }

    /// Named links to the service frontend for this place.
    pub fn links(&self) -> &HashMap<String, String> {
        &self.links
    }

    pub fn add_link(&mut self, name: &str, url: &str) {
        self.links.insert(name.to_string(), url.to_string());
    }

    /// The hour-by-hour forecasts, in document order (chronological as
    /// published; no sorting happens here).
    pub fn hourly_forecasts(&self) -> &[Forecast] {
        &self.forecasts_hourly
    }

    /// The few-times-daily forecasts, in document order.
    pub fn periodic_forecasts(&self) -> &[Forecast] {
        &self.forecasts_periodic
    }

    /// Hourly forecasts whose interval start lies in `[from, to]`, both ends
    /// inclusive. An unset `from` defaults to now, an unset `to` to one year
    /// from now; each bound defaults independently.
    pub fn hourly_forecasts_between(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Vec<&Forecast> {
        forecasts_between(&self.forecasts_hourly, from, to)
    }

    /// Same window query as [`hourly_forecasts_between`](Self::hourly_forecasts_between),
    /// over the periodic list.
    pub fn periodic_forecasts_between(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Vec<&Forecast> {
        forecasts_between(&self.forecasts_periodic, from, to)
    }

    /// The hourly forecast starting exactly at `time`, if any.
    pub fn forecast_at(&self, time: NaiveDateTime) -> Option<&Forecast> {
        forecasts_between(&self.forecasts_hourly, Some(time), Some(time))
            .into_iter()
            .next()
    }

    /// First entry of the hourly list, or `None` when the document carried
    /// no usable hourly forecasts.
    pub fn current_forecast(&self) -> Option<&Forecast> {
        self.forecasts_hourly.first()
    }

    /// Textual forecasts. Always Norwegian, and absent for most places
    /// outside Norway.
    pub fn textual_forecasts(&self) -> &[TextualForecast] {
        &self.textual_forecasts
    }

    pub fn set_textual_forecasts(&mut self, forecasts: Vec<TextualForecast>) {
        self.textual_forecasts = forecasts;
    }

    /// Observation stations near the place; absent for most places outside
    /// Norway.
    pub fn weather_stations(&self) -> &[WeatherStation] {
        &self.weather_stations
    }

    pub fn set_weather_stations(&mut self, stations: Vec<WeatherStation>) {
        self.weather_stations = stations;
    }

    /// When the service generated the documents.
    pub fn last_updated(&self) -> NaiveDateTime {
        self.last_updated
    }

    /// When the service plans to refresh them.
    pub fn next_update(&self) -> NaiveDateTime {
        self.next_update
    }

    pub fn sunrise(&self) -> Option<NaiveDateTime> {
        self.sunrise
    }

    pub fn set_sunrise(&mut self, time: NaiveDateTime) {
        self.sunrise = Some(time);
    }

    pub fn sunset(&self) -> Option<NaiveDateTime> {
        self.sunset
    }

    pub fn set_sunset(&mut self, time: NaiveDateTime) {
        self.sunset = Some(time);
    }

    /// Attribution text the service terms require to be shown with the data.
    pub fn credit_text(&self) -> Option<&str> {
        self.credit_text.as_deref()
    }

    pub fn credit_url(&self) -> Option<&str> {
        self.credit_url.as_deref()
    }

    pub fn set_credit(&mut self, text: &str, url: &str) {
        self.credit_text = Some(text.to_string());
        self.credit_url = Some(url.to_string());
    }
}

fn forecasts_between<'a>(
    forecasts: &'a [Forecast],
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
) -> Vec<&'a Forecast> {
    let from = from.unwrap_or_else(|| Utc::now().naive_utc());
    let to = to.unwrap_or_else(|| Utc::now().naive_utc() + Duration::days(365));

    forecasts
        .iter()
        .filter(|forecast| {
            forecast
                .valid_from()
                .is_some_and(|start| start >= from && start <= to)
        })
        .collect()
}
