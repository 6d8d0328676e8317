mod attribute_bag;
mod error;
mod forecast;
mod location;
mod textual_forecast;
mod weather_station;

pub use attribute_bag::AttributeBag;
pub use error::ParseError;
pub use forecast::Forecast;
pub use location::{Location, PlaceInfo};
pub use textual_forecast::TextualForecast;
pub use weather_station::WeatherStation;

use crate::xml::XmlMap;
use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp format used throughout the service's XML payloads.
pub(crate) const XML_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Day-granularity format used by textual forecasts.
pub(crate) const XML_DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_xml_datetime(
    field: &'static str,
    value: &str,
) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, XML_DATETIME_FORMAT).map_err(|source| {
        ParseError::InvalidTimestamp {
            field,
            value: value.to_string(),
            source,
        }
    })
}

pub(crate) fn parse_xml_date(field: &'static str, value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value, XML_DATE_FORMAT).map_err(|source| {
        ParseError::InvalidTimestamp {
            field,
            value: value.to_string(),
            source,
        }
    })
}

pub(crate) fn required_text<'a>(
    data: &'a XmlMap,
    entity: &'static str,
    field: &'static str,
) -> Result<&'a str, ParseError> {
    data.text(field)
        .ok_or(ParseError::MissingField { entity, field })
}
