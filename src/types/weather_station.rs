use crate::types::error::ParseError;
use crate::types::{required_text, AttributeBag, Forecast};
use crate::xml::XmlElement;

const ENTITY: &str = "weather station";

/// A nearby observation point. The embedded forecast is partial: only the
/// sub-fields the station reported are set, and `from`/`to`, precipitation
/// and pressure stay absent.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherStation {
    name: String,
    distance: i64,
    latitude: String,
    longitude: String,
    source: String,
    forecast: Forecast,
}

impl WeatherStation {
    pub fn from_xml(element: &XmlElement) -> Result<WeatherStation, ParseError> {
        let data = element.convert();

        let name = required_text(&data, ENTITY, "name")?.to_string();
        let distance_raw = required_text(&data, ENTITY, "distance")?;
        let distance = distance_raw
            .parse()
            .map_err(|_| ParseError::InvalidNumber {
                field: "distance",
                value: distance_raw.to_string(),
            })?;
        let latitude = required_text(&data, ENTITY, "lat")?.to_string();
        let longitude = required_text(&data, ENTITY, "lon")?.to_string();
        let source = required_text(&data, ENTITY, "source")?.to_string();

        let mut forecast = Forecast::default();
        if let Some(value) = data.get("symbol") {
            forecast.set_symbol(AttributeBag::from_value(value));
        }
        if let Some(value) = data.get("temperature") {
            forecast.set_temperature(AttributeBag::from_value(value));
        }
        if let Some(value) = data.get("windDirection") {
            forecast.set_wind_direction(AttributeBag::from_value(value));
        }
        if let Some(value) = data.get("windSpeed") {
            forecast.set_wind_speed(AttributeBag::from_value(value));
        }

        Ok(WeatherStation {
            name,
            distance,
            latitude,
            longitude,
            source,
            forecast,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distance from the forecast location, in meters as reported.
    pub fn distance(&self) -> i64 {
        self.distance
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn lat_long(&self) -> (&str, &str) {
        (&self.latitude, &self.longitude)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The current observation as a partial forecast. Callers must not
    /// assume completeness.
    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    const STATION_NODE: &str = r#"<weatherstation stno="18700" sttype="DNMI"
          name="Oslo (Blindern)" distance="2413" lat="59.9423" lon="10.72"
          source="Meteorologisk institutt">
        <symbol number="4" name="Skyet" var="04"/>
        <temperature unit="celsius" value="16.9"/>
        <windDirection deg="179.3" code="S" name="Sør"/>
        <windSpeed mps="1.5" name="Flau vind"/>
      </weatherstation>"#;

    #[test]
    fn parses_a_station_with_observations() {
        let station =
            WeatherStation::from_xml(&parse_document(STATION_NODE).unwrap()).unwrap();

        assert_eq!(station.name(), "Oslo (Blindern)");
        assert_eq!(station.distance(), 2413);
        assert_eq!(station.lat_long(), ("59.9423", "10.72"));
        assert_eq!(station.source(), "Meteorologisk institutt");

        let forecast = station.forecast();
        assert_eq!(forecast.symbol_name(), Some("Skyet"));
        assert_eq!(forecast.temperature_value(), Some("16.9"));
        assert_eq!(forecast.wind_direction_code(), Some("S"));
        assert_eq!(forecast.wind_speed_mps(), Some("1.5"));
    }

    #[test]
    fn embedded_forecast_stays_partial() {
        let station =
            WeatherStation::from_xml(&parse_document(STATION_NODE).unwrap()).unwrap();

        let forecast = station.forecast();
        assert_eq!(forecast.valid_from(), None);
        assert_eq!(forecast.valid_to(), None);
        assert!(forecast.precipitation().is_empty());
        assert!(forecast.pressure().is_empty());
    }

    #[test]
    fn missing_observations_do_not_fail_the_station() {
        let station = WeatherStation::from_xml(
            &parse_document(
                r#"<weatherstation name="Oslo (Alna)" distance="5407"
                     lat="59.9273" lon="10.8345" source="Meteorologisk institutt"/>"#,
            )
            .unwrap(),
        )
        .unwrap();

        assert!(station.forecast().symbol().is_empty());
        assert!(station.forecast().wind_speed().is_empty());
    }

    #[test]
    fn missing_identity_fields_fail() {
        let result = WeatherStation::from_xml(
            &parse_document(r#"<weatherstation name="Oslo (Alna)" distance="5407"/>"#).unwrap(),
        );
        assert!(matches!(
            result,
            Err(ParseError::MissingField { field: "lat", .. })
        ));
    }
}
