use crate::types::error::ParseError;
use crate::types::{parse_xml_datetime, required_text, AttributeBag};
use crate::xml::{XmlElement, XmlMap};
use chrono::NaiveDateTime;

const ENTITY: &str = "forecast";

/// One weather interval from the tabular forecast data.
///
/// List forecasts always carry `from`/`to` and all six attribute bags; the
/// partial forecast embedded in a [`WeatherStation`](crate::WeatherStation)
/// only carries whatever the observation reported, so every accessor is
/// optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
    period: Option<u8>,
    symbol: AttributeBag,
    precipitation: AttributeBag,
    wind_direction: AttributeBag,
    wind_speed: AttributeBag,
    temperature: AttributeBag,
    pressure: AttributeBag,
}

impl Forecast {
    /// Builds a forecast from one `<time>` node.
    ///
    /// Fails when `from`, `to` or any of the six weather sub-elements is
    /// missing, or when a timestamp does not match the service's fixed
    /// format.
    pub fn from_xml(element: &XmlElement) -> Result<Forecast, ParseError> {
        let data = element.convert();

        let from = parse_xml_datetime("from", required_text(&data, ENTITY, "from")?)?;
        let to = parse_xml_datetime("to", required_text(&data, ENTITY, "to")?)?;

        Ok(Forecast {
            from: Some(from),
            to: Some(to),
            period: parse_period(data.text("period"))?,
            symbol: required_bag(&data, "symbol")?,
            precipitation: required_bag(&data, "precipitation")?,
            wind_direction: required_bag(&data, "windDirection")?,
            wind_speed: required_bag(&data, "windSpeed")?,
            temperature: required_bag(&data, "temperature")?,
            pressure: required_bag(&data, "pressure")?,
        })
    }

    /// Start of the interval the forecast is valid for.
    pub fn valid_from(&self) -> Option<NaiveDateTime> {
        self.from
    }

    /// End of the interval the forecast is valid for.
    pub fn valid_to(&self) -> Option<NaiveDateTime> {
        self.to
    }

    /// Time-of-day bucket 0-4 for periodic forecasts. `None` for hourly
    /// forecasts; a source period of literally `0` is `Some(0)`.
    pub fn period(&self) -> Option<u8> {
        self.period
    }

    /// Symbol attributes: `number`, `name`, `var`.
    pub fn symbol(&self) -> &AttributeBag {
        &self.symbol
    }

    /// Precipitation attributes: `value`, and sometimes `minvalue`/`maxvalue`.
    pub fn precipitation(&self) -> &AttributeBag {
        &self.precipitation
    }

    /// Wind direction attributes: `deg`, `code`, `name`.
    pub fn wind_direction(&self) -> &AttributeBag {
        &self.wind_direction
    }

    /// Wind speed attributes: `mps`, `name`.
    pub fn wind_speed(&self) -> &AttributeBag {
        &self.wind_speed
    }

    /// Temperature attributes: `value`, `unit`.
    pub fn temperature(&self) -> &AttributeBag {
        &self.temperature
    }

    /// Pressure attributes: `value`, `unit`.
    pub fn pressure(&self) -> &AttributeBag {
        &self.pressure
    }

    pub fn symbol_name(&self) -> Option<&str> {
        self.symbol.get("name")
    }

    pub fn precipitation_value(&self) -> Option<&str> {
        self.precipitation.get("value")
    }

    pub fn wind_direction_code(&self) -> Option<&str> {
        self.wind_direction.get("code")
    }

    pub fn wind_speed_mps(&self) -> Option<&str> {
        self.wind_speed.get("mps")
    }

    pub fn temperature_value(&self) -> Option<&str> {
        self.temperature.get("value")
    }

    pub fn pressure_value(&self) -> Option<&str> {
        self.pressure.get("value")
    }

    /// Key selecting the wind pictogram for this forecast, a zero-padded
    /// `speed.degree` pair such as `"0250.100"`, bucketed to 2.5 mps and 10
    /// degrees. Speeds of 0.2 mps and below map to the dedicated no-wind
    /// icon key `"0"`. `None` when the wind data needed is absent or not
    /// numeric.
    pub fn wind_icon_key(&self) -> Option<String> {
        let speed: f64 = self.wind_speed.get("mps")?.parse().ok()?;
        if speed <= 0.2 {
            return Some("0".to_string());
        }

        let deg: f64 = self.wind_direction.get("deg")?.parse().ok()?;
        let speed_bucket = (speed / 2.5).round() as i64 * 25;
        let mut degree_bucket = (deg / 10.0).round() as i64 * 10;
        // A full circle wraps back to the north arrow.
        if degree_bucket >= 360 {
            degree_bucket = 0;
        }

        Some(format!("{speed_bucket:04}.{degree_bucket:03}"))
    }

    pub fn set_valid_from(&mut self, from: NaiveDateTime) {
        self.from = Some(from);
    }

    pub fn set_valid_to(&mut self, to: NaiveDateTime) {
        self.to = Some(to);
    }

    pub fn set_period(&mut self, period: Option<u8>) {
        self.period = period;
    }

    pub fn set_symbol(&mut self, symbol: AttributeBag) {
        self.symbol = symbol;
    }

    pub fn set_precipitation(&mut self, precipitation: AttributeBag) {
        self.precipitation = precipitation;
    }

    pub fn set_wind_direction(&mut self, wind_direction: AttributeBag) {
        self.wind_direction = wind_direction;
    }

    pub fn set_wind_speed(&mut self, wind_speed: AttributeBag) {
        self.wind_speed = wind_speed;
    }

    pub fn set_temperature(&mut self, temperature: AttributeBag) {
        self.temperature = temperature;
    }

    pub fn set_pressure(&mut self, pressure: AttributeBag) {
        self.pressure = pressure;
    }
}

fn parse_period(raw: Option<&str>) -> Result<Option<u8>, ParseError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ParseError::InvalidNumber {
                field: "period",
                value: value.to_string(),
            }),
    }
}

fn required_bag(data: &XmlMap, field: &'static str) -> Result<AttributeBag, ParseError> {
    data.get(field)
        .map(AttributeBag::from_value)
        .ok_or(ParseError::MissingField { entity: ENTITY, field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;
    use chrono::NaiveDate;

    const TIME_NODE: &str = r#"<time from="2014-03-07T10:00:00" to="2014-03-07T11:00:00">
        <!-- Valid from 2014-03-07T10:00:00 to 2014-03-07T11:00:00 -->
        <symbol number="9" name="Rain" var="09"/>
        <precipitation value="0.3" minvalue="0.1" maxvalue="0.6"/>
        <windDirection deg="194.7" code="SSW" name="Sør-sørvest"/>
        <windSpeed mps="5.3" name="Laber bris"/>
        <temperature unit="celsius" value="5"/>
        <pressure unit="hPa" value="1011.7"/>
      </time>"#;

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn parse(xml: &str) -> Result<Forecast, ParseError> {
        Forecast::from_xml(&parse_document(xml).unwrap())
    }

    #[test]
    fn parses_a_complete_time_node() {
        let forecast = parse(TIME_NODE).unwrap();

        assert_eq!(forecast.valid_from(), Some(datetime(2014, 3, 7, 10, 0, 0)));
        assert_eq!(forecast.valid_to(), Some(datetime(2014, 3, 7, 11, 0, 0)));
        assert_eq!(forecast.period(), None);
        assert_eq!(forecast.symbol_name(), Some("Rain"));
        assert_eq!(forecast.symbol().get("number"), Some("9"));
        assert_eq!(forecast.precipitation_value(), Some("0.3"));
        assert_eq!(forecast.precipitation().get("maxvalue"), Some("0.6"));
        assert_eq!(forecast.wind_direction_code(), Some("SSW"));
        assert_eq!(forecast.wind_speed_mps(), Some("5.3"));
        assert_eq!(forecast.temperature_value(), Some("5"));
        assert_eq!(forecast.temperature().get("unit"), Some("celsius"));
        assert_eq!(forecast.pressure_value(), Some("1011.7"));
    }

    #[test]
    fn fails_without_wind_data() {
        // The upstream test fixture: windDirection and windSpeed dropped.
        let result = parse(
            r#"<time from="2014-03-07T10:00:00" to="2014-03-07T11:00:00">
                 <symbol number="9" name="Rain" var="09"/>
                 <precipitation value="0.3" minvalue="0.1" maxvalue="0.6"/>
                 <temperature unit="celsius" value="5"/>
                 <pressure unit="hPa" value="1011.7"/>
               </time>"#,
        );
        assert!(matches!(
            result,
            Err(ParseError::MissingField { field: "windDirection", .. })
        ));
    }

    #[test]
    fn fails_without_interval_boundaries() {
        let result = parse(
            r#"<time>
                 <symbol number="9" name="Rain" var="09"/>
                 <precipitation value="0.3"/>
                 <windDirection deg="194.7" code="SSW" name="Sør-sørvest"/>
                 <windSpeed mps="5.3" name="Laber bris"/>
                 <temperature unit="celsius" value="5"/>
                 <pressure unit="hPa" value="1011.7"/>
               </time>"#,
        );
        assert!(matches!(
            result,
            Err(ParseError::MissingField { field: "from", .. })
        ));
    }

    #[test]
    fn fails_on_unparsable_timestamps() {
        let result = parse(&TIME_NODE.replace("2014-03-07T10:00:00", "10:00 last tuesday"));
        assert!(matches!(
            result,
            Err(ParseError::InvalidTimestamp { field: "from", .. })
        ));
    }

    #[test]
    fn period_zero_is_a_real_period() {
        let with_zero = parse(&TIME_NODE.replace(
            r#"<time from="2014-03-07T10:00:00""#,
            r#"<time period="0" from="2014-03-07T10:00:00""#,
        ))
        .unwrap();
        assert_eq!(with_zero.period(), Some(0));

        let without = parse(TIME_NODE).unwrap();
        assert_eq!(without.period(), None);
    }

    #[test]
    fn wind_icon_key_buckets_speed_and_direction() {
        let mut forecast = Forecast::default();
        forecast.set_wind_speed([("mps", "25.0")].into_iter().collect());
        forecast.set_wind_direction([("deg", "100")].into_iter().collect());
        assert_eq!(forecast.wind_icon_key(), Some("0250.100".to_string()));

        forecast.set_wind_speed([("mps", "3.8")].into_iter().collect());
        forecast.set_wind_direction([("deg", "86.4")].into_iter().collect());
        assert_eq!(forecast.wind_icon_key(), Some("0050.090".to_string()));
    }

    #[test]
    fn wind_icon_key_normalizes_a_full_circle() {
        let mut forecast = Forecast::default();
        forecast.set_wind_speed([("mps", "5.0")].into_iter().collect());
        forecast.set_wind_direction([("deg", "360")].into_iter().collect());
        assert_eq!(forecast.wind_icon_key(), Some("0050.000".to_string()));

        forecast.set_wind_direction([("deg", "358")].into_iter().collect());
        assert_eq!(forecast.wind_icon_key(), Some("0050.000".to_string()));
    }

    #[test]
    fn wind_icon_key_is_still_for_slow_wind() {
        let mut forecast = Forecast::default();
        forecast.set_wind_speed([("mps", "0.2")].into_iter().collect());
        // No direction set at all; the no-wind key does not need one.
        assert_eq!(forecast.wind_icon_key(), Some("0".to_string()));
    }

    #[test]
    fn wind_icon_key_needs_numeric_wind_data() {
        let mut forecast = Forecast::default();
        assert_eq!(forecast.wind_icon_key(), None);

        forecast.set_wind_speed([("mps", "5.0")].into_iter().collect());
        assert_eq!(forecast.wind_icon_key(), None);

        forecast.set_wind_direction([("deg", "calm-ish")].into_iter().collect());
        assert_eq!(forecast.wind_icon_key(), None);
    }
}
