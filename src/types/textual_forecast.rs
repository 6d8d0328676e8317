use crate::types::error::ParseError;
use crate::types::{parse_xml_date, required_text, XML_DATE_FORMAT};
use crate::xml::XmlElement;
use chrono::NaiveDate;

const ENTITY: &str = "textual forecast";

/// Human-readable forecast for a day or two. The body may embed markup, and
/// the service only publishes these in Norwegian and for some locations.
#[derive(Debug, Clone, PartialEq)]
pub struct TextualForecast {
    title: String,
    text: String,
    from: NaiveDate,
    to: NaiveDate,
}

impl TextualForecast {
    /// Fails when title or text is empty. A missing `to` means a single-day
    /// forecast, so it falls back to `from`.
    pub fn new(
        title: String,
        text: String,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Result<TextualForecast, ParseError> {
        if title.trim().is_empty() {
            return Err(ParseError::EmptyField { entity: ENTITY, field: "title" });
        }
        if text.trim().is_empty() {
            return Err(ParseError::EmptyField { entity: ENTITY, field: "body" });
        }

        Ok(TextualForecast {
            title,
            text,
            from,
            to: to.unwrap_or(from),
        })
    }

    pub fn from_xml(element: &XmlElement) -> Result<TextualForecast, ParseError> {
        let data = element.convert();

        let title = required_text(&data, ENTITY, "title")?.to_string();
        let text = required_text(&data, ENTITY, "body")?.to_string();
        let from = parse_xml_date("from", required_text(&data, ENTITY, "from")?)?;
        let to = data
            .text("to")
            .and_then(|value| NaiveDate::parse_from_str(value, XML_DATE_FORMAT).ok());

        TextualForecast::new(title, text, from, to)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_a_two_day_forecast() {
        let root = parse_document(
            r#"<time from="2014-05-28" to="2014-05-29">
                 <title>Onsdag og torsdag</title>
                 <body>&lt;strong&gt;Oslo&lt;/strong&gt;: Skiftende bris og regn.</body>
               </time>"#,
        )
        .unwrap();

        let forecast = TextualForecast::from_xml(&root).unwrap();
        assert_eq!(forecast.title(), "Onsdag og torsdag");
        assert!(forecast.text().starts_with("<strong>Oslo</strong>"));
        assert_eq!(forecast.from_date(), date(2014, 5, 28));
        assert_eq!(forecast.to_date(), date(2014, 5, 29));
    }

    #[test]
    fn single_date_covers_one_day() {
        let root = parse_document(
            r#"<time from="2014-05-28"><title>Onsdag</title><body>Regn.</body></time>"#,
        )
        .unwrap();

        let forecast = TextualForecast::from_xml(&root).unwrap();
        assert_eq!(forecast.to_date(), forecast.from_date());
    }

    #[test]
    fn rejects_empty_title_and_body() {
        let empty_title =
            TextualForecast::new(" ".into(), "Regn.".into(), date(2014, 5, 28), None);
        assert!(matches!(
            empty_title,
            Err(ParseError::EmptyField { field: "title", .. })
        ));

        let empty_body = TextualForecast::new("Onsdag".into(), String::new(), date(2014, 5, 28), None);
        assert!(matches!(
            empty_body,
            Err(ParseError::EmptyField { field: "body", .. })
        ));
    }

    #[test]
    fn missing_title_is_a_missing_field() {
        let root =
            parse_document(r#"<time from="2014-05-28"><body>Regn.</body></time>"#).unwrap();
        assert!(matches!(
            TextualForecast::from_xml(&root),
            Err(ParseError::MissingField { field: "title", .. })
        ));
    }
}
