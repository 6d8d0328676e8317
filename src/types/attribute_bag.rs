use crate::xml::XmlValue;
use std::collections::HashMap;

/// Flattened key/value view of one XML element's attributes, e.g.
/// temperature's `{value, unit}`. Keys present are exactly the ones the
/// service provided; a missing key is `None`, never a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag(HashMap<String, String>);

impl AttributeBag {
    /// Looks up a single attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collects the text entries of a converted value. Nested structure and
    /// bare text both yield an empty bag.
    pub(crate) fn from_value(value: &XmlValue) -> AttributeBag {
        match value {
            XmlValue::Map(map) => map
                .iter()
                .filter_map(|(key, value)| match value {
                    XmlValue::Text(text) => Some((key, text.as_str())),
                    XmlValue::Map(_) => None,
                })
                .collect(),
            XmlValue::Text(_) => AttributeBag::default(),
        }
    }

}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AttributeBag(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn collects_attributes_of_a_converted_element() {
        let root = parse_document(r#"<pressure unit="hPa" value="1009.8"/>"#).unwrap();
        let data = root.convert();

        let bag = AttributeBag::from_value(&XmlValue::Map(data));
        assert_eq!(bag.get("unit"), Some("hPa"));
        assert_eq!(bag.get("value"), Some("1009.8"));
        assert_eq!(bag.get("minvalue"), None);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn bare_text_yields_an_empty_bag() {
        assert!(AttributeBag::from_value(&XmlValue::Text("17".into())).is_empty());
    }
}
