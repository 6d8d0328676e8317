mod assemble;
mod document;
mod error;
mod types;
mod utils;
mod xml;
mod yr;

pub use error::YrError;
pub use yr::Yr;

pub use assemble::AssembleError;
pub use document::{DocumentError, DocumentLoader, Language, LocationDocuments, ServiceStatus};
pub use types::{
    AttributeBag, Forecast, Location, ParseError, PlaceInfo, TextualForecast, WeatherStation,
};
pub use xml::{parse_document, XmlElement, XmlError, XmlMap, XmlValue};
