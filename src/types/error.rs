use thiserror::Error;

/// Failure to build one entity from its XML node. These are raised per item
/// and normally cause that single item to be skipped during assembly.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing required field '{field}' for {entity}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("empty value in field '{field}' for {entity}")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("invalid timestamp '{value}' in field '{field}'")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid number '{value}' in field '{field}'")]
    InvalidNumber { field: &'static str, value: String },
}
