use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed xml document")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed xml attribute")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("document contains no root element")]
    MissingRoot,
}
