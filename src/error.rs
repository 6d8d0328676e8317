use crate::assemble::AssembleError;
use crate::document::DocumentError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YrError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error("place must not be empty")]
    InvalidPlace,

    #[error("failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),
}
