//! Error type shared by every stage of the conversion pipeline.

use std::{io, path::PathBuf, result};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read icon metadata '{}': {source}", path.display())]
    MetadataUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed icon metadata: {0}")]
    MalformedMetadata(String),

    #[error("unknown icon '{0}'")]
    UnknownIcon(String),

    #[error("failed to load font '{}': {reason}", path.display())]
    FontLoad { path: PathBuf, reason: String },

    #[error("no font loaded for style '{0}'")]
    MissingStyle(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read profile '{}': {reason}", path.display())]
    Profile { path: PathBuf, reason: String },

    #[error("failed to write image '{}': {source}", path.display())]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot allocate a {0}x{0} canvas")]
    Canvas(u32),
}

pub type Result<T> = result::Result<T, Error>;
