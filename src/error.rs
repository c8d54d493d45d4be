//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, zip, XML, CSV and workbook errors, provides semantic variants
//! for argument validation and input failures, and classifies every error into
//! the process `ExitCode` taxonomy.
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ExitCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Duplicate tag: {0}")]
    DuplicateTag(String),

    #[error("Cannot read input file {path:?}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Unsupported input format: {0:?}")]
    UnsupportedInput(PathBuf),

    #[error("Template file {path:?}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output file {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed package: {0}")]
    Package(String),
}

impl Error {
    pub fn input<P: Into<PathBuf>>(path: P, source: Error) -> Self {
        Error::Input {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn package<E: std::fmt::Display>(e: E) -> Self {
        Error::Package(e.to_string())
    }

    /// Exit code reported for this error by the CLI.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::InvalidParameter(_) | Error::DuplicateTag(_) => ExitCode::InvalidParameter,
            Error::Input { .. } | Error::UnsupportedInput(_) => ExitCode::InvalidFilename,
            Error::Template { source, .. } | Error::Output { source, .. } | Error::Io(source) => {
                io_exit_code(source)
            }
            Error::Zip(zip::result::ZipError::Io(source)) => io_exit_code(source),
            Error::Zip(_)
            | Error::Xml(_)
            | Error::XmlAttr(_)
            | Error::Csv(_)
            | Error::Workbook(_)
            | Error::Package(_) => ExitCode::UnknownError,
        }
    }
}

fn io_exit_code(e: &std::io::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::NotFound => ExitCode::InvalidFilename,
        _ => ExitCode::FileAccessDenied,
    }
}
