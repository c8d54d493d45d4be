use thiserror::Error;

use docfill::ExitCode;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Args(#[from] clap::Error),

    #[error(transparent)]
    Fill(#[from] docfill::Error),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Args(e) => match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::Success
                }
                _ => ExitCode::InvalidParameter,
            },
            AppError::Fill(e) => e.exit_code(),
        }
    }
}
