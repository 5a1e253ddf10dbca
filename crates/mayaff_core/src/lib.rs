pub mod api;
pub mod config;
pub mod filesystem;
pub mod flags;
pub mod imports;
pub mod output;
pub mod reformat;
pub mod scanner;
pub mod tokens;

use thiserror::Error;

pub use api::{FormatOptions, format_file, format_source, scan_source};
pub use config::{MayaFlagsConfig, ModulePair, parse_module_list};
pub use flags::{CallRecord, FlagEdit};

/// Failure classes for one run. Parse and Io failures are per-file and never
/// abort the run; Config failures are rejected before any file is processed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{file}: {message}")]
    Parse { file: String, message: String },
    #[error("{file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn parse(file: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn io(file: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            file: file.display().to_string(),
            source,
        }
    }
}
