use std::path::PathBuf;

use thiserror::Error;

use crate::fits::FitsError;

/// Fatal conversion errors. A file that merely lacks OBJECT or COEFF0 is
/// not an error; see [`ConversionReport::Rejected`](super::ConversionReport).
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: FitsError,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: FitsError,
    },

    #[error("{}: missing keyword {keyword}", path.display())]
    MissingKeyword { path: PathBuf, keyword: String },

    #[error("keyword {keyword} has an unusable value")]
    InvalidKeyword {
        keyword: String,
        #[source]
        source: FitsError,
    },

    #[error("{}: primary HDU has no data array", path.display())]
    NoData { path: PathBuf },

    #[error("{keyword} is missing although NAME0 is present")]
    MissingTemplateName { keyword: String },

    #[error("template {index} is out of range: data array has {rows} row(s)")]
    RowOutOfRange { index: usize, rows: usize },
}
