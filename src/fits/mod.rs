/// FITS layer: a thin adapter over `fitsio` (CFITSIO).
///
/// Architecture:
/// ```text
///   .fits on disk
///        │
///        ▼
///   ┌──────────────┐
///   │  fitsio      │  open / create, HDU moves, typed image I/O
///   └──────────────┘
///        │
///        ▼
///   ┌────────────────────────┐
///   │ ImageData + keywords   │  typed pixels, header listing, cards
///   └────────────────────────┘
/// ```
///
/// `fitsio` covers images and single keyword reads. Listing a header,
/// writing keyword comments and writing long strings are not part of its
/// safe API, so those few calls go through `fitsio::sys` in `raw`.

pub mod card;
pub mod file;
pub mod image;
mod raw;

pub use card::{Card, KeyValue};
pub use file::{append_image, count_hdus, primary_records, write_fits, HeaderRecord};
pub use fitsio::errors::{Error as FitsError, Result as FitsResult};
pub use fitsio::FitsFile;
pub use image::{ImageData, Pixels, ShapeMismatch};
