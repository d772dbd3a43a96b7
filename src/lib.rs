//! Conversion of SDSS spectral template files into redrock templates.
//!
//! SDSS ships its stellar, galaxy and QSO templates as one FITS file per
//! class, with one template per row and the row labels in `NAMEn`
//! keywords. redrock expects one file per template with its own keyword
//! convention (`RRTYPE`, `RRSUBTYP`, `CRVAL1`, …). [`TemplateConverter`]
//! bridges the two, reading and writing FITS through `fitsio` (see [`fits`]).

pub mod fits;
pub mod template;

pub use template::{ConversionReport, ConverterConfig, ConvertError, TemplateConverter};
