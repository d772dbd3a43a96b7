/// Template conversion: SDSS template files → redrock templates.
///
/// Architecture:
/// ```text
///   SDSS template .fits
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  open + required keyword check → SdssTemplateFile
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  convert  │  plan TemplateRecords (naming) → rrtemplate-*.fits
///   └──────────┘
/// ```

pub mod convert;
pub mod error;
pub mod naming;
pub mod source;

pub use convert::{
    ConversionManifest, ConversionReport, ConverterConfig, TemplateConverter, TemplateRecord,
    WrittenTemplate,
};
pub use error::ConvertError;
pub use source::SdssTemplateFile;
