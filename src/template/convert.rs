use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fits::{write_fits, Card, ImageData};

use super::error::ConvertError;
use super::naming::{
    derive_subtype, is_known_spectype, normalize_spectype, output_file_name, parse_indous_id,
};
use super::source::SdssTemplateFile;

/// EXTNAME of every converted template.
pub const EXTNAME: &str = "BASIS_VECTORS";

/// Provenance note added to every converted header.
pub const PROVENANCE: &str = "Converted from SDSS template format";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Converter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Written to RRVER in every output header.
    pub rr_version: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            rr_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateRecord – one template about to be written
// ---------------------------------------------------------------------------

/// One output template derived from the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRecord {
    pub spectype: String,
    pub subtype: String,
    /// Original NAMEn label; only set for files with named templates.
    pub sdss_name: Option<String>,
    pub indous_id: Option<u32>,
    pub data: ImageData,
    pub file_name: String,
}

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Summary of one written template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrittenTemplate {
    pub path: PathBuf,
    pub rrtype: String,
    pub rrsubtyp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdssname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indousid: Option<u32>,
    /// Pixels per template.
    pub npix: usize,
}

/// What a call to [`TemplateConverter::convert`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionReport {
    Converted {
        input: PathBuf,
        written: Vec<WrittenTemplate>,
    },
    /// The input lacks required keywords; nothing was written.
    Rejected {
        input: PathBuf,
        missing: Vec<String>,
    },
}

impl ConversionReport {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionReport::Converted { .. })
    }

    pub fn written(&self) -> &[WrittenTemplate] {
        match self {
            ConversionReport::Converted { written, .. } => written,
            ConversionReport::Rejected { .. } => &[],
        }
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionReport::Converted { input, written } => write!(
                f,
                "converted {} template(s) from {}",
                written.len(),
                input.display()
            ),
            ConversionReport::Rejected { input, missing } => write!(
                f,
                "{} is not an SDSS template file: missing {}",
                input.display(),
                missing.join(", ")
            ),
        }
    }
}

/// JSON record of a conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionManifest {
    pub input: PathBuf,
    pub rr_version: String,
    pub templates: Vec<WrittenTemplate>,
}

impl ConversionManifest {
    /// `None` for rejected inputs.
    pub fn from_report(report: &ConversionReport, config: &ConverterConfig) -> Option<Self> {
        match report {
            ConversionReport::Converted { input, written } => Some(ConversionManifest {
                input: input.clone(),
                rr_version: config.rr_version.clone(),
                templates: written.clone(),
            }),
            ConversionReport::Rejected { .. } => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// TemplateConverter
// ---------------------------------------------------------------------------

/// Converts SDSS template files into redrock templates, one output file per
/// template.
#[derive(Debug, Clone, Default)]
pub struct TemplateConverter {
    config: ConverterConfig,
}

impl TemplateConverter {
    pub fn new(config: ConverterConfig) -> Self {
        TemplateConverter { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert `input` and write the templates into `output_folder`, which
    /// must exist. Existing outputs are overwritten.
    ///
    /// Every template is derived and checked before the first file is
    /// written, so bad NAMEn labels or a short data array leave the output
    /// folder untouched.
    pub fn convert(&self, input: &Path, output_folder: &Path) -> Result<ConversionReport, ConvertError> {
        let mut source = SdssTemplateFile::open(input)?;

        let missing = source.missing_keywords();
        if !missing.is_empty() {
            log::error!(
                "{}: missing required keyword(s) {}; nothing converted",
                input.display(),
                missing.join(", ")
            );
            return Ok(ConversionReport::Rejected {
                input: input.to_path_buf(),
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        if source.hdu_count > 1 {
            log::warn!(
                "{} has {} HDUs; only the first one is converted",
                input.display(),
                source.hdu_count
            );
        }

        let (crval, cdelt) = source.wavelength_solution()?;
        let records = self.plan(&mut source)?;

        let mut written = Vec::with_capacity(records.len());
        for record in records {
            let path = output_folder.join(&record.file_name);
            let cards = self.output_cards(&record, crval, cdelt, input);
            write_fits(&path, &cards, &[PROVENANCE], Some(&record.data)).map_err(|source| {
                ConvertError::Write {
                    path: path.clone(),
                    source,
                }
            })?;
            log::debug!("wrote {}", path.display());

            written.push(WrittenTemplate {
                path,
                npix: record.data.row_len(),
                rrtype: record.spectype,
                rrsubtyp: record.subtype,
                sdssname: record.sdss_name,
                indousid: record.indous_id,
            });
        }

        Ok(ConversionReport::Converted {
            input: input.to_path_buf(),
            written,
        })
    }

    /// Derive every output template of `source` without writing anything.
    pub fn plan(&self, source: &mut SdssTemplateFile) -> Result<Vec<TemplateRecord>, ConvertError> {
        let object = source.object()?;
        let data = source.read_data()?;
        let name_mode = source.name_mode();
        let count = source.template_count();

        let mut records = Vec::with_capacity(count);
        for index in 0..count {
            let spectype = normalize_spectype(&object);
            if !is_known_spectype(&spectype) {
                log::warn!(
                    "template {index}: unknown spectral type {spectype:?}, expected one of STAR, GALAXY, QSO"
                );
            }

            let record = if name_mode {
                let name = source.template_name(index)?;
                let row = data.row(index).ok_or(ConvertError::RowOutOfRange {
                    index,
                    rows: data.rows(),
                })?;
                let subtype = derive_subtype(&name);
                TemplateRecord {
                    file_name: output_file_name(&spectype, Some(&subtype)),
                    indous_id: parse_indous_id(&name),
                    sdss_name: Some(name),
                    subtype,
                    spectype,
                    data: row,
                }
            } else {
                TemplateRecord {
                    file_name: output_file_name(&spectype, None),
                    indous_id: None,
                    sdss_name: None,
                    subtype: String::new(),
                    spectype,
                    data: data.clone(),
                }
            };
            log::debug!("planned {} ({} pixels)", record.file_name, record.data.row_len());
            records.push(record);
        }
        Ok(records)
    }

    /// Header cards of one converted template, in redrock's keyword
    /// convention. The provenance COMMENT follows them.
    pub fn output_cards(&self, record: &TemplateRecord, crval: f64, cdelt: f64, input: &Path) -> Vec<Card> {
        let mut cards = vec![
            Card::new("CRVAL1", crval).with_comment("log10 wavelength of first pixel"),
            Card::new("CDELT1", cdelt).with_comment("log10 wavelength step"),
            Card::new("LOGLAM", 1i64).with_comment("wavelength grid is log10 spaced"),
            Card::new("RRTYPE", record.spectype.as_str()).with_comment("Spectral type"),
            Card::new("RRSUBTYP", record.subtype.as_str()).with_comment("Spectral subtype"),
        ];
        if let Some(name) = &record.sdss_name {
            cards.push(Card::new("SDSSNAME", name.as_str()).with_comment("Template name in SDSS file"));
        }
        if let Some(id) = record.indous_id {
            cards.push(Card::new("INDOUSID", id).with_comment("Indo-US stellar library template ID"));
        }
        cards.push(Card::new("RRVER", self.config.rr_version.as_str()).with_comment("Converter version"));
        cards.push(Card::new("INSPEC", input.display().to_string()).with_comment("Input SDSS template file"));
        cards.push(Card::new("EXTNAME", EXTNAME));
        cards
    }
}
