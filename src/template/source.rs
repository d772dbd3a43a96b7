use std::fmt;
use std::path::{Path, PathBuf};

use fitsio::hdu::FitsHdu;

use crate::fits::{count_hdus, primary_records, FitsError, FitsFile, ImageData};

use super::error::ConvertError;
use super::naming::count_named_templates;

/// Keywords without which a file is not treated as an SDSS template.
pub const REQUIRED_KEYWORDS: [&str; 2] = ["OBJECT", "COEFF0"];

// ---------------------------------------------------------------------------
// SdssTemplateFile – the input side of a conversion
// ---------------------------------------------------------------------------

/// The first HDU of an SDSS template file, kept open until dropped.
///
/// Expected layout:
/// * `OBJECT`  – spectral class (`STAR`, `GALAXY`, `QSO`)
/// * `COEFF0`, `COEFF1` – log10 wavelength of the first pixel and the step
/// * `NAME0`..`NAMEk` – optional per-row labels; when present the data is
///   one template per row
pub struct SdssTemplateFile {
    pub path: PathBuf,
    /// Number of HDUs in the file; only the first one is used.
    pub hdu_count: usize,
    keywords: Vec<String>,
    file_len: u64,
    fits: FitsFile,
    primary: FitsHdu,
}

impl fmt::Debug for SdssTemplateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdssTemplateFile")
            .field("path", &self.path)
            .field("hdu_count", &self.hdu_count)
            .field("keywords", &self.keywords)
            .finish_non_exhaustive()
    }
}

impl SdssTemplateFile {
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let read_error = |source: FitsError| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        };
        let file_len = std::fs::metadata(path)
            .map_err(|e| read_error(FitsError::Io(e)))?
            .len();
        let mut fits = FitsFile::open(path).map_err(read_error)?;
        let hdu_count = count_hdus(&mut fits);
        let keywords = primary_records(&mut fits)
            .map_err(read_error)?
            .into_iter()
            .map(|record| record.keyword)
            .collect();
        let primary = fits.primary_hdu().map_err(read_error)?;

        Ok(SdssTemplateFile {
            path: path.to_path_buf(),
            hdu_count,
            keywords,
            file_len,
            fits,
            primary,
        })
    }

    /// Keywords of the primary header, in order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Required keywords absent from the header, in declaration order.
    pub fn missing_keywords(&self) -> Vec<&'static str> {
        REQUIRED_KEYWORDS
            .iter()
            .copied()
            .filter(|k| !self.contains(k))
            .collect()
    }

    /// OBJECT as text; non-string values come back as written.
    pub fn object(&mut self) -> Result<String, ConvertError> {
        self.read_str("OBJECT")
    }

    /// `(COEFF0, COEFF1)`: log10 wavelength of pixel 0 and the step.
    pub fn wavelength_solution(&mut self) -> Result<(f64, f64), ConvertError> {
        Ok((self.read_f64("COEFF0")?, self.read_f64("COEFF1")?))
    }

    /// Whether the file carries named templates (NAME0 present).
    pub fn name_mode(&self) -> bool {
        self.contains("NAME0")
    }

    pub fn template_count(&self) -> usize {
        if self.name_mode() {
            count_named_templates(self.keywords.iter().map(String::as_str))
        } else {
            1
        }
    }

    /// The SDSS label of template `index` (`NAME<index>`).
    pub fn template_name(&mut self, index: usize) -> Result<String, ConvertError> {
        let keyword = format!("NAME{index}");
        if !self.contains(&keyword) {
            return Err(ConvertError::MissingTemplateName { keyword });
        }
        self.read_str(&keyword)
    }

    /// The primary data array.
    pub fn read_data(&mut self) -> Result<ImageData, ConvertError> {
        ImageData::read(&mut self.fits, &self.primary, self.file_len)
            .map_err(|source| ConvertError::Read {
                path: self.path.clone(),
                source,
            })?
            .ok_or_else(|| ConvertError::NoData {
                path: self.path.clone(),
            })
    }

    fn require(&self, keyword: &str) -> Result<(), ConvertError> {
        if self.contains(keyword) {
            Ok(())
        } else {
            Err(ConvertError::MissingKeyword {
                path: self.path.clone(),
                keyword: keyword.to_string(),
            })
        }
    }

    fn read_str(&mut self, keyword: &str) -> Result<String, ConvertError> {
        self.require(keyword)?;
        self.primary
            .read_key::<String>(&mut self.fits, keyword)
            .map_err(|source| ConvertError::InvalidKeyword {
                keyword: keyword.to_string(),
                source,
            })
    }

    fn read_f64(&mut self, keyword: &str) -> Result<f64, ConvertError> {
        self.require(keyword)?;
        self.primary
            .read_key::<f64>(&mut self.fits, keyword)
            .map_err(|source| ConvertError::InvalidKeyword {
                keyword: keyword.to_string(),
                source,
            })
    }
}
