use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::images::ImageType;
use fitsio::FitsFile;
use thiserror::Error;

use super::{FitsError, FitsResult};

// ---------------------------------------------------------------------------
// Pixels – typed image values
// ---------------------------------------------------------------------------

/// Image values in their on-disk element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Pixels {
    U8(Vec<u8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Apply `$body` to the vector inside `$pixels`, keeping the variant.
macro_rules! map_pixels {
    ($pixels:expr, |$v:ident| $body:expr) => {
        match $pixels {
            Pixels::U8($v) => Pixels::U8($body),
            Pixels::I16($v) => Pixels::I16($body),
            Pixels::I32($v) => Pixels::I32($body),
            Pixels::I64($v) => Pixels::I64($body),
            Pixels::F32($v) => Pixels::F32($body),
            Pixels::F64($v) => Pixels::F64($body),
        }
    };
}

impl Pixels {
    pub fn len(&self) -> usize {
        match self {
            Pixels::U8(v) => v.len(),
            Pixels::I16(v) => v.len(),
            Pixels::I32(v) => v.len(),
            Pixels::I64(v) => v.len(),
            Pixels::F32(v) => v.len(),
            Pixels::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// CFITSIO element type, i.e. the BITPIX written for these values.
    pub fn image_type(&self) -> ImageType {
        match self {
            Pixels::U8(_) => ImageType::UnsignedByte,
            Pixels::I16(_) => ImageType::Short,
            Pixels::I32(_) => ImageType::Long,
            Pixels::I64(_) => ImageType::LongLong,
            Pixels::F32(_) => ImageType::Float,
            Pixels::F64(_) => ImageType::Double,
        }
    }

    fn slice(&self, start: usize, end: usize) -> Pixels {
        map_pixels!(self, |v| v[start..end].to_vec())
    }

    fn write(&self, fits: &mut FitsFile, hdu: &FitsHdu) -> FitsResult<()> {
        match self {
            Pixels::U8(v) => hdu.write_image(fits, v.as_slice()),
            Pixels::I16(v) => hdu.write_image(fits, v.as_slice()),
            Pixels::I32(v) => hdu.write_image(fits, v.as_slice()),
            Pixels::I64(v) => hdu.write_image(fits, v.as_slice()),
            Pixels::F32(v) => hdu.write_image(fits, v.as_slice()),
            Pixels::F64(v) => hdu.write_image(fits, v.as_slice()),
        }
    }
}

// ---------------------------------------------------------------------------
// ImageData
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
#[error("shape {shape:?} holds {expected} values, got {actual}")]
pub struct ShapeMismatch {
    pub shape: Vec<usize>,
    pub expected: usize,
    pub actual: usize,
}

/// The data array of an image HDU.
///
/// `shape` is in row-major order as `fitsio` reports it: the last entry
/// is NAXIS1, the fastest varying axis. For a template file NAXIS1 is the
/// wavelength axis and NAXIS2 counts templates, so a "row" is one
/// template spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub shape: Vec<usize>,
    pub pixels: Pixels,
}

impl ImageData {
    pub fn new(shape: Vec<usize>, pixels: Pixels) -> Result<Self, ShapeMismatch> {
        let expected: usize = shape.iter().product();
        if expected != pixels.len() {
            return Err(ShapeMismatch {
                shape,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(ImageData { shape, pixels })
    }

    /// Length of one row (NAXIS1).
    pub fn row_len(&self) -> usize {
        self.shape.last().copied().unwrap_or(0)
    }

    /// Number of rows: the product of every axis above NAXIS1, so a 1-D
    /// array is a single row.
    pub fn rows(&self) -> usize {
        match self.shape.split_last() {
            Some((_, outer)) => outer.iter().product(),
            None => 0,
        }
    }

    /// Row `index` as a 2-D image holding that single row.
    pub fn row(&self, index: usize) -> Option<ImageData> {
        if index >= self.rows() {
            return None;
        }
        let n = self.row_len();
        Some(ImageData {
            shape: vec![1, n],
            pixels: self.pixels.slice(index * n, (index + 1) * n),
        })
    }

    pub fn image_type(&self) -> ImageType {
        self.pixels.image_type()
    }

    /// Read the data of `hdu`. `None` for table HDUs and empty images.
    ///
    /// Integer data with BSCALE/BZERO comes back as physical values in a
    /// float type (`f32` up to 16 bits, `f64` above); everything else keeps
    /// its on-disk type. `available` is the file size; a corrupt NAXISn that
    /// declares more data than that fails here instead of in an allocation.
    pub(crate) fn read(fits: &mut FitsFile, hdu: &FitsHdu, available: u64) -> FitsResult<Option<Self>> {
        let (shape, image_type) = match &hdu.info {
            HduInfo::ImageInfo { shape, image_type } => (shape.clone(), image_type),
            _ => return Ok(None),
        };
        if shape.is_empty() {
            return Ok(None);
        }
        let elements = shape
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or_else(|| FitsError::Message(format!("image shape {shape:?} overflows")))?;
        if elements == 0 {
            return Ok(None);
        }
        // Every element takes at least one byte.
        if u64::try_from(elements).map_or(true, |n| n > available) {
            return Err(FitsError::Message(format!(
                "image shape {shape:?} needs more data than the {available}-byte file holds"
            )));
        }
        log::trace!("reading {elements} pixels");

        let scaled = hdu.read_key::<f64>(fits, "BSCALE").is_ok_and(|v| v != 1.0)
            || hdu.read_key::<f64>(fits, "BZERO").is_ok_and(|v| v != 0.0);
        let pixels = match image_type {
            ImageType::UnsignedByte if !scaled => Pixels::U8(hdu.read_image(fits)?),
            ImageType::Short if !scaled => Pixels::I16(hdu.read_image(fits)?),
            ImageType::Long if !scaled => Pixels::I32(hdu.read_image(fits)?),
            ImageType::LongLong if !scaled => Pixels::I64(hdu.read_image(fits)?),
            ImageType::Double
            | ImageType::Long
            | ImageType::UnsignedLong
            | ImageType::LongLong => Pixels::F64(hdu.read_image(fits)?),
            _ => Pixels::F32(hdu.read_image(fits)?),
        };

        let image = ImageData::new(shape, pixels).map_err(|e| FitsError::Message(e.to_string()))?;
        Ok(Some(image))
    }

    pub(crate) fn write(&self, fits: &mut FitsFile, hdu: &FitsHdu) -> FitsResult<()> {
        self.pixels.write(fits, hdu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> ImageData {
        ImageData::new(vec![2, 3], Pixels::F32(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap()
    }

    #[test]
    fn shape_must_match_values() {
        let err = ImageData::new(vec![2, 3], Pixels::F64(vec![0.0; 5])).unwrap_err();
        assert_eq!(err.expected, 6);
        assert_eq!(err.actual, 5);
    }

    #[test]
    fn rows_run_along_naxis1() {
        let data = grid();
        assert_eq!(data.rows(), 2);
        assert_eq!(data.row_len(), 3);
        let row = data.row(1).unwrap();
        assert_eq!(row.shape, vec![1, 3]);
        assert_eq!(row.pixels, Pixels::F32(vec![4.0, 5.0, 6.0]));
        assert!(data.row(2).is_none());
    }

    #[test]
    fn one_dimensional_data_is_a_single_row() {
        let data = ImageData::new(vec![4], Pixels::I16(vec![1, 2, 3, 4])).unwrap();
        assert_eq!(data.rows(), 1);
        assert_eq!(data.row(0).unwrap().shape, vec![1, 4]);
        assert!(data.row(1).is_none());
    }

    #[test]
    fn rows_keep_the_element_type() {
        let big = (1i64 << 53) + 1;
        let data = ImageData::new(vec![2, 2], Pixels::I64(vec![big, -big, i64::MAX, i64::MIN])).unwrap();
        assert_eq!(data.row(1).unwrap().pixels, Pixels::I64(vec![i64::MAX, i64::MIN]));
        assert!(matches!(data.row(0).unwrap().image_type(), ImageType::LongLong));
    }
}
