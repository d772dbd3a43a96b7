use std::path::Path;

use fitsio::images::ImageDescription;
use fitsio::FitsFile;

use super::card::Card;
use super::image::ImageData;
use super::{raw, FitsResult};

/// One card as CFITSIO lists it: the value is the raw text between `= `
/// and the comment, so strings keep their quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord {
    pub keyword: String,
    pub value: String,
    pub comment: String,
}

/// Number of HDUs in `fits`. HDUs past the first one CFITSIO cannot move
/// to are not counted.
pub fn count_hdus(fits: &mut FitsFile) -> usize {
    let mut count = 0;
    while fits.hdu(count).is_ok() {
        count += 1;
    }
    count
}

/// Every card of the primary header, in order.
pub fn primary_records(fits: &mut FitsFile) -> FitsResult<Vec<HeaderRecord>> {
    fits.primary_hdu()?;
    raw::records(fits)
}

/// Create (or overwrite) `path` with a single primary HDU holding `cards`,
/// then one COMMENT card per entry of `comments`, then `image`.
pub fn write_fits(path: &Path, cards: &[Card], comments: &[&str], image: Option<&ImageData>) -> FitsResult<()> {
    let mut fits = match image {
        Some(image) => FitsFile::create(path)
            .with_custom_primary(&ImageDescription {
                data_type: image.image_type(),
                dimensions: &image.shape,
            })
            .overwrite()
            .open()?,
        None => FitsFile::create(path).overwrite().open()?,
    };
    let hdu = fits.primary_hdu()?;
    for card in cards {
        log::trace!("{}: {card}", path.display());
        raw::write_card(&mut fits, card)?;
    }
    for comment in comments {
        raw::write_comment(&mut fits, comment)?;
    }
    if let Some(image) = image {
        image.write(&mut fits, &hdu)?;
    }
    Ok(())
}

/// Append an IMAGE extension named `extname` to an existing file.
pub fn append_image(path: &Path, extname: &str, image: &ImageData) -> FitsResult<()> {
    let mut fits = FitsFile::edit(path)?;
    let hdu = fits.create_image(
        extname.to_string(),
        &ImageDescription {
            data_type: image.image_type(),
            dimensions: &image.shape,
        },
    )?;
    image.write(&mut fits, &hdu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fits::Pixels;
    use tempfile::TempDir;

    fn spectrum() -> ImageData {
        ImageData::new(vec![2, 3], Pixels::F32(vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0])).unwrap()
    }

    #[test]
    fn cards_and_comments_are_listed_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.fits");
        let cards = [
            Card::new("OBJECT", "STAR").with_comment("class"),
            Card::new("COEFF1", 1e-4),
            Card::new("INDOUSID", 12u32),
        ];
        write_fits(&path, &cards, &["hello"], Some(&spectrum())).unwrap();

        let mut fits = FitsFile::open(&path).unwrap();
        let records = primary_records(&mut fits).unwrap();
        let keywords: Vec<&str> = records.iter().map(|r| r.keyword.as_str()).collect();
        let object = keywords.iter().position(|k| *k == "OBJECT").unwrap();
        assert_eq!(&keywords[object..object + 3], ["OBJECT", "COEFF1", "INDOUSID"]);
        assert_eq!(records[object].comment, "class");
        assert!(records
            .iter()
            .any(|r| r.keyword == "COMMENT" && r.comment == "hello"));

        let hdu = fits.primary_hdu().unwrap();
        assert_eq!(hdu.read_key::<String>(&mut fits, "OBJECT").unwrap(), "STAR");
        assert_eq!(hdu.read_key::<f64>(&mut fits, "COEFF1").unwrap(), 1e-4);
        assert_eq!(hdu.read_key::<i64>(&mut fits, "INDOUSID").unwrap(), 12);
    }

    #[test]
    fn floats_read_back_exactly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.fits");
        let awkward = [0.1 + 0.2, 3.5500000000000003, 1.0 / 3.0, 6.02214076e23];
        let cards: Vec<Card> = awkward
            .iter()
            .enumerate()
            .map(|(i, &x)| Card::new(&format!("VAL{i}"), x))
            .collect();
        write_fits(&path, &cards, &[], None).unwrap();

        let mut fits = FitsFile::open(&path).unwrap();
        let hdu = fits.primary_hdu().unwrap();
        for (i, &x) in awkward.iter().enumerate() {
            assert_eq!(hdu.read_key::<f64>(&mut fits, &format!("VAL{i}")).unwrap(), x);
        }
    }

    #[test]
    fn image_round_trip_and_extensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.fits");
        write_fits(&path, &[], &[], Some(&spectrum())).unwrap();
        let ivar = ImageData::new(vec![4], Pixels::I32(vec![7, 8, 9, 10])).unwrap();
        append_image(&path, "IVAR", &ivar).unwrap();

        let mut fits = FitsFile::open(&path).unwrap();
        assert_eq!(count_hdus(&mut fits), 2);
        let primary = fits.primary_hdu().unwrap();
        let data = ImageData::read(&mut fits, &primary, u64::MAX).unwrap();
        assert_eq!(data, Some(spectrum()));
        let ext = fits.hdu("IVAR").unwrap();
        assert_eq!(ImageData::read(&mut fits, &ext, u64::MAX).unwrap(), Some(ivar));
    }

    #[test]
    fn rewriting_replaces_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.fits");
        write_fits(&path, &[Card::new("RUN", 1i64)], &[], Some(&spectrum())).unwrap();
        write_fits(&path, &[Card::new("RUN", 2i64)], &[], None).unwrap();

        let mut fits = FitsFile::open(&path).unwrap();
        let hdu = fits.primary_hdu().unwrap();
        assert_eq!(hdu.read_key::<i64>(&mut fits, "RUN").unwrap(), 2);
        assert_eq!(ImageData::read(&mut fits, &hdu, u64::MAX).unwrap(), None);
    }
}
