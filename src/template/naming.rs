use std::sync::LazyLock;

use regex_lite::Regex;

/// Spectral classes redrock knows how to fit.
pub const KNOWN_SPECTYPES: [&str; 3] = ["STAR", "GALAXY", "QSO"];

/// Uppercase the OBJECT value and drop every space.
pub fn normalize_spectype(object: &str) -> String {
    object.replace(' ', "").to_uppercase()
}

pub fn is_known_spectype(spectype: &str) -> bool {
    KNOWN_SPECTYPES.contains(&spectype)
}

/// Subtype as stored in RRSUBTYP: the SDSS label without `-` and `/`.
pub fn derive_subtype(name: &str) -> String {
    name.replace(['-', '/'], "")
}

static INDOUS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)$").expect("Indo-US id pattern is valid"));

/// Indo-US library id carried as a trailing `(digits)` in an SDSS label,
/// e.g. `"K1 (12)"` → `Some(12)`.
pub fn parse_indous_id(name: &str) -> Option<u32> {
    let caps = INDOUS_ID.captures(name)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Subtype as used in file names: no spaces, parentheses become `_`.
pub fn file_subtype(subtype: &str) -> String {
    subtype.replace(' ', "").replace(['(', ')'], "_")
}

/// `rrtemplate-<spectype>.fits`, or `rrtemplate-<spectype>-<subtype>.fits`
/// for files holding one of several named templates.
pub fn output_file_name(spectype: &str, subtype: Option<&str>) -> String {
    let spectype = spectype.to_lowercase();
    match subtype {
        Some(subtype) => format!("rrtemplate-{spectype}-{}.fits", file_subtype(subtype)),
        None => format!("rrtemplate-{spectype}.fits"),
    }
}

/// Number of NAMEn labels: every keyword longer than four characters that
/// starts with `NAME`.
pub fn count_named_templates<'a>(keywords: impl IntoIterator<Item = &'a str>) -> usize {
    keywords
        .into_iter()
        .filter(|k| k.len() > 4 && k.starts_with("NAME"))
        .count()
}
