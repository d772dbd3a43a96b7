//! The CFITSIO calls `fitsio` does not wrap: header listing, keyword
//! comments, long strings and COMMENT cards. Every function acts on the
//! current HDU of `fits`.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

use fitsio::errors::check_status;
use fitsio::sys;
use fitsio::FitsFile;

use super::card::{Card, KeyValue};
use super::file::HeaderRecord;
use super::FitsResult;

/// Buffer size for keyword, value and comment strings (one full card).
const FLEN_CARD: usize = 81;

/// `%.17G` formatting, enough for any f64 to read back unchanged.
const EXACT_DOUBLE: c_int = -17;

fn to_string(buf: &[c_char]) -> String {
    // SAFETY: CFITSIO NUL-terminates every string it writes into `buf`.
    unsafe { CStr::from_ptr(buf.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

/// Every card of the current HDU, in header order.
pub(crate) fn records(fits: &mut FitsFile) -> FitsResult<Vec<HeaderRecord>> {
    let mut status: c_int = 0;
    let mut count: c_int = 0;
    let mut more: c_int = 0;
    // SAFETY: the pointer comes from an open FitsFile that outlives the call.
    unsafe {
        sys::ffghsp(fits.as_raw(), &mut count, &mut more, &mut status);
    }
    check_status(status)?;

    let mut records = Vec::with_capacity(count.max(0) as usize);
    for n in 1..=count {
        let mut keyword = [0 as c_char; FLEN_CARD];
        let mut value = [0 as c_char; FLEN_CARD];
        let mut comment = [0 as c_char; FLEN_CARD];
        // SAFETY: the buffers are larger than CFITSIO's FLEN_KEYWORD,
        // FLEN_VALUE and FLEN_COMMENT.
        unsafe {
            sys::ffgkyn(
                fits.as_raw(),
                n,
                keyword.as_mut_ptr(),
                value.as_mut_ptr(),
                comment.as_mut_ptr(),
                &mut status,
            );
        }
        check_status(status)?;
        records.push(HeaderRecord {
            keyword: to_string(&keyword),
            value: to_string(&value),
            comment: to_string(&comment),
        });
    }
    Ok(records)
}

/// Append `card`. Strings longer than one card continue on CONTINUE cards.
pub(crate) fn write_card(fits: &mut FitsFile, card: &Card) -> FitsResult<()> {
    let keyword = CString::new(card.keyword.as_str())?;
    let comment = card.comment.as_deref().map(CString::new).transpose()?;
    let comment_ptr = comment.as_ref().map_or(ptr::null(), |c| c.as_ptr());
    let mut status: c_int = 0;

    match &card.value {
        KeyValue::Str(s) => {
            let value = CString::new(s.as_str())?;
            // SAFETY: every pointer is valid for the duration of the call.
            unsafe {
                sys::ffpkls(fits.as_raw(), keyword.as_ptr(), value.as_ptr(), comment_ptr, &mut status);
            }
        }
        // SAFETY: as above; numeric values are passed by value.
        KeyValue::Int(i) => unsafe {
            sys::ffpkyj(fits.as_raw(), keyword.as_ptr(), *i, comment_ptr, &mut status);
        },
        // SAFETY: as above.
        KeyValue::Float(x) => unsafe {
            sys::ffpkyd(fits.as_raw(), keyword.as_ptr(), *x, EXACT_DOUBLE, comment_ptr, &mut status);
        },
    }
    check_status(status)
}

/// Append a COMMENT card.
pub(crate) fn write_comment(fits: &mut FitsFile, text: &str) -> FitsResult<()> {
    let text = CString::new(text)?;
    let mut status: c_int = 0;
    // SAFETY: `text` is NUL-terminated and outlives the call.
    unsafe {
        sys::ffpcom(fits.as_raw(), text.as_ptr(), &mut status);
    }
    check_status(status)
}
