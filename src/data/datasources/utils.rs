//! Minimal DER writer for the handful of ASN.1 types a receipt payload uses.

use chrono::{DateTime, Datelike as _, SecondsFormat, Utc};

use crate::errors::{EncodingError, ReceiptForgeError};

const TAG_INTEGER: u8 = 0x02;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_UTF8_STRING: u8 = 0x0c;
const TAG_SEQUENCE: u8 = 0x30;

/// What an unset timestamp renders as: the zero instant.
pub(crate) const ZERO_TIMESTAMP: &str = "0001-01-01T00:00:00Z";

fn write_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    let significant = &bytes[skip..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

pub(crate) fn write_tag_length_value(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    out.push(tag);
    write_length(out, value.len());
    out.extend_from_slice(value);
}

fn tag_length_value(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 6);
    write_tag_length_value(&mut out, tag, value);
    out
}

/// Shortest two's complement big-endian encoding.
pub(crate) fn der_integer(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    tag_length_value(TAG_INTEGER, &bytes[start..])
}

pub(crate) fn der_utf8_string(value: &str) -> Vec<u8> {
    tag_length_value(TAG_UTF8_STRING, value.as_bytes())
}

pub(crate) fn der_octet_string(value: &[u8]) -> Vec<u8> {
    tag_length_value(TAG_OCTET_STRING, value)
}

/// Concatenates already-encoded elements into a SEQUENCE.
pub(crate) fn der_sequence<I, T>(elements: I) -> Vec<u8>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut content = Vec::new();
    for element in elements {
        content.extend_from_slice(element.as_ref());
    }
    tag_length_value(TAG_SEQUENCE, &content)
}

/// Formats as `YYYY-MM-DDTHH:MM:SSZ`. Years that don't fit in four digits
/// can't be expressed in that format and are rejected.
pub(crate) fn format_timestamp(t: &DateTime<Utc>) -> Result<String, ReceiptForgeError> {
    if !(0..=9999).contains(&t.year()) {
        return Err(EncodingError::with_debug(
            "timestamp year out of range",
            &t.year(),
        ));
    }
    Ok(t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub(crate) fn format_optional_timestamp(
    t: Option<&DateTime<Utc>>,
) -> Result<String, ReceiptForgeError> {
    match t {
        Some(t) => format_timestamp(t),
        None => Ok(ZERO_TIMESTAMP.to_owned()),
    }
}
