// src/rows/tokenize.rs
use csv::ReaderBuilder;

use super::RawRow;
use crate::error::{RenderError, Result};

/// Split decoded text into raw rows, one per physical line. Rows may have
/// differing cell counts, and a blank line is an empty row so that it still
/// counts toward `skip_lines`.
///
/// The iterator yields an error for the first malformed record; callers are
/// expected to abort on it.
pub fn tokenize<'a>(
    text: &'a str,
    delimiter: u8,
    origin: &'a str,
) -> impl Iterator<Item = Result<RawRow>> + 'a {
    let rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let records = rdr.into_records().enumerate().map(move |(idx, result)| {
        result
            .map(|record| record.iter().map(str::to_string).collect())
            .map_err(|e| {
                RenderError::source_read(origin, format!("CSV parse error at record {}: {}", idx, e))
            })
    });

    PhysicalRows {
        shapes: line_shapes(text, delimiter).into_iter(),
        records,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineShape {
    Blank,
    Record,
}

/// The csv reader drops blank lines; this puts them back in between the
/// records it does yield.
struct PhysicalRows<R> {
    shapes: std::vec::IntoIter<LineShape>,
    records: R,
}

impl<R> Iterator for PhysicalRows<R>
where
    R: Iterator<Item = Result<RawRow>>,
{
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.shapes.next() {
            Some(LineShape::Blank) => Some(Ok(RawRow::new())),
            _ => self.records.next(),
        }
    }
}

/// Classify each record-terminated line as blank or not. Terminators inside a
/// quoted field do not end a line. `\r\n`, `\n` and a lone `\r` each end one.
fn line_shapes(text: &str, delimiter: u8) -> Vec<LineShape> {
    let bytes = text.as_bytes();
    let mut shapes = Vec::new();
    let mut line_empty = true;
    let mut field_start = true;
    let mut quoted = false;

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if quoted {
            if b == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 1;
                } else {
                    quoted = false;
                }
            }
        } else {
            match b {
                b'\r' | b'\n' => {
                    shapes.push(if line_empty {
                        LineShape::Blank
                    } else {
                        LineShape::Record
                    });
                    if b == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_empty = true;
                    field_start = true;
                    i += 1;
                    continue;
                }
                // only a quote opening a field starts quoting; elsewhere it is literal
                b'"' if field_start => quoted = true,
                _ => {}
            }
            field_start = b == delimiter;
        }
        line_empty = false;
        i += 1;
    }
    if !line_empty {
        shapes.push(LineShape::Record);
    }
    shapes
}
