// src/rows/skip.rs
use crate::error::Result;

/// Iterator adapter dropping the first `remaining` rows.
///
/// Unlike [`Iterator::skip`], a tokenizer error inside the skipped prefix is
/// still yielded: a malformed source aborts the render wherever the bad row is.
pub struct SkipRows<I> {
    inner: I,
    remaining: usize,
}

pub fn skip_rows<I, T>(rows: I, n: usize) -> SkipRows<I>
where
    I: Iterator<Item = Result<T>>,
{
    SkipRows {
        inner: rows,
        remaining: n,
    }
}

impl<I, T> Iterator for SkipRows<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            self.remaining -= 1;
            match self.inner.next()? {
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        self.inner.next()
    }
}
