// src/rows/stream.rs
use serde::Serialize;
use tracing::{debug, instrument};

use super::{skip_rows, FieldNamer, HeaderSource, HeaderSpec, RawRow, Record, SkipRows};
use crate::{config::RenderContext, error::Result};

/// Lazily shapes raw rows into records: skip, resolve the header once on the
/// first pull, then name every remaining row.
pub struct Records<I> {
    rows: SkipRows<I>,
    source: Option<HeaderSource>,
    header: HeaderSpec,
    prefix: String,
}

impl<I> Records<I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    pub fn new(rows: I, ctx: &RenderContext) -> Self {
        Records {
            rows: skip_rows(rows, ctx.skip_lines()),
            source: Some(HeaderSource::from_context(ctx)),
            header: HeaderSpec::default(),
            prefix: ctx.header_prefix().to_string(),
        }
    }

    /// The resolved header; empty until the first record has been pulled.
    pub fn header(&self) -> &HeaderSpec {
        &self.header
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = Result<RawRow>>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.source.take() {
            match source.resolve(&mut self.rows) {
                Ok(header) => self.header = header,
                Err(e) => return Some(Err(e)),
            }
        }
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        Some(Ok(FieldNamer::new(&self.header, &self.prefix).name(row)))
    }
}

/// Every record of one source, in input order. Bound to templates as `rows`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordStream {
    records: Vec<Record>,
}

impl RecordStream {
    /// Drain `rows` completely. The first error aborts the whole stream.
    #[instrument(level = "debug", skip_all, fields(skip_lines = ctx.skip_lines(), use_header = ctx.use_header()))]
    pub fn build<I>(rows: I, ctx: &RenderContext) -> Result<Self>
    where
        I: Iterator<Item = Result<RawRow>>,
    {
        let mut it = Records::new(rows, ctx);
        let records = it.by_ref().collect::<Result<Vec<_>>>()?;
        debug!(
            records = records.len(),
            header_columns = it.header().len(),
            "record stream built"
        );
        Ok(RecordStream { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ConfigLayer, error::RenderError, rows::tokenize};

    fn context_for(layer: ConfigLayer) -> Result<RenderContext> {
        RenderContext::from_layer(&layer)
    }

    fn build(text: &str, layer: ConfigLayer) -> Result<RecordStream> {
        let ctx = context_for(layer)?;
        RecordStream::build(tokenize(text, ctx.delimiter_byte(), "inline"), &ctx)
    }

    fn keys(rec: &Record) -> Vec<&str> {
        rec.keys().collect()
    }

    #[test]
    fn headless_rows_are_auto_named() -> Result<()> {
        let stream = build("A0001,C0002\nB0001,C0002", ConfigLayer::default())?;
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.records()[0].get("col_00"), Some("A0001"));
        assert_eq!(stream.records()[1].get("col_00"), Some("B0001"));
        Ok(())
    }

    #[test]
    fn skip_then_header() -> Result<()> {
        let text = "junk1\njunk2\njunk3\nFIRST,SECOND\nC0001,C0002\n";
        let stream = build(
            text,
            ConfigLayer {
                skip_lines: Some(3),
                use_header: Some(true),
                ..Default::default()
            },
        )?;
        assert_eq!(stream.len(), 1);
        let rec = &stream.records()[0];
        assert_eq!(keys(rec), vec!["FIRST", "SECOND"]);
        assert_eq!(rec.get("SECOND"), Some("C0002"));
        Ok(())
    }

    #[test]
    fn blank_line_counts_toward_skip() -> Result<()> {
        let stream = build(
            "report title\n\nFIRST,SECOND\nC1,C2\nD1,D2\n",
            ConfigLayer {
                skip_lines: Some(2),
                use_header: Some(true),
                ..Default::default()
            },
        )?;
        assert_eq!(stream.len(), 2);
        assert_eq!(keys(&stream.records()[0]), vec!["FIRST", "SECOND"]);
        assert_eq!(stream.records()[0].get("FIRST"), Some("C1"));
        assert_eq!(stream.records()[1].get("SECOND"), Some("D2"));
        Ok(())
    }

    #[test]
    fn skip_without_header_keeps_all_survivors() -> Result<()> {
        let stream = build(
            "a\nb\nc\nd\ne",
            ConfigLayer {
                skip_lines: Some(3),
                ..Default::default()
            },
        )?;
        let firsts: Vec<_> = stream.records().iter().filter_map(|r| r.get("col_00")).collect();
        assert_eq!(firsts, vec!["d", "e"]);
        Ok(())
    }

    #[test]
    fn names_with_skip_and_overflow() -> Result<()> {
        let text = "group_id,number,name\n1,01,Ikebukuro,x,y\n1,02,Kanamecho\n";
        let stream = build(
            text,
            ConfigLayer {
                skip_lines: Some(1),
                names: Some(vec!["group_id".into(), "number".into(), "name".into()]),
                ..Default::default()
            },
        )?;
        assert_eq!(stream.len(), 2);
        assert_eq!(
            keys(&stream.records()[0]),
            vec!["group_id", "number", "name", "col_03", "col_04"]
        );
        assert_eq!(keys(&stream.records()[1]), vec!["group_id", "number", "name"]);
        Ok(())
    }

    #[test]
    fn header_row_wins_over_names() -> Result<()> {
        let stream = build(
            "group_id,number,name\n1,01,Ikebukuro,x\n",
            ConfigLayer {
                use_header: Some(true),
                names: Some(vec!["invalid".into(), "names".into(), "specified".into()]),
                ..Default::default()
            },
        )?;
        assert_eq!(
            keys(&stream.records()[0]),
            vec!["group_id", "number", "name", "col_03"]
        );
        Ok(())
    }

    #[test]
    fn short_header_row_with_long_data_rows() -> Result<()> {
        let stream = build(
            "A,B\n1,2,3,4\n5\n",
            ConfigLayer {
                use_header: Some(true),
                ..Default::default()
            },
        )?;
        assert_eq!(keys(&stream.records()[0]), vec!["A", "B", "col_02", "col_03"]);
        assert_eq!(keys(&stream.records()[1]), vec!["A"]);
        Ok(())
    }

    #[test]
    fn header_requested_but_everything_skipped() -> Result<()> {
        let stream = build(
            "a\nb\n",
            ConfigLayer {
                skip_lines: Some(5),
                use_header: Some(true),
                ..Default::default()
            },
        )?;
        assert!(stream.is_empty());
        Ok(())
    }

    #[test]
    fn only_a_header_row_gives_no_records() -> Result<()> {
        let stream = build(
            "FIRST,SECOND\n",
            ConfigLayer {
                use_header: Some(true),
                ..Default::default()
            },
        )?;
        assert!(stream.is_empty());
        Ok(())
    }

    #[test]
    fn error_anywhere_aborts_the_stream() -> Result<()> {
        let ctx = context_for(ConfigLayer::default())?;
        let rows = vec![
            Ok(vec!["a".to_string()]),
            Err(RenderError::source_read("x", "bad row")),
            Ok(vec!["c".to_string()]),
        ];
        let result = RecordStream::build(rows.into_iter(), &ctx);
        assert!(matches!(result, Err(RenderError::SourceRead { .. })));
        Ok(())
    }
}
