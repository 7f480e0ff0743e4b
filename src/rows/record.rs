// src/rows/record.rs
use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::warn;

use super::{HeaderSpec, RawRow};

/// One row as an ordered field name → value mapping.
///
/// Serializes as a map in column order, so templates see `row.name`,
/// `row["name"]` and `row.items()` in the order the cells appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn with_capacity(n: usize) -> Self {
        Record {
            fields: Vec::with_capacity(n),
        }
    }

    /// Insert a field. A repeated name keeps its first position and takes the
    /// new value, so keys stay unique.
    pub fn insert(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => {
                warn!(field = %name, "duplicate field name, earlier cell dropped");
                slot.1 = value;
            }
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Name for a column past the end of the header: prefix plus the column's
/// position, zero-padded to at least two digits.
pub fn auto_name(prefix: &str, idx: usize) -> String {
    format!("{}{:02}", prefix, idx)
}

/// Turns raw rows into records against a fixed header.
pub struct FieldNamer<'a> {
    header: &'a HeaderSpec,
    prefix: &'a str,
}

impl<'a> FieldNamer<'a> {
    pub fn new(header: &'a HeaderSpec, prefix: &'a str) -> Self {
        FieldNamer { header, prefix }
    }

    /// Cells beyond the header get positional auto names; header names with
    /// no cell are left out of the record.
    pub fn name(&self, row: RawRow) -> Record {
        let mut record = Record::with_capacity(row.len());
        for (idx, cell) in row.into_iter().enumerate() {
            let key = match self.header.get(idx) {
                Some(name) => name.to_string(),
                None => auto_name(self.prefix, idx),
            };
            record.insert(key, cell);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header(names: &[&str]) -> HeaderSpec {
        HeaderSpec::new(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn overflow_columns_continue_after_header() {
        let h = header(&["group_id", "number", "name"]);
        let rec = FieldNamer::new(&h, "col_").name(row(&["1", "2", "Yurakucho", "x", "y"]));
        assert_eq!(
            rec.keys().collect::<Vec<_>>(),
            vec!["group_id", "number", "name", "col_03", "col_04"]
        );
        assert_eq!(rec.get("col_04"), Some("y"));
    }

    #[test]
    fn short_row_leaves_names_absent() {
        let h = header(&["a", "b", "c"]);
        let rec = FieldNamer::new(&h, "col_").name(row(&["1"]));
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("a"), Some("1"));
        assert_eq!(rec.get("b"), None);
    }

    #[test]
    fn empty_header_names_everything() {
        let h = HeaderSpec::default();
        let rec = FieldNamer::new(&h, "col_").name(row(&["A0001", "C0002"]));
        assert_eq!(
            rec.iter().collect::<Vec<_>>(),
            vec![("col_00", "A0001"), ("col_01", "C0002")]
        );
    }

    #[test]
    fn counts_follow_min_and_overflow() {
        for h_len in 0..5 {
            let names: Vec<String> = (0..h_len).map(|i| format!("h{}", i)).collect();
            let h = HeaderSpec::new(names);
            for k in 0..7 {
                let cells: RawRow = (0..k).map(|i| format!("v{}", i)).collect();
                let rec = FieldNamer::new(&h, "col_").name(cells);
                let named = rec.keys().filter(|key| key.starts_with('h')).count();
                let auto = rec.keys().filter(|key| key.starts_with("col_")).count();
                assert_eq!(named, k.min(h_len));
                assert_eq!(auto, k.saturating_sub(h_len));
            }
        }
    }

    #[test]
    fn auto_names_widen_past_two_digits() {
        assert_eq!(auto_name("col_", 7), "col_07");
        assert_eq!(auto_name("col_", 42), "col_42");
        assert_eq!(auto_name("c", 123), "c123");
    }

    #[test]
    fn custom_prefix() {
        let h = header(&["a"]);
        let rec = FieldNamer::new(&h, "field").name(row(&["1", "2"]));
        assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["a", "field01"]);
    }

    #[test]
    fn duplicate_names_stay_unique() {
        let h = header(&["x", "x"]);
        let rec = FieldNamer::new(&h, "col_").name(row(&["1", "2"]));
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("x"), Some("2"));
    }

    #[test]
    fn repeated_header_name_keeps_first_slot() {
        crate::init_test_logging();
        let h = header(&["a", "b", "a"]);
        let rec = FieldNamer::new(&h, "col_").name(row(&["1", "2", "3"]));
        assert_eq!(rec.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn serializes_in_column_order() -> serde_json::Result<()> {
        let h = header(&["z", "a"]);
        let rec = FieldNamer::new(&h, "col_").name(row(&["1", "2", "3"]));
        assert_eq!(
            serde_json::to_string(&rec)?,
            r#"{"z":"1","a":"2","col_02":"3"}"#
        );
        Ok(())
    }
}
