// src/render/filters.rs
use minijinja::{context, Error, ErrorKind, Value};

/// `seq|sequential_group_by("attr")`: split `seq` into runs of consecutive
/// items sharing the same `attr` value. Unlike `groupby` nothing is sorted, so
/// a value that reappears later starts a new group.
///
/// Each group exposes `grouper` (the shared value) and `list` (the items).
pub fn sequential_group_by(value: Value, attr: &str) -> Result<Value, Error> {
    let iter = value.try_iter().map_err(|_| {
        Error::new(
            ErrorKind::InvalidOperation,
            "sequential_group_by expects a sequence",
        )
    })?;

    let mut groups: Vec<Value> = Vec::new();
    let mut current: Option<(Value, Vec<Value>)> = None;

    for item in iter {
        let key = item.get_attr(attr)?;
        if let Some((grouper, list)) = current.as_mut() {
            if *grouper == key {
                list.push(item);
                continue;
            }
        }
        if let Some((grouper, list)) = current.replace((key, vec![item])) {
            groups.push(context! { grouper => grouper, list => list });
        }
    }
    if let Some((grouper, list)) = current {
        groups.push(context! { grouper => grouper, list => list });
    }

    Ok(Value::from(groups))
}
