use {
    super::{FlatKey, FlatMap, Segment},
    crate::{
        error::{Error, Result},
        options::UnflattenOptions,
    },
    serde_json::{Map, Value},
    std::borrow::Cow,
    tracing::{debug, instrument},
};

/// Rebuilds the nested structure described by `flat`, splitting keys with `options.splitter`.
///
/// Entries are applied in the order of `flat`. Two entries that resolve to the same path,
/// or where one path runs through the other's leaf, fail with [`Error::DuplicatedPath`].
#[instrument(level = "debug", skip_all, fields(splitter = ?options.splitter, inverse = options.inverse))]
pub fn unflatten(flat: &FlatMap, options: &UnflattenOptions) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for (key, value) in flat {
        let (key, value) = match options.inverse {
            true => (Cow::Owned(FlatKey::from_value(value)?), Value::from(key)),
            false => (Cow::Borrowed(key), value.clone()),
        };
        let path = options.splitter.split(&key)?;
        let Some((last, parents)) = path.segments().split_last() else {
            return Err(Error::EmptyPath(key.into_owned()));
        };
        if !nested_set(&mut out, parents, last, value) {
            return Err(Error::DuplicatedPath { path: path.clone() });
        }
    }
    debug!(entries = flat.len(), "unflattened");
    Ok(out)
}

/// Walks `parents` from `root`, creating objects on the way, and sets `last`.
/// Returns `false` when the path is already taken.
fn nested_set(root: &mut Map<String, Value>, parents: &[Segment<'_>], last: &Segment<'_>, value: Value) -> bool {
    let mut node = root;
    for segment in parents {
        node = match node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(map) => map,
            _ => return false,
        };
    }
    match node.contains_key(&last.to_string()) {
        true => false,
        false => node.insert(last.to_string(), value).is_none(),
    }
}
