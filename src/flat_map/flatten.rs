use {
    super::{ContainerKind, FlatKey, FlatMap, Segment, boxed_iter, value_kind},
    crate::{
        error::{Error, Result},
        options::FlattenOptions,
        strategy::reducer::ResolvedReducer,
    },
    indexmap::map::Entry,
    serde_json::Value,
    std::borrow::Cow,
    tap::Pipe,
    tracing::{debug, instrument, trace},
};

/// Flattens `value` into a single-level map whose keys are built by `options.reducer`.
///
/// `value` must be an object, or an array when [`ContainerKind::Seq`] is enumerated.
/// Traversal is depth-first and pre-order, so the output keeps that order.
///
/// Empty containers are dropped unless their kind is listed in `keep_empty_types`.
/// Any key collision fails the whole call; under `inverse` the leaf values are the keys
/// that must be unique.
#[instrument(level = "debug", skip_all, fields(reducer = ?options.reducer, inverse = options.inverse))]
pub fn flatten(value: &Value, options: &FlattenOptions) -> Result<FlatMap> {
    if !ContainerKind::of(value).is_some_and(|kind| is_flattenable(options, kind)) {
        return Err(Error::NotFlattenable {
            found: value_kind(value),
            flattenable: options.flattenable_types(),
        });
    }
    if options.max_flatten_depth == Some(0) {
        return Err(Error::InvalidDepth);
    }

    let flattener = Flattener {
        reducer: options.reducer.resolve()?,
        options,
    };
    let mut out = FlatMap::new();
    flattener.flatten_into(value, 1, None, &mut out)?;
    debug!(entries = out.len(), "flattened");
    Ok(out)
}

fn is_flattenable(options: &FlattenOptions, kind: ContainerKind) -> bool {
    match kind {
        ContainerKind::Map => true,
        ContainerKind::Seq => options.enumerates(ContainerKind::Seq),
    }
}

struct Flattener<'o> {
    reducer: ResolvedReducer<'o>,
    options: &'o FlattenOptions,
}

impl Flattener<'_> {
    fn children<'v>(&self, container: &'v Value) -> Option<Box<dyn Iterator<Item = (Segment<'v>, &'v Value)> + 'v>> {
        match container {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| (key.as_str().pipe(Cow::Borrowed).pipe(Segment::Field), value))
                .pipe(boxed_iter)
                .pipe(Some),
            Value::Array(items) if self.options.enumerates(ContainerKind::Seq) => items
                .iter()
                .enumerate()
                .map(|(idx, value)| (Segment::Idx(idx), value))
                .pipe(boxed_iter)
                .pipe(Some),
            _ => None,
        }
    }

    fn may_descend(&self, depth: usize) -> bool {
        self.options.max_flatten_depth.is_none_or(|max| depth < max)
    }

    /// Returns whether `container` had any children at all.
    fn flatten_into(&self, container: &Value, depth: usize, parent: Option<&FlatKey>, out: &mut FlatMap) -> Result<bool> {
        let Some(children) = self.children(container) else {
            return Ok(false);
        };
        let mut has_item = false;
        for (segment, value) in children {
            has_item = true;
            let key = self.reducer.reduce(parent, &segment, container);

            if let Some(kind) = ContainerKind::of(value).filter(|kind| is_flattenable(self.options, *kind)) {
                if self.may_descend(depth) {
                    if self.flatten_into(value, depth + 1, Some(&key), out)? {
                        continue;
                    }
                    if !self.options.keeps_empty(kind) {
                        trace!(%key, ?kind, "dropping empty container");
                        continue;
                    }
                } else {
                    trace!(%key, depth, "depth limit reached, keeping container as-is");
                }
            }

            self.insert(out, key, value)?;
        }
        Ok(has_item)
    }

    fn insert(&self, out: &mut FlatMap, key: FlatKey, value: &Value) -> Result<()> {
        let (key, value) = match self.options.inverse {
            true => (FlatKey::from_value(value)?, Value::from(&key)),
            false => (key, value.clone()),
        };
        match out.entry(key) {
            Entry::Occupied(occupied) => Err(Error::DuplicatedKey(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(value);
                Ok(())
            }
        }
    }
}
