use {
    crate::{
        error::{Error, Result},
        flat_map::{FieldPath, FlatKey, Segment},
    },
    serde_json::Value,
    std::{borrow::Cow, fmt, path::PathBuf, str::FromStr, sync::Arc},
    tap::Pipe,
};

pub type ReduceFn = Arc<dyn Fn(Option<&FlatKey>, &Segment<'_>) -> FlatKey + Send + Sync>;

/// Reducer that also receives the container the child key was taken from.
pub type ReduceWithParentFn =
    Arc<dyn Fn(Option<&FlatKey>, &Segment<'_>, &Value) -> FlatKey + Send + Sync>;

/// Strategy joining a parent key and a child key into a composite key.
#[derive(Clone, Default)]
pub enum Reducer {
    #[default]
    Tuple,
    Path,
    Dot,
    Underscore,
    Delimited(Cow<'static, str>),
    Custom(ReduceFn),
    CustomWithParent(ReduceWithParentFn),
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reducer::Tuple => f.write_str("Tuple"),
            Reducer::Path => f.write_str("Path"),
            Reducer::Dot => f.write_str("Dot"),
            Reducer::Underscore => f.write_str("Underscore"),
            Reducer::Delimited(delimiter) => f.debug_tuple("Delimited").field(delimiter).finish(),
            Reducer::Custom(_) => f.write_str("Custom(..)"),
            Reducer::CustomWithParent(_) => f.write_str("CustomWithParent(..)"),
        }
    }
}

impl FromStr for Reducer {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "tuple" => Ok(Reducer::Tuple),
            "path" => Ok(Reducer::Path),
            "dot" => Ok(Reducer::Dot),
            "underscore" => Ok(Reducer::Underscore),
            other => Err(Error::UnknownReducer(other.to_string())),
        }
    }
}

/// A reducer resolved to one calling convention.
pub(crate) enum ResolvedReducer<'r> {
    Parentless(Box<dyn Fn(Option<&FlatKey>, &Segment<'_>) -> FlatKey + 'r>),
    WithParent(&'r (dyn Fn(Option<&FlatKey>, &Segment<'_>, &Value) -> FlatKey + Send + Sync)),
}

impl ResolvedReducer<'_> {
    pub(crate) fn reduce(&self, parent: Option<&FlatKey>, child: &Segment<'_>, container: &Value) -> FlatKey {
        match self {
            ResolvedReducer::Parentless(reduce) => reduce(parent, child),
            ResolvedReducer::WithParent(reduce) => reduce(parent, child, container),
        }
    }
}

impl Reducer {
    pub fn custom(reduce: impl Fn(Option<&FlatKey>, &Segment<'_>) -> FlatKey + Send + Sync + 'static) -> Self {
        Reducer::Custom(Arc::new(reduce))
    }

    pub fn custom_with_parent(
        reduce: impl Fn(Option<&FlatKey>, &Segment<'_>, &Value) -> FlatKey + Send + Sync + 'static,
    ) -> Self {
        Reducer::CustomWithParent(Arc::new(reduce))
    }

    pub(crate) fn resolve(&self) -> Result<ResolvedReducer<'_>> {
        Ok(match self {
            Reducer::Tuple => ResolvedReducer::Parentless(Box::new(tuple_reducer)),
            Reducer::Path => ResolvedReducer::Parentless(Box::new(path_reducer)),
            Reducer::Dot => ResolvedReducer::Parentless(Box::new(dot_reducer)),
            Reducer::Underscore => ResolvedReducer::Parentless(Box::new(underscore_reducer)),
            Reducer::Delimited(delimiter) if delimiter.is_empty() => return Err(Error::EmptyDelimiter),
            Reducer::Delimited(delimiter) => ResolvedReducer::Parentless(Box::new(
                move |parent: Option<&FlatKey>, child: &Segment<'_>| join_with(delimiter, parent, child),
            )),
            Reducer::Custom(reduce) => ResolvedReducer::Parentless(Box::new(reduce.as_ref())),
            Reducer::CustomWithParent(reduce) => ResolvedReducer::WithParent(reduce.as_ref()),
        })
    }
}

pub fn tuple_reducer(parent: Option<&FlatKey>, child: &Segment<'_>) -> FlatKey {
    match parent {
        None => FlatKey::path([child.as_ref()]),
        Some(FlatKey::Path(path)) => path.join(child.to_owned()).pipe(FlatKey::Path),
        Some(other @ (FlatKey::Joined(_) | FlatKey::Scalar(_))) => {
            [Segment::field(other.to_string()), child.to_owned()]
                .into_iter()
                .collect::<FieldPath<'static>>()
                .pipe(FlatKey::Path)
        }
    }
}

pub fn path_reducer(parent: Option<&FlatKey>, child: &Segment<'_>) -> FlatKey {
    match parent {
        None => child.to_string(),
        Some(parent) => PathBuf::from(parent.to_string())
            .join(child.to_string())
            .to_string_lossy()
            .into_owned(),
    }
    .pipe(FlatKey::Joined)
}

pub fn dot_reducer(parent: Option<&FlatKey>, child: &Segment<'_>) -> FlatKey {
    join_with(".", parent, child)
}

pub fn underscore_reducer(parent: Option<&FlatKey>, child: &Segment<'_>) -> FlatKey {
    join_with("_", parent, child)
}

/// Reducer joining keys with an arbitrary, non-empty delimiter.
pub fn make_reducer(delimiter: impl Into<Cow<'static, str>>) -> Result<Reducer> {
    match delimiter.into() {
        delimiter if delimiter.is_empty() => Err(Error::EmptyDelimiter),
        delimiter => Ok(Reducer::Delimited(delimiter)),
    }
}

fn join_with(delimiter: &str, parent: Option<&FlatKey>, child: &Segment<'_>) -> FlatKey {
    match parent {
        None => child.to_string(),
        Some(parent) => format!("{parent}{delimiter}{child}"),
    }
    .pipe(FlatKey::Joined)
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn chain(reducer: &Reducer, segments: &[Segment<'_>]) -> Option<FlatKey> {
        let resolved = reducer.resolve().unwrap();
        segments
            .iter()
            .fold(None, |parent, child| Some(resolved.reduce(parent.as_ref(), child, &json!({}))))
    }

    #[test]
    fn test_tuple_reducer_keeps_components() {
        let key = chain(&Reducer::Tuple, &[Segment::field("a"), Segment::Idx(2), Segment::field("b")]);
        assert_eq!(
            key,
            Some(FlatKey::path([Segment::field("a"), Segment::Idx(2), Segment::field("b")]))
        );
    }

    #[test]
    fn test_string_reducers() {
        let segments = [Segment::field("a"), Segment::field("b"), Segment::Idx(0)];
        assert_eq!(chain(&Reducer::Dot, &segments), Some(FlatKey::from("a.b.0")));
        assert_eq!(chain(&Reducer::Underscore, &segments), Some(FlatKey::from("a_b_0")));
        assert_eq!(chain(&make_reducer("::").unwrap(), &segments), Some(FlatKey::from("a::b::0")));
        assert_eq!(chain(&Reducer::Dot, &segments[..1]), Some(FlatKey::from("a")));
    }

    #[cfg(unix)]
    #[test]
    fn test_path_reducer() {
        let segments = [Segment::field("a"), Segment::field("b"), Segment::Idx(1)];
        assert_eq!(chain(&Reducer::Path, &segments), Some(FlatKey::from("a/b/1")));
        // absolute components restart the path
        let segments = [Segment::field("a"), Segment::field("/b")];
        assert_eq!(chain(&Reducer::Path, &segments), Some(FlatKey::from("/b")));
    }

    #[test]
    fn test_empty_delimiter_is_rejected() {
        assert!(matches!(make_reducer(""), Err(Error::EmptyDelimiter)));
        assert!(Reducer::Delimited("".into()).resolve().is_err());
    }

    #[test]
    fn test_named_lookup() {
        assert!(matches!("underscore".parse::<Reducer>(), Ok(Reducer::Underscore)));
        let err = "snake".parse::<Reducer>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("snake"));
    }

    #[test]
    fn test_custom_with_parent_sees_container() {
        let reducer = Reducer::custom_with_parent(|parent, child, container| {
            let child = match container {
                Value::Array(_) => format!("[{child}]"),
                _ => child.to_string(),
            };
            match parent {
                None => FlatKey::Joined(child),
                Some(parent) => FlatKey::Joined(format!("{parent}.{child}")),
            }
        });
        let resolved = reducer.resolve().unwrap();
        let parent = resolved.reduce(None, &Segment::field("a"), &json!({"a": [1]}));
        let key = resolved.reduce(Some(&parent), &Segment::Idx(0), &json!([1]));
        assert_eq!(key, FlatKey::from("a.[0]"));
    }
}
