use {
    crate::error::{Error, Result},
    indexmap::IndexMap,
    itertools::Itertools,
    serde::{Deserialize, Serialize},
    serde_json::{Map, Number, Value},
    std::{borrow::Cow, fmt, str::FromStr},
    tap::{Pipe, Tap},
};

/// One component of a composite key: a mapping key or a sequence position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Segment<'a> {
    Idx(usize),
    Field(Cow<'a, str>),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Idx(idx) => write!(f, "{idx}"),
            Segment::Field(cow) => f.write_str(cow),
        }
    }
}

impl<'a> Segment<'a> {
    pub fn field(name: impl Into<Cow<'a, str>>) -> Self {
        Segment::Field(name.into())
    }

    pub fn to_owned(&self) -> Segment<'static> {
        match self {
            Segment::Idx(idx) => Segment::Idx(*idx),
            Segment::Field(cow) => cow.to_string().pipe(Cow::<str>::Owned).pipe(Segment::Field),
        }
    }

    pub fn as_ref<'b>(&'b self) -> Segment<'b> {
        match self {
            Segment::Idx(idx) => Segment::Idx(*idx),
            Segment::Field(cow) => cow.as_ref().pipe(Cow::Borrowed).pipe(Segment::Field),
        }
    }

    /// Strings become fields, unsigned integers become positions.
    pub fn from_value(value: &Value) -> Option<Segment<'static>> {
        match value {
            Value::String(s) => s.clone().pipe(Cow::<str>::Owned).pipe(Segment::Field).pipe(Some),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Segment::Idx),
            _ => None,
        }
    }
}

impl From<&Segment<'_>> for Value {
    fn from(segment: &Segment<'_>) -> Self {
        match segment {
            Segment::Idx(idx) => Value::from(*idx),
            Segment::Field(cow) => Value::String(cow.to_string()),
        }
    }
}

/// Ordered path of [`Segment`]s from the root to a value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct FieldPath<'a>(Vec<Segment<'a>>);

impl<'a> FieldPath<'a> {
    pub fn new(segments: Vec<Segment<'a>>) -> Self {
        Self(segments)
    }
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.0
    }
    pub fn to_owned(&self) -> FieldPath<'static> {
        self.0
            .iter()
            .map(Segment::to_owned)
            .collect::<Vec<_>>()
            .pipe(FieldPath)
    }
    pub fn join(&self, segment: Segment<'a>) -> Self {
        self.clone().tap_mut(|p| p.0.push(segment))
    }
}

impl<'a> FromIterator<Segment<'a>> for FieldPath<'a> {
    fn from_iter<I: IntoIterator<Item = Segment<'a>>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().pipe(FieldPath)
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}

/// Non-string scalar leaf used as a key under `inverse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ScalarKey {
    Null,
    Bool(bool),
    Number(Number),
}

impl fmt::Display for ScalarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKey::Null => f.write_str("null"),
            ScalarKey::Bool(b) => write!(f, "{b}"),
            ScalarKey::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&ScalarKey> for Value {
    fn from(scalar: &ScalarKey) -> Self {
        match scalar {
            ScalarKey::Null => Value::Null,
            ScalarKey::Bool(b) => Value::Bool(*b),
            ScalarKey::Number(n) => Value::Number(n.clone()),
        }
    }
}

/// Composite key produced by a reducer.
///
/// `Path` keeps every original component and is what the tuple reducer builds.
/// `Joined` is the lossy string form built by the path and delimiter reducers.
/// `Scalar` only shows up when `inverse` turns a number, bool or null leaf into a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FlatKey {
    Path(FieldPath<'static>),
    Joined(String),
    Scalar(ScalarKey),
}

impl fmt::Display for FlatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlatKey::Path(path) => path.fmt(f),
            FlatKey::Joined(joined) => f.write_str(joined),
            FlatKey::Scalar(scalar) => scalar.fmt(f),
        }
    }
}

impl FlatKey {
    /// Builds a `Path` key out of anything that yields segments.
    pub fn path<'a>(segments: impl IntoIterator<Item = Segment<'a>>) -> Self {
        segments
            .into_iter()
            .map(|s| s.to_owned())
            .collect::<FieldPath<'static>>()
            .pipe(FlatKey::Path)
    }

    pub fn as_joined(&self) -> Option<&str> {
        match self {
            FlatKey::Joined(joined) => Some(joined),
            FlatKey::Path(_) | FlatKey::Scalar(_) => None,
        }
    }

    /// Turns a leaf value into a key, which is what `inverse` needs.
    ///
    /// Scalars and arrays of strings / unsigned integers qualify; objects and other
    /// arrays are unhashable.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(FlatKey::Joined(s.clone())),
            Value::Null => Ok(FlatKey::Scalar(ScalarKey::Null)),
            Value::Bool(b) => Ok(FlatKey::Scalar(ScalarKey::Bool(*b))),
            Value::Number(n) => Ok(FlatKey::Scalar(ScalarKey::Number(n.clone()))),
            Value::Array(items) => items
                .iter()
                .map(Segment::from_value)
                .collect::<Option<FieldPath<'static>>>()
                .map(FlatKey::Path)
                .ok_or_else(|| Error::UnhashableValue {
                    value: value.clone(),
                }),
            other => Err(Error::UnhashableValue {
                value: other.clone(),
            }),
        }
    }
}

impl From<&FlatKey> for Value {
    fn from(key: &FlatKey) -> Self {
        match key {
            FlatKey::Path(path) => path.segments().iter().map(Value::from).collect::<Vec<_>>().pipe(Value::Array),
            FlatKey::Joined(joined) => Value::String(joined.clone()),
            FlatKey::Scalar(scalar) => Value::from(scalar),
        }
    }
}

impl From<String> for FlatKey {
    fn from(joined: String) -> Self {
        FlatKey::Joined(joined)
    }
}

impl From<&str> for FlatKey {
    fn from(joined: &str) -> Self {
        FlatKey::Joined(joined.to_string())
    }
}

/// Result of flattening: composite keys in traversal order.
pub type FlatMap = IndexMap<FlatKey, Value>;

/// Container shapes a nested [`Value`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// `Value::Object`, always flattenable.
    Map,
    /// `Value::Array`, flattenable by position once enumerated.
    Seq,
}

impl ContainerKind {
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => Some(ContainerKind::Map),
            Value::Array(_) => Some(ContainerKind::Seq),
            _ => None,
        }
    }
}

impl FromStr for ContainerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "map" => Ok(ContainerKind::Map),
            "seq" => Ok(ContainerKind::Seq),
            other => Err(Error::UnknownContainerKind(other.to_string())),
        }
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "Value::Null",
        Value::Bool(_) => "Value::Bool",
        Value::Number(_) => "Value::Number",
        Value::String(_) => "Value::String",
        Value::Array(_) => "Value::Array",
        Value::Object(_) => "Value::Object",
    }
}

pub fn boxed_iter<'a, T, I>(iter: I) -> Box<dyn Iterator<Item = T> + 'a>
where
    T: 'a,
    I: Iterator<Item = T> + 'a,
{
    Box::new(iter)
}

#[extension_traits::extension(pub trait FlatMapExt)]
impl FlatMap {
    /// Converts a map of `Joined` keys into a json object.
    fn into_json_object(self) -> Result<Map<String, Value>> {
        self.into_iter()
            .map(|(key, value)| match key {
                FlatKey::Joined(joined) => Ok((joined, value)),
                other @ (FlatKey::Path(_) | FlatKey::Scalar(_)) => Err(Error::NonStringKey(other)),
            })
            .collect()
    }
}

pub fn flat_map_from_json(object: Map<String, Value>) -> FlatMap {
    object
        .into_iter()
        .map(|(key, value)| (FlatKey::Joined(key), value))
        .collect()
}

pub mod flatten;
pub mod unflatten;

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn test_leaf_to_key_conversion() {
        assert_eq!(FlatKey::from_value(&json!("x")).unwrap(), FlatKey::from("x"));
        assert_eq!(
            FlatKey::from_value(&json!(["a", 0])).unwrap(),
            FlatKey::path([Segment::field("a"), Segment::Idx(0)])
        );
        assert_eq!(
            FlatKey::from_value(&json!(1.5)).unwrap(),
            FlatKey::Scalar(ScalarKey::Number(Number::from_f64(1.5).unwrap()))
        );
        assert_eq!(FlatKey::from_value(&json!(true)).unwrap(), FlatKey::Scalar(ScalarKey::Bool(true)));
        assert_eq!(FlatKey::from_value(&json!(null)).unwrap(), FlatKey::Scalar(ScalarKey::Null));
        assert!(FlatKey::from_value(&json!(["a", -1])).unwrap_err().is_invalid_argument());
        assert!(FlatKey::from_value(&json!({})).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_key_to_value_conversion() {
        let key = FlatKey::path([Segment::field("c"), Segment::Idx(1)]);
        assert_eq!(Value::from(&key), json!(["c", 1]));
        assert_eq!(FlatKey::from_value(&Value::from(&key)).unwrap(), key);
        assert_eq!(Value::from(&FlatKey::from("a.b")), json!("a.b"));
        for scalar in [json!(1), json!(-2), json!(0.5), json!(false), json!(null)] {
            assert_eq!(Value::from(&FlatKey::from_value(&scalar).unwrap()), scalar);
        }
    }

    #[test]
    fn test_display() {
        let key = FlatKey::path([Segment::field("a"), Segment::Idx(3)]);
        assert_eq!(key.to_string(), "(a, 3)");
        assert_eq!(FlatKey::from("a_b").to_string(), "a_b");
        assert_eq!(FlatKey::Scalar(ScalarKey::Null).to_string(), "null");
        assert_eq!(FlatKey::from_value(&json!(7)).unwrap().to_string(), "7");
    }

    #[test]
    fn test_into_json_object() {
        let flat = flat_map_from_json(
            json!({"a.b": 1, "c": [1]})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        );
        assert_eq!(Value::Object(flat.clone().into_json_object().unwrap()), json!({"a.b": 1, "c": [1]}));

        let mut with_path = flat;
        with_path.insert(FlatKey::path([Segment::field("x")]), json!(null));
        assert!(with_path.into_json_object().unwrap_err().is_invalid_argument());

        let with_scalar: FlatMap = [(FlatKey::Scalar(ScalarKey::Bool(true)), json!("a"))].into_iter().collect();
        assert!(with_scalar.into_json_object().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_container_kind_names() {
        assert_eq!("map".parse::<ContainerKind>().unwrap(), ContainerKind::Map);
        assert_eq!("seq".parse::<ContainerKind>().unwrap(), ContainerKind::Seq);
        assert!("list".parse::<ContainerKind>().unwrap_err().is_invalid_argument());
        assert_eq!(ContainerKind::of(&json!([])), Some(ContainerKind::Seq));
        assert_eq!(ContainerKind::of(&json!("s")), None);
    }
}
