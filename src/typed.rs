use {
    crate::{
        error::{Error, Result},
        flat_map::{FlatMap, flat_map_from_json, flatten::flatten, unflatten::unflatten},
        options::{FlattenOptions, UnflattenOptions},
        strategy::{Reducer, Splitter},
    },
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    serde_json::{Map, Value},
    tap::Pipe,
    tracing::instrument,
};

/// Serializes `value` through `serde_json` and flattens the result.
pub fn to_flat_map<T>(value: &T, options: &FlattenOptions) -> Result<FlatMap>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(value)
        .map_err(Error::Serializing)
        .and_then(|value| flatten(&value, options))
}

/// Unflattens `flat` and deserializes the nested value into `T`.
pub fn from_flat_map<T>(flat: &FlatMap, options: &UnflattenOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    unflatten(flat, options)
        .map(Value::Object)
        .and_then(|value| serde_json::from_value(value).map_err(Error::Deserializing))
}

/// Wrapper that (de)serializes `T` as a single-level map with dot-joined keys.
///
/// `{"child": {"field": 1}}` is written as `{"child.field": 1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened<T>(pub T);

impl<T> Flattened<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Serialize for Flattened<T>
where
    T: Serialize,
{
    #[instrument(skip_all)]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        FlattenOptions::default()
            .with_reducer(Reducer::Dot)
            .pipe(|options| to_flat_map(&self.0, &options))
            .map_err(serde::ser::Error::custom)
            .and_then(|flat| serializer.collect_map(flat.iter()))
    }
}

impl<'de, T> Deserialize<'de> for Flattened<T>
where
    T: DeserializeOwned,
{
    #[instrument(skip_all)]
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer)
            .map(flat_map_from_json)
            .and_then(|flat| {
                UnflattenOptions::default()
                    .with_splitter(Splitter::Dot)
                    .pipe(|options| from_flat_map::<T>(&flat, &options))
                    .map_err(serde::de::Error::custom)
            })
            .map(Self)
    }
}
