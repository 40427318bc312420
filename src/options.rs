//! Settings for [`flatten`](crate::flatten) and [`unflatten`](crate::unflatten).
//!
//! [`FlattenOptions`] / [`UnflattenOptions`] hold live strategies (including closures).
//! [`FlattenConfig`] / [`UnflattenConfig`] are their serde-friendly counterparts,
//! naming strategies by string so settings can be loaded from any serde format.

use {
    crate::{
        error::{Error, Result},
        flat_map::ContainerKind,
        strategy::{Reducer, Splitter},
    },
    serde::{Deserialize, Serialize},
    tap::{Pipe, Tap},
};

#[derive(Debug, Clone, Default)]
pub struct FlattenOptions {
    pub reducer: Reducer,
    /// Swap keys and values in the output.
    pub inverse: bool,
    /// `None` flattens all the way down. `Some(0)` is rejected by `flatten`.
    pub max_flatten_depth: Option<usize>,
    /// Containers traversed by position. Mappings are always traversed by key.
    pub enumerate_types: Vec<ContainerKind>,
    /// Containers kept as values when empty instead of being dropped.
    pub keep_empty_types: Vec<ContainerKind>,
}

impl FlattenOptions {
    pub fn with_reducer(self, reducer: Reducer) -> Self {
        self.tap_mut(|o| o.reducer = reducer)
    }

    pub fn with_inverse(self, inverse: bool) -> Self {
        self.tap_mut(|o| o.inverse = inverse)
    }

    pub fn with_max_flatten_depth(self, depth: usize) -> Self {
        self.tap_mut(|o| o.max_flatten_depth = Some(depth))
    }

    pub fn with_enumerate_types(self, kinds: impl IntoIterator<Item = ContainerKind>) -> Self {
        self.tap_mut(|o| o.enumerate_types.extend(kinds))
    }

    pub fn with_keep_empty_types(self, kinds: impl IntoIterator<Item = ContainerKind>) -> Self {
        self.tap_mut(|o| o.keep_empty_types.extend(kinds))
    }

    pub(crate) fn enumerates(&self, kind: ContainerKind) -> bool {
        self.enumerate_types.contains(&kind)
    }

    pub(crate) fn keeps_empty(&self, kind: ContainerKind) -> bool {
        self.keep_empty_types.contains(&kind)
    }

    /// Kinds treated as flattenable: mappings, plus whatever is enumerated.
    pub(crate) fn flattenable_types(&self) -> Vec<ContainerKind> {
        std::iter::once(ContainerKind::Map)
            .chain(self.enumerate_types.iter().copied().filter(|kind| *kind != ContainerKind::Map))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnflattenOptions {
    pub splitter: Splitter,
    /// Swap keys and values of the input before splitting.
    pub inverse: bool,
}

impl UnflattenOptions {
    pub fn with_splitter(self, splitter: Splitter) -> Self {
        self.tap_mut(|o| o.splitter = splitter)
    }

    pub fn with_inverse(self, inverse: bool) -> Self {
        self.tap_mut(|o| o.inverse = inverse)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlattenConfig {
    /// One of `tuple`, `path`, `dot`, `underscore`. Defaults to `tuple`.
    pub reducer: Option<String>,
    pub inverse: bool,
    pub max_flatten_depth: Option<usize>,
    pub enumerate_types: Vec<ContainerKind>,
    pub keep_empty_types: Vec<ContainerKind>,
}

impl TryFrom<FlattenConfig> for FlattenOptions {
    type Error = Error;

    fn try_from(config: FlattenConfig) -> Result<Self> {
        let FlattenConfig {
            reducer,
            inverse,
            max_flatten_depth,
            enumerate_types,
            keep_empty_types,
        } = config;
        reducer
            .as_deref()
            .map(str::parse::<Reducer>)
            .transpose()?
            .unwrap_or_default()
            .pipe(|reducer| FlattenOptions {
                reducer,
                inverse,
                max_flatten_depth,
                enumerate_types,
                keep_empty_types,
            })
            .pipe(Ok)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnflattenConfig {
    /// One of `tuple`, `path`, `dot`, `underscore`. Defaults to `tuple`.
    pub splitter: Option<String>,
    pub inverse: bool,
}

impl TryFrom<UnflattenConfig> for UnflattenOptions {
    type Error = Error;

    fn try_from(UnflattenConfig { splitter, inverse }: UnflattenConfig) -> Result<Self> {
        splitter
            .as_deref()
            .map(str::parse::<Splitter>)
            .transpose()?
            .unwrap_or_default()
            .pipe(|splitter| UnflattenOptions { splitter, inverse })
            .pipe(Ok)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, anyhow::Context};

    #[test]
    fn test_flatten_config_from_json() -> anyhow::Result<()> {
        let options: FlattenOptions = serde_json::from_str::<FlattenConfig>(
            r#"{"reducer": "dot", "max_flatten_depth": 2, "enumerate_types": ["seq"], "keep_empty_types": ["map", "seq"]}"#,
        )
        .context("parsing config")?
        .try_into()?;
        anyhow::ensure!(matches!(options.reducer, Reducer::Dot));
        anyhow::ensure!(options.max_flatten_depth == Some(2));
        anyhow::ensure!(!options.inverse);
        anyhow::ensure!(options.enumerates(ContainerKind::Seq));
        anyhow::ensure!(options.keeps_empty(ContainerKind::Map) && options.keeps_empty(ContainerKind::Seq));
        Ok(())
    }

    #[test]
    fn test_empty_config_is_default() -> anyhow::Result<()> {
        let options = FlattenOptions::try_from(serde_json::from_str::<FlattenConfig>("{}")?)?;
        anyhow::ensure!(matches!(options.reducer, Reducer::Tuple));
        anyhow::ensure!(options.max_flatten_depth.is_none());
        let options = UnflattenOptions::try_from(serde_json::from_str::<UnflattenConfig>(r#"{"inverse": true}"#)?)?;
        anyhow::ensure!(matches!(options.splitter, Splitter::Tuple) && options.inverse);
        Ok(())
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let err = FlattenOptions::try_from(FlattenConfig {
            reducer: Some("camel".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = UnflattenOptions::try_from(UnflattenConfig {
            splitter: Some("camel".into()),
            inverse: false,
        })
        .unwrap_err();
        assert!(err.is_invalid_argument());

        assert!(serde_json::from_str::<FlattenConfig>(r#"{"enumerate_types": ["list"]}"#).is_err());
        assert!(serde_json::from_str::<FlattenConfig>(r#"{"separator": "."}"#).is_err());
    }

    #[test]
    fn test_flattenable_types() {
        let options = FlattenOptions::default();
        assert_eq!(options.flattenable_types(), vec![ContainerKind::Map]);
        let options = options.with_enumerate_types([ContainerKind::Seq]);
        assert_eq!(options.flattenable_types(), vec![ContainerKind::Map, ContainerKind::Seq]);
    }
}
