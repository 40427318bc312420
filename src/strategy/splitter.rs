use {
    crate::{
        error::{Error, Result},
        flat_map::{FieldPath, FlatKey, Segment},
    },
    std::{
        borrow::Cow,
        fmt,
        path::{Component, Path},
        str::FromStr,
        sync::Arc,
    },
    tap::Pipe,
};

pub type SplitFn = Arc<dyn Fn(&FlatKey) -> Result<FieldPath<'static>> + Send + Sync>;

/// Strategy turning a composite key back into its components.
#[derive(Clone, Default)]
pub enum Splitter {
    #[default]
    Tuple,
    Path,
    Dot,
    Underscore,
    Delimited(Cow<'static, str>),
    Custom(SplitFn),
}

impl fmt::Debug for Splitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Splitter::Tuple => f.write_str("Tuple"),
            Splitter::Path => f.write_str("Path"),
            Splitter::Dot => f.write_str("Dot"),
            Splitter::Underscore => f.write_str("Underscore"),
            Splitter::Delimited(delimiter) => f.debug_tuple("Delimited").field(delimiter).finish(),
            Splitter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for Splitter {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "tuple" => Ok(Splitter::Tuple),
            "path" => Ok(Splitter::Path),
            "dot" => Ok(Splitter::Dot),
            "underscore" => Ok(Splitter::Underscore),
            other => Err(Error::UnknownSplitter(other.to_string())),
        }
    }
}

impl Splitter {
    pub fn custom(split: impl Fn(&FlatKey) -> Result<FieldPath<'static>> + Send + Sync + 'static) -> Self {
        Splitter::Custom(Arc::new(split))
    }

    pub fn split(&self, key: &FlatKey) -> Result<FieldPath<'static>> {
        match self {
            Splitter::Tuple => tuple_splitter(key),
            Splitter::Path => path_splitter(key),
            Splitter::Dot => dot_splitter(key),
            Splitter::Underscore => underscore_splitter(key),
            Splitter::Delimited(delimiter) => split_on(delimiter, key),
            Splitter::Custom(split) => split(key),
        }
    }
}

pub fn tuple_splitter(key: &FlatKey) -> Result<FieldPath<'static>> {
    match key {
        FlatKey::Path(path) => Ok(path.clone()),
        other @ (FlatKey::Joined(_) | FlatKey::Scalar(_)) => {
            Ok([Segment::field(other.to_string())].into_iter().collect())
        }
    }
}

pub fn path_splitter(key: &FlatKey) -> Result<FieldPath<'static>> {
    joined(key, "path").map(|joined| {
        Path::new(joined)
            .components()
            .filter_map(|component| match component {
                Component::CurDir => None,
                other => other
                    .as_os_str()
                    .to_string_lossy()
                    .into_owned()
                    .pipe(Segment::field)
                    .pipe(Some),
            })
            .collect()
    })
}

pub fn dot_splitter(key: &FlatKey) -> Result<FieldPath<'static>> {
    split_on(".", key)
}

pub fn underscore_splitter(key: &FlatKey) -> Result<FieldPath<'static>> {
    split_on("_", key)
}

/// Splitter matching [`make_reducer`](crate::make_reducer) with the same delimiter.
pub fn make_splitter(delimiter: impl Into<Cow<'static, str>>) -> Result<Splitter> {
    match delimiter.into() {
        delimiter if delimiter.is_empty() => Err(Error::EmptyDelimiter),
        delimiter => Ok(Splitter::Delimited(delimiter)),
    }
}

fn split_on(delimiter: &str, key: &FlatKey) -> Result<FieldPath<'static>> {
    if delimiter.is_empty() {
        return Err(Error::EmptyDelimiter);
    }
    joined(key, "delimiter").map(|joined| {
        joined
            .split(delimiter)
            .map(|part| Segment::field(part.to_string()))
            .collect()
    })
}

fn joined<'k>(key: &'k FlatKey, splitter: &'static str) -> Result<&'k str> {
    key.as_joined().ok_or_else(|| Error::Unsplittable {
        splitter,
        key: key.clone(),
    })
}
