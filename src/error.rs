use {
    crate::{ContainerKind, FieldPath, FlatKey},
    serde_json::Value,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("argument type {found} is not in the flattenable types {flattenable:?}")]
    NotFlattenable {
        found: &'static str,
        flattenable: Vec<ContainerKind>,
    },
    #[error("max_flatten_depth should not be less than 1")]
    InvalidDepth,
    #[error("unknown reducer '{0}', expected one of: tuple, path, dot, underscore")]
    UnknownReducer(String),
    #[error("unknown splitter '{0}', expected one of: tuple, path, dot, underscore")]
    UnknownSplitter(String),
    #[error("unknown container kind '{0}', expected one of: map, seq")]
    UnknownContainerKind(String),
    #[error("delimiter must not be empty")]
    EmptyDelimiter,
    #[error("value cannot be used as a flat key: {value}")]
    UnhashableValue { value: Value },
    #[error("{splitter} splitter cannot split key {key}")]
    Unsplittable { splitter: &'static str, key: FlatKey },
    #[error("key {0} splits into no components")]
    EmptyPath(FlatKey),
    #[error("key {0} is not a string and cannot become a json object key")]
    NonStringKey(FlatKey),
    #[error("duplicated key '{0}'")]
    DuplicatedKey(FlatKey),
    #[error("duplicated key '{path}' while unflattening")]
    DuplicatedPath { path: FieldPath<'static> },
    #[error("serializing into a nested value")]
    Serializing(#[source] serde_json::Error),
    #[error("deserializing from a nested value")]
    Deserializing(#[source] serde_json::Error),
}

/// Coarse classification of [`Error`], for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input has the wrong shape or an option is out of range.
    InvalidArgument,
    /// Two entries resolved to the same key.
    DuplicateKey,
    /// Converting between a typed value and a nested [`Value`] failed.
    Serde,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFlattenable { .. }
            | Error::InvalidDepth
            | Error::UnknownReducer(_)
            | Error::UnknownSplitter(_)
            | Error::UnknownContainerKind(_)
            | Error::EmptyDelimiter
            | Error::UnhashableValue { .. }
            | Error::Unsplittable { .. }
            | Error::EmptyPath(_)
            | Error::NonStringKey(_) => ErrorKind::InvalidArgument,
            Error::DuplicatedKey(_) | Error::DuplicatedPath { .. } => ErrorKind::DuplicateKey,
            Error::Serializing(_) | Error::Deserializing(_) => ErrorKind::Serde,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_duplicate_key(&self) -> bool {
        self.kind() == ErrorKind::DuplicateKey
    }
}

pub type Result<T> = std::result::Result<T, self::Error>;
