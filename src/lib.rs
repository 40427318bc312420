//! Reversible flattening of nested [`serde_json::Value`] trees.
//!
//! [`flatten`] turns nested objects (and, on request, arrays) into a single-level
//! [`FlatMap`] whose keys encode the path to each leaf. [`unflatten`] rebuilds the
//! nested structure. Keys are joined by a [`Reducer`] and split back by the matching
//! [`Splitter`].
//!
//! ```
//! use flatten_nested::{FlatMapExt, FlattenOptions, Reducer, flatten};
//! use serde_json::json;
//!
//! let flat = flatten(
//!     &json!({"a": "0", "b": {"a": "1.0", "b": "1.1"}}),
//!     &FlattenOptions::default().with_reducer(Reducer::Dot),
//! )?
//! .into_json_object()?;
//! assert_eq!(serde_json::Value::Object(flat), json!({"a": "0", "b.a": "1.0", "b.b": "1.1"}));
//! # Ok::<(), flatten_nested::Error>(())
//! ```
//!
//! Inputs must be finite trees. There is no guard against very deep nesting other than
//! `max_flatten_depth`.

pub mod error;
pub mod flat_map;
pub mod options;
pub mod strategy;
pub mod typed;

pub use {
    error::{Error, ErrorKind, Result},
    flat_map::{
        ContainerKind, FieldPath, FlatKey, FlatMap, FlatMapExt, ScalarKey, Segment, flat_map_from_json, flatten::flatten,
        unflatten::unflatten,
    },
    options::{FlattenConfig, FlattenOptions, UnflattenConfig, UnflattenOptions},
    strategy::{
        Reducer, Splitter, dot_reducer, dot_splitter, make_reducer, make_splitter, path_reducer, path_splitter,
        tuple_reducer, tuple_splitter, underscore_reducer, underscore_splitter,
    },
    typed::{Flattened, from_flat_map, to_flat_map},
};
