//! Key-joining ([`Reducer`]) and key-splitting ([`Splitter`]) strategies.
//!
//! Each built-in reducer has a splitter that undoes it: `Tuple`/`Tuple`,
//! `Path`/`Path`, `Dot`/`Dot`, `Underscore`/`Underscore`, and
//! [`make_reducer`]/[`make_splitter`] with the same delimiter.

pub mod reducer;
pub mod splitter;

pub use {
    reducer::{
        ReduceFn, ReduceWithParentFn, Reducer, dot_reducer, make_reducer, path_reducer, tuple_reducer,
        underscore_reducer,
    },
    splitter::{SplitFn, Splitter, dot_splitter, make_splitter, path_splitter, tuple_splitter, underscore_splitter},
};
