//! `cell-value` provides a compact dynamic value type for storing
//! heterogeneous cell data, together with the two containers built on it:
//! a growable array and a sorted dictionary.
//!
//! # Features
//!
//! - **Ten value kinds**: null, bool, four integer widths, two float widths,
//!   byte string, array, dictionary
//! - **Small-buffer strings**: short byte strings live inline in the value,
//!   longer ones in a single heap block carrying a varint length prefix
//! - **Sorted dictionary**: a red-black tree keyed by byte string, with
//!   optional insertion-order tracking and a pluggable key comparator
//! - **Path lookup**: `root.at_path("config/servers/[2]/port")`
//! - **`no_std` compatible**: works with just `alloc`
//!
//! # Design
//!
//! `Value` is a small tagged union. Scalars are stored directly in the
//! value; strings spill to the heap only when their encoded form outgrows
//! the inline buffer; arrays and dictionaries keep their elements behind a
//! single heap allocation. Dropping a value finalizes it recursively.
//!
//! The subsystem is deliberately single-threaded: no operation blocks, and
//! no internal synchronization exists. Ownership is tree-shaped — a value
//! placed into a container is owned by that container alone.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod codec;

#[cfg(feature = "alloc")]
mod value;
#[cfg(feature = "alloc")]
pub use value::*;

#[cfg(feature = "alloc")]
mod string;
#[cfg(feature = "alloc")]
pub use string::*;

#[cfg(feature = "alloc")]
mod array;
#[cfg(feature = "alloc")]
pub use array::*;

#[cfg(feature = "alloc")]
mod dict;
#[cfg(feature = "alloc")]
pub use dict::*;

#[cfg(feature = "alloc")]
mod path;
