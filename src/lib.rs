//! A dynamically typed list value for an embedded scripting runtime.
//!
//! Lists are reached from scripts through case-insensitive suffixes (`ADD`, `JOIN`,
//! `SUBLIST`...), indexed with negative-index addressing, frozen read-only on demand, and saved
//! to and restored from language-agnostic Dumps.
pub mod argstack;
pub mod containers;
pub mod dump;
pub mod error;
pub mod index;
pub mod list;
pub mod listsuffix;
pub mod repl;
pub mod suffix;
pub mod value;

pub use crate::dump::{Dump, DumpContext, Primitive};
pub use crate::error::{ErrorKind, RuntimeError};
pub use crate::list::{List, ListValue};
pub use crate::value::{ScriptValue, Value};
