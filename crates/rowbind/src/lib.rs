//! ## Crate layout
//! - `cancel`: cooperative cancellation token checked between rows.
//! - `error`: shared error type for header resolution and row conversion.
//! - `reader`: the delimited-text boundary: `Reader`, `Header`, `Row`.
//!
//! The `csv_parse!` macro declares record types with `#[csv(...)]` column
//! bindings and bodyless parsing fns; expansion fills each fn with a
//! procedure that resolves column indices against a header once, then
//! converts rows into records.

pub mod cancel;
pub mod error;
pub mod reader;

pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use reader::{Header, Reader, Row, Rows};
pub use rowbind_macros::csv_parse;

// Generated code spells date/time and stream types through these paths so
// callers never need the underlying crates in their own dependency tables.
pub use futures::Stream;
pub use time;

/// re-exports
///
/// macros can use these, stops the user having to specify all the
/// dependencies in the Cargo.toml file manually
pub mod __reexports {
    pub use futures;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{CancelToken, Error, Header, Reader, Result, Row, Stream, csv_parse};
}
