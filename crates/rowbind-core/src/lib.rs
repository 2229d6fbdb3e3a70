//! ## Crate layout
//! - `diagnostic`: stable-code diagnostics shared by every resolution pass.
//! - `model`: binding metadata, property bindings, generation targets, and
//!   the declared type universe.
//! - `schema`: the ancestor-chain walker and the value-kind classifier.
//! - `signature`: classification of the declared generation-target fns.
//! - `emit`: token synthesis for validated targets and record definitions.
//!
//! The crate is a plain library over `syn`/`quote` values so every pass can
//! be driven directly from tests; the `csv_parse!` front end in
//! `rowbind-macros` is a thin layer on top of it.

pub mod diagnostic;
pub mod emit;
pub mod helper;
pub mod model;
pub mod schema;
pub mod signature;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        diagnostic::{Code, Diagnostic, Diagnostics},
        model::{
            BindingMeta, EnumDecl, FieldDecl, GenerationTarget, HeaderName, ImplDecl,
            PropertyBinding, RecordDecl, RowSourceKind, SequenceShape, TemporalFamily,
            TypeUniverse, ValueKind, WellKnownTypes,
        },
    };
    pub use proc_macro2::{Span, TokenStream};
    pub use quote::{ToTokens, format_ident, quote, quote_spanned};
    pub use syn::Ident;
}
