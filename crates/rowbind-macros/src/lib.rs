//! Procedural front end for the `csv_parse!` declaration block.
//!
//! The macro accepts struct, enum, and impl declarations, hands them to
//! `rowbind-core` for schema resolution and synthesis, and re-emits the
//! declarations with every validated parsing fn filled in. All analysis
//! lives in `rowbind-core`; this crate only parses the block and shuttles
//! tokens.

mod attr;
mod expand;
mod parse;

use proc_macro::TokenStream;
use syn::parse_macro_input;

#[proc_macro]
pub fn csv_parse(input: TokenStream) -> TokenStream {
    let block = parse_macro_input!(input as parse::CsvInput);
    expand::expand(block).into()
}
