use crate::{diagnostic::Diagnostic, model::BindingMeta};
use proc_macro2::Span;
use syn::{Ident, parse_quote};

///
/// FieldDecl
///
/// One declared member of a record. `attrs` are the passthrough attributes
/// with every `#[csv(...)]` already removed; `meta` is `Some` when a binding
/// attribute was present.
///

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub ident: Ident,
    pub vis: syn::Visibility,
    pub attrs: Vec<syn::Attribute>,
    pub ty: syn::Type,
    pub meta: Option<BindingMeta>,
}

///
/// RecordDecl
///

#[derive(Clone, Debug)]
pub struct RecordDecl {
    pub ident: Ident,
    pub vis: syn::Visibility,
    pub attrs: Vec<syn::Attribute>,
    pub generics: syn::Generics,
    /// Ancestor record in the same invocation, if any.
    pub extends: Option<Ident>,
    /// Treat every member as implicitly bound.
    pub include_all: bool,
    pub fields: Vec<FieldDecl>,
}

///
/// EnumDecl
///
/// A symbol type declared in the invocation. Only unit variants can be
/// parsed by name; `has_non_unit` makes the record unclassifiable as a
/// symbol source.
///

#[derive(Clone, Debug)]
pub struct EnumDecl {
    pub ident: Ident,
    pub variants: Vec<Ident>,
    pub has_non_unit: bool,
}

///
/// WellKnownTypes
///
/// The boundary abstractions every resolution pass relies on. Construction
/// goes through a per-name lookup so a deficient type universe is reported
/// once, aggregating every missing name.
///

#[derive(Clone, Debug)]
pub struct WellKnownTypes {
    pub reader: syn::Path,
    pub header: syn::Path,
    pub row: syn::Path,
    pub cancel_token: syn::Path,
    pub iterator_trait: syn::Path,
    pub stream_trait: syn::Path,
    pub result: syn::Path,
}

impl WellKnownTypes {
    pub const REQUIRED: [&'static str; 7] = [
        "Reader",
        "Header",
        "Row",
        "CancelToken",
        "Iterator",
        "Stream",
        "Result",
    ];

    /// Resolve every required name, or fail with a single aggregated
    /// diagnostic naming each missing one.
    pub fn resolve<F>(span: Span, lookup: F) -> Result<Self, Diagnostic>
    where
        F: Fn(&str) -> Option<syn::Path>,
    {
        let mut found = Vec::with_capacity(Self::REQUIRED.len());
        let mut missing = Vec::new();
        for name in Self::REQUIRED {
            match lookup(name) {
                Some(path) => found.push(path),
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(Diagnostic::essential_types_not_found(span, &missing));
        }

        let mut found = found.into_iter();
        let mut next = || found.next().unwrap_or_else(|| parse_quote!(__unreachable));
        Ok(Self {
            reader: next(),
            header: next(),
            row: next(),
            cancel_token: next(),
            iterator_trait: next(),
            stream_trait: next(),
            result: next(),
        })
    }

    /// The standard table backed by the `rowbind` runtime surface.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            reader: parse_quote!(::rowbind::Reader),
            header: parse_quote!(::rowbind::Header),
            row: parse_quote!(::rowbind::Row),
            cancel_token: parse_quote!(::rowbind::CancelToken),
            iterator_trait: parse_quote!(::core::iter::Iterator),
            stream_trait: parse_quote!(::rowbind::Stream),
            result: parse_quote!(::rowbind::Result),
        }
    }

    /// Final path segment of a well-known path, used for nominal matching
    /// of declared parameter and return types.
    #[must_use]
    pub fn name_of(path: &syn::Path) -> Option<&Ident> {
        path.segments.last().map(|segment| &segment.ident)
    }
}

///
/// TypeUniverse
///
/// Every record and enum declared in one invocation, in declaration order,
/// plus the well-known boundary types.
///

#[derive(Clone, Debug)]
pub struct TypeUniverse {
    records: Vec<RecordDecl>,
    enums: Vec<EnumDecl>,
    pub well_known: WellKnownTypes,
}

impl TypeUniverse {
    #[must_use]
    pub const fn new(well_known: WellKnownTypes) -> Self {
        Self {
            records: Vec::new(),
            enums: Vec::new(),
            well_known,
        }
    }

    pub fn add_record(&mut self, record: RecordDecl) {
        self.records.push(record);
    }

    pub fn add_enum(&mut self, decl: EnumDecl) {
        self.enums.push(decl);
    }

    #[must_use]
    pub fn record(&self, name: &str) -> Option<&RecordDecl> {
        self.records.iter().find(|r| r.ident == name)
    }

    #[must_use]
    pub fn enum_decl(&self, name: &str) -> Option<&EnumDecl> {
        self.enums.iter().find(|e| e.ident == name)
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordDecl> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reports_every_missing_name_once() {
        let result = WellKnownTypes::resolve(Span::call_site(), |name| match name {
            "Reader" | "Header" | "Row" | "Result" => Some(parse_quote!(::rowbind::Reader)),
            _ => None,
        });
        let diag = result.expect_err("universe is deficient");
        assert!(diag.message().contains("CancelToken, Iterator, Stream"));
    }

    #[test]
    fn resolve_succeeds_with_a_complete_table() {
        let result = WellKnownTypes::resolve(Span::call_site(), |name| {
            let ident = Ident::new(name, Span::call_site());
            Some(parse_quote!(::rowbind::#ident))
        });
        let well_known = result.expect("complete table");
        assert_eq!(
            WellKnownTypes::name_of(&well_known.cancel_token).map(ToString::to_string),
            Some("CancelToken".to_string())
        );
    }
}
