use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

///
/// TemporalFamily
///
/// The recognized date/time value types, all from the `time` crate the
/// runtime re-exports.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TemporalFamily {
    Date,
    Time,
    PrimitiveDateTime,
    OffsetDateTime,
}

impl TemporalFamily {
    /// Match a type's final path segment against the family.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Date" => Some(Self::Date),
            "Time" => Some(Self::Time),
            "PrimitiveDateTime" => Some(Self::PrimitiveDateTime),
            "OffsetDateTime" => Some(Self::OffsetDateTime),
            _ => None,
        }
    }

    /// The canonical path generated code parses with.
    #[must_use]
    pub fn parse_path(self) -> TokenStream {
        match self {
            Self::Date => quote!(::rowbind::time::Date),
            Self::Time => quote!(::rowbind::time::Time),
            Self::PrimitiveDateTime => quote!(::rowbind::time::PrimitiveDateTime),
            Self::OffsetDateTime => quote!(::rowbind::time::OffsetDateTime),
        }
    }
}

///
/// ValueKind
///
/// The parsing strategy for one property. Closed by design: exactly one kind
/// per property, and the format string only exists in the `Temporal` case,
/// so "date kind without format" cannot be represented after validation.
///

#[derive(Clone, Debug)]
pub enum ValueKind {
    /// Direct materialization of the borrowed field slice, no conversion.
    Text,
    /// Parse by variant name against an enum declared in the invocation.
    Symbol {
        enum_ident: Ident,
        variants: Vec<Ident>,
    },
    /// Exact-format parse through the `time` crate.
    Temporal {
        family: TemporalFamily,
        format: String,
    },
    /// `FromStr` conversion.
    Parsable,
}

///
/// PropertyBinding
///
/// One bindable member of a record type after walking and classification.
///

#[derive(Clone, Debug)]
pub struct PropertyBinding {
    pub name: Ident,
    pub declared_ty: syn::Type,
    /// `declared_ty` with the `Option<_>` wrapper stripped, if any.
    pub underlying_ty: syn::Type,
    /// Acceptable column names in declaration order; never empty.
    pub header_names: Vec<String>,
    pub kind: ValueKind,
    pub is_required: bool,
    /// Whether the member may be left out of the construction literal and
    /// assigned afterwards. Here that is exactly the `Option<_>` members.
    pub is_mutable_after_construction: bool,
}
