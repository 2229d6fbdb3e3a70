use crate::{
    diagnostic::Diagnostic,
    helper,
    model::{TemporalFamily, TypeUniverse, ValueKind},
};
use proc_macro2::Span;
use quote::ToTokens;
use syn::Ident;

/// Types assumed to carry the `FromStr` capability without further
/// evidence. The macro front end has no trait-resolution machinery, so the
/// parsable world is this closed set plus generic parameters with an
/// explicit `FromStr` bound.
const PARSABLE_PRIMITIVES: [&str; 20] = [
    "i8",
    "i16",
    "i32",
    "i64",
    "i128",
    "isize",
    "u8",
    "u16",
    "u32",
    "u64",
    "u128",
    "usize",
    "f32",
    "f64",
    "bool",
    "char",
    "IpAddr",
    "Ipv4Addr",
    "Ipv6Addr",
    "SocketAddr",
];

/// Map an underlying (`Option`-stripped) type to exactly one parsing
/// strategy. The decision order is fixed: date/time family, then declared
/// enums, then `String`, then the `FromStr` capability.
pub fn classify(
    universe: &TypeUniverse,
    property: &Ident,
    underlying: &syn::Type,
    format: Option<&(String, Span)>,
    generics: &syn::Generics,
) -> Result<ValueKind, Diagnostic> {
    let type_name = helper::last_path_ident(underlying).map(ToString::to_string);

    if let Some(family) = type_name
        .as_deref()
        .and_then(TemporalFamily::from_type_name)
    {
        return classify_temporal(property, family, format);
    }

    if let Some(name) = type_name.as_deref() {
        if let Some(decl) = universe.enum_decl(name) {
            if decl.has_non_unit {
                return Err(not_parsable(property, underlying));
            }
            return Ok(ValueKind::Symbol {
                enum_ident: decl.ident.clone(),
                variants: decl.variants.clone(),
            });
        }

        if name == "String" {
            return Ok(ValueKind::Text);
        }

        if PARSABLE_PRIMITIVES.contains(&name) || has_parse_bound(generics, name) {
            return Ok(ValueKind::Parsable);
        }
    }

    Err(not_parsable(property, underlying))
}

/// A date/time property can never fall back to an implicit format: the
/// format must be present, non-blank, and compile as a `time` format
/// description.
fn classify_temporal(
    property: &Ident,
    family: TemporalFamily,
    format: Option<&(String, Span)>,
) -> Result<ValueKind, Diagnostic> {
    let Some((format, span)) = format else {
        return Err(Diagnostic::missing_date_format(property.span(), property));
    };
    if format.trim().is_empty() {
        return Err(Diagnostic::missing_date_format(*span, property));
    }
    if let Err(error) = time::format_description::parse(format) {
        return Err(Diagnostic::invalid_date_format(*span, property, &error));
    }

    Ok(ValueKind::Temporal {
        family,
        format: format.clone(),
    })
}

/// A generic type parameter qualifies when at least one of its bounds is
/// `FromStr`; the first satisfying constraint wins.
fn has_parse_bound(generics: &syn::Generics, name: &str) -> bool {
    let inline = generics
        .type_params()
        .filter(|param| param.ident == name)
        .flat_map(|param| param.bounds.iter());

    let where_bounds = generics
        .where_clause
        .iter()
        .flat_map(|clause| clause.predicates.iter())
        .filter_map(|predicate| match predicate {
            syn::WherePredicate::Type(pred) => Some(pred),
            _ => None,
        })
        .filter(|pred| helper::last_path_ident(&pred.bounded_ty).is_some_and(|i| i == name))
        .flat_map(|pred| pred.bounds.iter());

    inline.chain(where_bounds).any(|bound| match bound {
        syn::TypeParamBound::Trait(trait_bound) => trait_bound
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "FromStr"),
        _ => false,
    })
}

fn not_parsable(property: &Ident, underlying: &syn::Type) -> Diagnostic {
    Diagnostic::property_not_parsable(
        property.span(),
        property,
        &underlying.to_token_stream().to_string().replace(' ', ""),
    )
}
