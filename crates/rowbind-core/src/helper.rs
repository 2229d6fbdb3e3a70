use syn::{GenericArgument, Ident, PathArguments, Type};

// Type inspection helpers shared by the classifier and the signature
// resolver. Matching is nominal on the final path segment; the macro front
// end has no semantic model to consult.

/// Peel any number of reference layers.
#[must_use]
pub fn strip_refs(mut ty: &Type) -> &Type {
    while let Type::Reference(reference) = ty {
        ty = &reference.elem;
    }
    ty
}

/// Final path segment ident of a plain path type.
#[must_use]
pub fn last_path_ident(ty: &Type) -> Option<&Ident> {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            path.path.segments.last().map(|segment| &segment.ident)
        }
        _ => None,
    }
}

/// Angle-bracketed type arguments of the final path segment.
fn last_segment_args(ty: &Type) -> Vec<&Type> {
    let Type::Path(path) = ty else {
        return Vec::new();
    };
    let Some(segment) = path.path.segments.last() else {
        return Vec::new();
    };
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return Vec::new();
    };
    args.args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        })
        .collect()
}

/// `Option<T>` -> `T`.
#[must_use]
pub fn option_inner(ty: &Type) -> Option<&Type> {
    if last_path_ident(ty).is_none_or(|ident| ident != "Option") {
        return None;
    }
    match last_segment_args(ty).as_slice() {
        [inner] => Some(inner),
        _ => None,
    }
}

/// `Result<T>` or `Result<T, E>` -> `T`, matched against the well-known
/// result name.
#[must_use]
pub fn result_inner<'t>(ty: &'t Type, result_name: &Ident) -> Option<&'t Type> {
    if last_path_ident(ty).is_none_or(|ident| ident != result_name) {
        return None;
    }
    match last_segment_args(ty).as_slice() {
        [inner] | [inner, _] => Some(inner),
        _ => None,
    }
}

/// Decompose `impl Trait<Item = X>`: the trait's final segment ident and
/// the `Item` binding, if present.
#[must_use]
pub fn impl_trait_parts(ty: &Type) -> Option<(&Ident, Option<&Type>)> {
    let Type::ImplTrait(impl_trait) = ty else {
        return None;
    };
    for bound in &impl_trait.bounds {
        let syn::TypeParamBound::Trait(trait_bound) = bound else {
            continue;
        };
        let Some(segment) = trait_bound.path.segments.last() else {
            continue;
        };
        let mut item = None;
        if let PathArguments::AngleBracketed(args) = &segment.arguments {
            for arg in &args.args {
                if let GenericArgument::AssocType(assoc) = arg
                    && assoc.ident == "Item"
                {
                    item = Some(&assoc.ty);
                }
            }
        }
        return Some((&segment.ident, item));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::format_ident;
    use syn::parse_quote;

    #[test]
    fn strips_nested_references() {
        let ty: Type = parse_quote!(&mut &Reader);
        assert_eq!(
            last_path_ident(strip_refs(&ty)).map(ToString::to_string),
            Some("Reader".to_string())
        );
    }

    #[test]
    fn option_unwraps_one_layer() {
        let ty: Type = parse_quote!(Option<time::Date>);
        let inner = option_inner(&ty).expect("inner type");
        assert_eq!(
            last_path_ident(inner).map(ToString::to_string),
            Some("Date".to_string())
        );

        let plain: Type = parse_quote!(u32);
        assert!(option_inner(&plain).is_none());
    }

    #[test]
    fn result_accepts_one_or_two_arguments() {
        let name = format_ident!("Result");
        let short: Type = parse_quote!(Result<Person>);
        let long: Type = parse_quote!(Result<Person, rowbind::Error>);
        assert!(result_inner(&short, &name).is_some());
        assert!(result_inner(&long, &name).is_some());
        assert!(result_inner(&parse_quote!(Vec<Person>), &name).is_none());
    }

    #[test]
    fn impl_trait_exposes_trait_and_item() {
        let ty: Type = parse_quote!(impl Iterator<Item = Result<Person>>);
        let (trait_ident, item) = impl_trait_parts(&ty).expect("impl trait");
        assert_eq!(trait_ident.to_string(), "Iterator");
        assert!(item.is_some());
    }
}
