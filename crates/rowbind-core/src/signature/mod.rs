use crate::{
    diagnostic::{Diagnostic, Diagnostics},
    helper,
    model::{
        FnDecl, GenerationTarget, RowSourceKind, RowSourceParam, SequenceShape, TypeUniverse,
        WellKnownTypes,
    },
    schema,
};
use syn::{Ident, spanned::Spanned};

/// What one declared parameter turned out to be.
enum ParamRole {
    Reader,
    Header,
    Cancel,
    RowIterator,
    RowStream,
}

/// Resolve one declared fn into a generation target, or report why it cannot
/// be one. Every violation found is pushed; a fn with any violation yields no
/// target, and the remaining fns of the invocation are unaffected.
pub fn resolve_target(
    universe: &TypeUniverse,
    self_ty: &syn::Type,
    decl: &FnDecl,
    diagnostics: &mut Diagnostics,
) -> Option<GenerationTarget> {
    let before = diagnostics.len();
    let sig = &decl.sig;

    if decl.body.is_some() {
        diagnostics.push(Diagnostic::method_has_body(sig.ident.span(), &sig.ident));
    }

    let shape_and_item = resolve_return(universe, sig, diagnostics);

    let mut row_source: Option<RowSourceParam> = None;
    let mut header_param: Option<Ident> = None;
    let mut cancel_param: Option<Ident> = None;

    for input in &sig.inputs {
        let syn::FnArg::Typed(typed) = input else {
            diagnostics.push(Diagnostic::unexpected_parameter_type(input.span()));
            continue;
        };
        let syn::Pat::Ident(pat) = typed.pat.as_ref() else {
            diagnostics.push(Diagnostic::unexpected_parameter_type(typed.pat.span()));
            continue;
        };
        let Some(role) = classify_param(&universe.well_known, &typed.ty) else {
            diagnostics.push(Diagnostic::unexpected_parameter_type(typed.ty.span()));
            continue;
        };
        let name = pat.ident.clone();
        let span = typed.span();

        match role {
            ParamRole::Reader | ParamRole::RowIterator | ParamRole::RowStream => {
                if row_source.is_some() {
                    diagnostics.push(Diagnostic::duplicate_reader_parameter(span));
                    continue;
                }
                let kind = match role {
                    ParamRole::Reader => RowSourceKind::Reader,
                    ParamRole::RowIterator => RowSourceKind::RowIterator,
                    _ => RowSourceKind::RowStream,
                };
                row_source = Some(RowSourceParam { name, kind });
            }
            ParamRole::Header => {
                if header_param.is_some() {
                    diagnostics.push(Diagnostic::duplicate_header_parameter(span));
                    continue;
                }
                header_param = Some(name);
            }
            ParamRole::Cancel => {
                if cancel_param.is_some() {
                    diagnostics.push(Diagnostic::duplicate_cancellation_token_parameter(span));
                    continue;
                }
                cancel_param = Some(name);
            }
        }
    }

    match &row_source {
        None => diagnostics.push(Diagnostic::missing_reader_parameter(sig.ident.span())),
        Some(source) => {
            // Raw row sequences carry no header of their own.
            if source.kind != RowSourceKind::Reader && header_param.is_none() {
                diagnostics.push(Diagnostic::missing_header_parameter(sig.ident.span()));
            }
            if let Some((shape, ..)) = &shape_and_item {
                match (source.kind, shape) {
                    (RowSourceKind::RowIterator, SequenceShape::SuspensionBased) => diagnostics
                        .push(Diagnostic::unexpected_iterator_parameter(sig.ident.span())),
                    (RowSourceKind::RowStream, SequenceShape::Finite) => diagnostics
                        .push(Diagnostic::unexpected_stream_parameter(sig.ident.span())),
                    _ => {}
                }
            }
        }
    }

    let (shape, item, item_ty) = shape_and_item?;
    let item_record = universe.record(&item.to_string())?;
    let properties = schema::resolve_properties(universe, item_record, diagnostics);

    if diagnostics.len() > before {
        return None;
    }
    Some(GenerationTarget {
        owner: owner_ident(self_ty)?,
        item,
        item_ty,
        shape,
        attrs: decl.attrs.clone(),
        vis: decl.vis.clone(),
        sig: sig.clone(),
        row_source: row_source?,
        header_param,
        cancel_param,
        properties,
    })
}

/// Decompose the declared return type into the sequence shape and the
/// produced record's name. The accepted forms are exactly
/// `impl Iterator<Item = Result<T>>` and `impl Stream<Item = Result<T>>`.
fn resolve_return(
    universe: &TypeUniverse,
    sig: &syn::Signature,
    diagnostics: &mut Diagnostics,
) -> Option<(SequenceShape, Ident, syn::Type)> {
    let well_known = &universe.well_known;
    let syn::ReturnType::Type(_, ty) = &sig.output else {
        diagnostics.push(Diagnostic::invalid_return_type(sig.ident.span()));
        return None;
    };

    let invalid = |diagnostics: &mut Diagnostics| {
        diagnostics.push(Diagnostic::invalid_return_type(ty.span()));
        None
    };

    let Some((trait_ident, item)) = helper::impl_trait_parts(ty) else {
        return invalid(diagnostics);
    };
    let shape = if matches_name(&well_known.iterator_trait, trait_ident) {
        SequenceShape::Finite
    } else if matches_name(&well_known.stream_trait, trait_ident) {
        SequenceShape::SuspensionBased
    } else {
        return invalid(diagnostics);
    };

    let result_name = WellKnownTypes::name_of(&well_known.result)?;
    let Some(inner) = item.and_then(|item| helper::result_inner(item, result_name)) else {
        return invalid(diagnostics);
    };
    let Some(item_ident) = helper::last_path_ident(inner) else {
        return invalid(diagnostics);
    };
    if universe.record(&item_ident.to_string()).is_none() {
        diagnostics.push(Diagnostic::unknown_item_type(inner.span(), item_ident));
        return None;
    }

    Some((shape, item_ident.clone(), inner.clone()))
}

fn classify_param(well_known: &WellKnownTypes, ty: &syn::Type) -> Option<ParamRole> {
    match ty {
        syn::Type::Reference(reference) => {
            let Some(ident) = helper::last_path_ident(&reference.elem) else {
                return None;
            };
            if reference.mutability.is_some()
                && matches_name(&well_known.reader, ident)
            {
                return Some(ParamRole::Reader);
            }
            if reference.mutability.is_none()
                && matches_name(&well_known.header, ident)
            {
                return Some(ParamRole::Header);
            }
            None
        }
        syn::Type::ImplTrait(_) => {
            let (trait_ident, item) = helper::impl_trait_parts(ty)?;
            let item_ident = item.and_then(helper::last_path_ident)?;
            if !matches_name(&well_known.row, item_ident) {
                return None;
            }
            if matches_name(&well_known.iterator_trait, trait_ident) {
                Some(ParamRole::RowIterator)
            } else if matches_name(&well_known.stream_trait, trait_ident) {
                Some(ParamRole::RowStream)
            } else {
                None
            }
        }
        syn::Type::Path(_) => {
            let ident = helper::last_path_ident(ty)?;
            matches_name(&well_known.cancel_token, ident).then_some(ParamRole::Cancel)
        }
        _ => None,
    }
}

/// Nominal match of a declared ident against a well-known path's final
/// segment.
fn matches_name(path: &syn::Path, ident: &Ident) -> bool {
    WellKnownTypes::name_of(path).is_some_and(|name| ident == name)
}

fn owner_ident(self_ty: &syn::Type) -> Option<Ident> {
    helper::last_path_ident(self_ty).cloned()
}
