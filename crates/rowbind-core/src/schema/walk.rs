use crate::{
    diagnostic::{Diagnostic, Diagnostics},
    helper,
    model::{BindingMeta, FieldDecl, PropertyBinding, RecordDecl, TypeUniverse},
    schema::classify,
};
use std::collections::HashSet;

/// Validate every `extends` link once per invocation: each must name a
/// record declared in the universe, and no chain may be cyclic. Later
/// passes treat a broken link as the end of the chain, so nothing is
/// reported twice.
pub fn verify_extends(universe: &TypeUniverse, diagnostics: &mut Diagnostics) {
    for record in universe.records() {
        let Some(base) = &record.extends else {
            continue;
        };
        if universe.record(&base.to_string()).is_none() {
            diagnostics.push(Diagnostic::unknown_base_type(
                base.span(),
                &record.ident,
                base,
            ));
            continue;
        }

        let mut visited = HashSet::from([record.ident.to_string()]);
        let mut current = universe.record(&base.to_string());
        while let Some(level) = current {
            if !visited.insert(level.ident.to_string()) {
                diagnostics.push(Diagnostic::cyclic_base_type(base.span(), &record.ident));
                break;
            }
            current = level
                .extends
                .as_ref()
                .and_then(|next| universe.record(&next.to_string()));
        }
    }
}

/// The record's ancestor chain, most-derived first. Stops silently at an
/// unknown base or a cycle; `verify_extends` owns that diagnostic.
#[must_use]
pub fn ancestor_levels<'u>(universe: &'u TypeUniverse, record: &'u RecordDecl) -> Vec<&'u RecordDecl> {
    let mut levels = vec![record];
    let mut visited = HashSet::from([record.ident.to_string()]);
    let mut current = record;
    while let Some(base) = &current.extends {
        let Some(level) = universe.record(&base.to_string()) else {
            break;
        };
        if !visited.insert(level.ident.to_string()) {
            break;
        }
        levels.push(level);
        current = level;
    }
    levels
}

/// Shadow-resolved member list across the whole chain: declaration order
/// within a level, most-derived level first. A same-named ancestor member is
/// dropped silently whether or not the derived one is bindable.
#[must_use]
pub fn flattened_fields<'u>(
    universe: &'u TypeUniverse,
    record: &'u RecordDecl,
) -> Vec<(&'u RecordDecl, &'u FieldDecl)> {
    let mut captured = HashSet::new();
    let mut fields = Vec::new();
    for level in ancestor_levels(universe, record) {
        for field in &level.fields {
            if captured.insert(field.ident.to_string()) {
                fields.push((level, field));
            }
        }
    }
    fields
}

/// Resolve the ordered property-binding list for one record.
///
/// Tracks "a binding candidate was seen" separately from "a candidate
/// survived classification": only the former being false produces
/// `NoPropertiesFound`; when every candidate was rejected, each rejection
/// already carries its own diagnostic.
pub fn resolve_properties(
    universe: &TypeUniverse,
    record: &RecordDecl,
    diagnostics: &mut Diagnostics,
) -> Vec<PropertyBinding> {
    let implicit = BindingMeta::new(record.ident.span());
    let mut seen_candidate = false;
    let mut properties = Vec::new();

    for (level, field) in flattened_fields(universe, record) {
        // Explicit metadata always wins over include_all's implicit default.
        let meta = match (&field.meta, level.include_all) {
            (Some(meta), _) => meta,
            (None, true) => &implicit,
            (None, false) => continue,
        };
        seen_candidate = true;

        let Some(header_names) = resolve_header_names(field, meta, diagnostics) else {
            continue;
        };

        let declared_ty = field.ty.clone();
        let option_inner = helper::option_inner(&declared_ty).cloned();
        let is_optional = option_inner.is_some();
        let underlying_ty = option_inner.unwrap_or_else(|| declared_ty.clone());

        match classify(
            universe,
            &field.ident,
            &underlying_ty,
            meta.format.as_ref(),
            &level.generics,
        ) {
            Ok(kind) => properties.push(PropertyBinding {
                name: field.ident.clone(),
                declared_ty,
                underlying_ty,
                header_names,
                kind,
                is_required: !is_optional || meta.required,
                is_mutable_after_construction: is_optional,
            }),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    if !seen_candidate {
        diagnostics.push(Diagnostic::no_properties_found(
            record.ident.span(),
            &record.ident,
        ));
    }
    properties
}

/// Explicit alias list if provided, else the singleton member name. An
/// explicitly empty list and a blank alias are distinct hard errors; either
/// drops the candidate.
fn resolve_header_names(
    field: &FieldDecl,
    meta: &BindingMeta,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<String>> {
    let Some(headers) = &meta.headers else {
        return Some(vec![field.ident.to_string()]);
    };
    if headers.is_empty() {
        diagnostics.push(Diagnostic::header_names_empty(meta.span, &field.ident));
        return None;
    }
    for header in headers {
        if header.value.trim().is_empty() {
            diagnostics.push(Diagnostic::invalid_header_name(header.span, &field.ident));
            return None;
        }
    }
    Some(headers.iter().map(|header| header.value.clone()).collect())
}
