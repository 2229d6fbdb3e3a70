use crate::{
    model::{
        GenerationTarget, ImplDecl, PropertyBinding, RecordDecl, RowSourceKind, SequenceShape,
        TypeUniverse, ValueKind,
    },
    schema,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

// Token synthesis for validated targets. Everything here is deterministic:
// the same target always renders the same tokens, and every emitted binding
// is `__`-prefixed so it cannot collide with user parameter names.

fn futures_path() -> TokenStream {
    quote!(::rowbind::__reexports::futures)
}

fn index_var(property: &PropertyBinding) -> Ident {
    format_ident!("__i_{}", property.name)
}

fn format_var(property: &PropertyBinding) -> Ident {
    format_ident!("__fmt_{}", property.name)
}

/// Re-emit a record declaration with its ancestor chain flattened into one
/// plain struct. Field order is declaration order, most-derived level first;
/// attributes on the declaration and on each surviving field pass through.
#[must_use]
pub fn emit_record(universe: &TypeUniverse, record: &RecordDecl) -> TokenStream {
    let fields = schema::flattened_fields(universe, record)
        .into_iter()
        .map(|(_, field)| {
            let attrs = &field.attrs;
            let vis = &field.vis;
            let ident = &field.ident;
            let ty = &field.ty;
            quote! { #(#attrs)* #vis #ident: #ty, }
        });

    let attrs = &record.attrs;
    let vis = &record.vis;
    let ident = &record.ident;
    let generics = &record.generics;
    let where_clause = &record.generics.where_clause;
    quote! {
        #(#attrs)* #vis struct #ident #generics #where_clause {
            #(#fields)*
        }
    }
}

/// Wrap the generated fns of one declared impl block back into a single
/// emitted impl.
#[must_use]
pub fn emit_impl(decl: &ImplDecl, fns: &[TokenStream]) -> TokenStream {
    let (impl_generics, _, where_clause) = decl.generics.split_for_impl();
    let self_ty = &decl.self_ty;
    quote! {
        impl #impl_generics #self_ty #where_clause {
            #(#fns)*
        }
    }
}

/// Emit one generated fn: the declared signature verbatim, with the parsing
/// procedure as its body.
#[must_use]
pub fn emit_target(universe: &TypeUniverse, target: &GenerationTarget) -> TokenStream {
    let attrs = &target.attrs;
    let vis = &target.vis;
    let sig = &target.sig;
    let body = emit_body(universe, target);
    quote! {
        #(#attrs)* #vis #sig {
            #body
        }
    }
}

fn emit_body(universe: &TypeUniverse, target: &GenerationTarget) -> TokenStream {
    match (target.row_source.kind, target.shape) {
        (RowSourceKind::Reader, SequenceShape::SuspensionBased) => {
            let futures = futures_path();
            let pipeline = sync_pipeline(universe, target);
            quote!(#futures::stream::iter(#pipeline))
        }
        (RowSourceKind::RowStream, _) => stream_pipeline(universe, target),
        _ => sync_pipeline(universe, target),
    }
}

/// The synchronous pipeline: resolve column indices once, then pull rows
/// through `from_fn`. A resolution failure or a cancellation is delivered as
/// one `Err` item and the iterator is fused afterwards; a row that fails to
/// convert is delivered as `Err` and iteration continues.
fn sync_pipeline(universe: &TypeUniverse, target: &GenerationTarget) -> TokenStream {
    let fmts = format_bindings(&target.properties);
    let resolved = resolution_binding(target);
    let source = &target.row_source.name;

    let rows_binding = match target.row_source.kind {
        RowSourceKind::Reader => quote!(let mut __rows = #source.rows();),
        _ => quote!(let mut __rows = #source;),
    };
    let cancel = target.cancel_param.as_ref().map(|ct| {
        quote! {
            if #ct.is_cancelled() {
                __done = true;
                return ::core::option::Option::Some(::core::result::Result::Err(
                    ::rowbind::Error::Cancelled,
                ));
            }
        }
    });
    let record = record_expr(universe, target);
    let next = match target.row_source.kind {
        RowSourceKind::Reader => quote! {
            match __rows.next() {
                ::core::option::Option::None => {
                    __done = true;
                    ::core::option::Option::None
                }
                ::core::option::Option::Some(::core::result::Result::Err(__e)) => {
                    __done = true;
                    ::core::option::Option::Some(::core::result::Result::Err(__e))
                }
                ::core::option::Option::Some(::core::result::Result::Ok(__row)) => {
                    ::core::option::Option::Some(#record)
                }
            }
        },
        _ => quote! {
            match __rows.next() {
                ::core::option::Option::None => {
                    __done = true;
                    ::core::option::Option::None
                }
                ::core::option::Option::Some(__row) => {
                    ::core::option::Option::Some(#record)
                }
            }
        },
    };

    quote! {
        {
            #fmts
            #resolved
            #rows_binding
            let (__indices, mut __pending) = match __resolved {
                ::core::result::Result::Ok(__ix) => {
                    (::core::option::Option::Some(__ix), ::core::option::Option::None)
                }
                ::core::result::Result::Err(__e) => {
                    (::core::option::Option::None, ::core::option::Option::Some(__e))
                }
            };
            let mut __done = false;
            ::core::iter::from_fn(move || {
                if __done {
                    return ::core::option::Option::None;
                }
                if let ::core::option::Option::Some(__e) = __pending.take() {
                    __done = true;
                    return ::core::option::Option::Some(::core::result::Result::Err(__e));
                }
                let __ix = __indices?;
                #cancel
                #next
            })
        }
    }
}

/// The suspension-based pipeline over a raw row stream: the index state is
/// resolved eagerly, then threaded through `unfold` together with the pinned
/// source and the fused flag.
fn stream_pipeline(universe: &TypeUniverse, target: &GenerationTarget) -> TokenStream {
    let futures = futures_path();
    let fmts = format_bindings(&target.properties);
    let resolved = resolution_binding(target);
    let source = &target.row_source.name;
    let record = record_expr(universe, target);

    let cancel_clone = target
        .cancel_param
        .as_ref()
        .map(|ct| quote!(let __ct = #ct.clone();));
    let cancel_check = target.cancel_param.as_ref().map(|_| {
        quote! {
            if __ct.is_cancelled() {
                return ::core::option::Option::Some((
                    ::core::result::Result::Err(::rowbind::Error::Cancelled),
                    (__rows, __pending, true),
                ));
            }
        }
    });

    quote! {
        {
            #fmts
            #resolved
            let (__indices, __pending) = match __resolved {
                ::core::result::Result::Ok(__ix) => {
                    (::core::option::Option::Some(__ix), ::core::option::Option::None)
                }
                ::core::result::Result::Err(__e) => {
                    (::core::option::Option::None, ::core::option::Option::Some(__e))
                }
            };
            let __rows = ::std::boxed::Box::pin(#source);
            #futures::stream::unfold(
                (__rows, __pending, false),
                move |(mut __rows, mut __pending, __done)| {
                    #cancel_clone
                    async move {
                        if __done {
                            return ::core::option::Option::None;
                        }
                        if let ::core::option::Option::Some(__e) = __pending.take() {
                            return ::core::option::Option::Some((
                                ::core::result::Result::Err(__e),
                                (__rows, __pending, true),
                            ));
                        }
                        let __ix = __indices?;
                        #cancel_check
                        match #futures::StreamExt::next(&mut __rows).await {
                            ::core::option::Option::None => ::core::option::Option::None,
                            ::core::option::Option::Some(__row) => {
                                ::core::option::Option::Some((#record, (__rows, __pending, false)))
                            }
                        }
                    }
                },
            )
        }
    }
}

/// One `format_description!` binding per date/time property, validated at
/// generation time so the macro cannot fail here.
fn format_bindings(properties: &[PropertyBinding]) -> TokenStream {
    properties
        .iter()
        .filter_map(|property| {
            let ValueKind::Temporal { format, .. } = &property.kind else {
                return None;
            };
            let var = format_var(property);
            Some(quote! {
                let #var = ::rowbind::time::macros::format_description!(#format);
            })
        })
        .collect()
}

/// `let __resolved = ...;` resolving every column index up front. Required
/// columns resolve to `usize` or fail the whole procedure; optional columns
/// resolve to `Option<usize>`. A declared header parameter takes precedence
/// over the reader's own header.
fn resolution_binding(target: &GenerationTarget) -> TokenStream {
    let tys = target.properties.iter().map(|property| {
        if property.is_required {
            quote!(usize)
        } else {
            quote!(::core::option::Option<usize>)
        }
    });
    let lookups = target.properties.iter().map(|property| {
        let var = index_var(property);
        let name = property.name.to_string();
        let aliases = &property.header_names;
        if property.is_required {
            quote! { let #var = __header.index_of(#name, &[#(#aliases),*])?; }
        } else {
            quote! { let #var = __header.try_index_of(&[#(#aliases),*]); }
        }
    });
    let vars = target.properties.iter().map(index_var);

    let closure = quote! {
        (|| {
            #(#lookups)*
            ::core::result::Result::Ok((#(#vars,)*))
        })()
    };
    match &target.header_param {
        Some(header) => quote! {
            let __resolved: ::rowbind::Result<(#(#tys,)*)> = {
                let __header = #header;
                #closure
            };
        },
        None => {
            let source = &target.row_source.name;
            quote! {
                let __resolved: ::rowbind::Result<(#(#tys,)*)> = match #source.header() {
                    ::core::result::Result::Ok(__header) => {
                        let __header = &__header;
                        #closure
                    }
                    ::core::result::Result::Err(__e) => ::core::result::Result::Err(__e),
                };
            }
        }
    }
}

/// Build one record from `__row` under the resolved indices in `__ix`.
/// Required members are filled in the construction literal; optional members
/// start as `None` and are assigned after construction; members without a
/// binding take their default.
fn record_expr(universe: &TypeUniverse, target: &GenerationTarget) -> TokenStream {
    let item = &target.item;
    let item_ty = &target.item_ty;
    let vars = target.properties.iter().map(index_var);

    let constructed = target.properties.iter().filter(|p| !p.is_mutable_after_construction);
    let inits = constructed.map(|property| {
        let name = &property.name;
        let var = index_var(property);
        let convert = convert_expr(property, &quote!(__row.field(#var)));
        quote!(#name: #convert,)
    });

    let deferred: Vec<&PropertyBinding> = target
        .properties
        .iter()
        .filter(|p| p.is_mutable_after_construction)
        .collect();
    let blanks = deferred.iter().map(|property| {
        let name = &property.name;
        quote!(#name: ::core::option::Option::None,)
    });

    let bound: std::collections::HashSet<String> = target
        .properties
        .iter()
        .map(|p| p.name.to_string())
        .collect();
    let defaults = universe
        .record(&target.item.to_string())
        .map(|record| schema::flattened_fields(universe, record))
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, field)| !bound.contains(&field.ident.to_string()))
        .map(|(_, field)| {
            let name = &field.ident;
            quote!(#name: ::core::default::Default::default(),)
        });

    let assigns = deferred.iter().map(|property| {
        let name = &property.name;
        let var = index_var(property);
        if property.is_required {
            let convert = convert_expr(property, &quote!(__row.field(#var)));
            quote! {
                __record.#name = ::core::option::Option::Some(#convert);
            }
        } else {
            let convert = convert_expr(property, &quote!(__row.field(__i)));
            quote! {
                if let ::core::option::Option::Some(__i) = #var {
                    __record.#name = ::core::option::Option::Some(#convert);
                }
            }
        }
    });

    let binding = if deferred.is_empty() {
        quote!(let __record)
    } else {
        quote!(let mut __record)
    };
    quote! {
        {
            let (#(#vars,)*) = __ix;
            (|| -> ::rowbind::Result<#item_ty> {
                #binding = #item {
                    #(#inits)*
                    #(#blanks)*
                    #(#defaults)*
                };
                #(#assigns)*
                ::core::result::Result::Ok(__record)
            })()
        }
    }
}

/// The conversion from one raw field slice to the property's underlying
/// type. A failed conversion names the property in the produced error.
fn convert_expr(property: &PropertyBinding, src: &TokenStream) -> TokenStream {
    let name = property.name.to_string();
    match &property.kind {
        ValueKind::Text => quote!(#src.to_owned()),
        ValueKind::Parsable => {
            let underlying = &property.underlying_ty;
            quote! {
                <#underlying as ::core::str::FromStr>::from_str(#src)
                    .map_err(|__e| ::rowbind::Error::convert(#name, &__e))?
            }
        }
        ValueKind::Temporal { family, .. } => {
            let path = family.parse_path();
            let var = format_var(property);
            quote! {
                #path::parse(#src, #var)
                    .map_err(|__e| ::rowbind::Error::convert(#name, &__e))?
            }
        }
        ValueKind::Symbol {
            enum_ident,
            variants,
        } => {
            let arms = variants.iter().map(|variant| {
                let text = variant.to_string();
                quote!(#text => #enum_ident::#variant,)
            });
            quote! {
                match #src {
                    #(#arms)*
                    __other => {
                        return ::core::result::Result::Err(
                            ::rowbind::Error::unknown_symbol(#name, __other),
                        );
                    }
                }
            }
        }
    }
}
