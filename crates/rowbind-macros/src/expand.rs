use crate::{
    attr,
    parse::{CsvInput, CsvItem},
};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use rowbind_core::{
    diagnostic::Diagnostics,
    emit,
    model::{EnumDecl, FieldDecl, ImplDecl, RecordDecl, TypeUniverse, WellKnownTypes},
    schema, signature,
};
/// Expand one declaration block. Every record and enum is re-emitted even
/// when resolution fails somewhere, so downstream code that merely names the
/// types still compiles; only the failing fns are withheld, each replaced by
/// its diagnostics.
pub fn expand(input: CsvInput) -> TokenStream {
    let mut diagnostics = Diagnostics::new();
    let mut acc = darling::Error::accumulator();

    let mut universe = TypeUniverse::new(WellKnownTypes::standard());
    let mut enum_tokens = Vec::new();
    let mut impls: Vec<ImplDecl> = Vec::new();

    for item in input.items {
        match item {
            CsvItem::Record(item) => {
                if let Some(record) = lower_record(item, &mut acc) {
                    universe.add_record(record);
                }
            }
            CsvItem::Enum(item) => {
                universe.add_enum(lower_enum(&item));
                enum_tokens.push(item.into_token_stream());
            }
            CsvItem::Impl(block) => impls.push(block.decl),
        }
    }

    schema::verify_extends(&universe, &mut diagnostics);

    let records: Vec<TokenStream> = universe
        .records()
        .map(|record| emit::emit_record(&universe, record))
        .collect();

    let impl_tokens: Vec<TokenStream> = impls
        .iter()
        .map(|decl| {
            let fns: Vec<TokenStream> = decl
                .fns
                .iter()
                .filter_map(|fn_decl| {
                    signature::resolve_target(&universe, &decl.self_ty, fn_decl, &mut diagnostics)
                        .map(|target| emit::emit_target(&universe, &target))
                })
                .collect();
            emit::emit_impl(decl, &fns)
        })
        .collect();

    let attr_errors = acc.finish().err().map(darling::Error::write_errors);
    let compile_errors = diagnostics.to_compile_errors();

    quote! {
        #(#records)*
        #(#enum_tokens)*
        #(#impl_tokens)*
        #attr_errors
        #compile_errors
    }
}

fn lower_record(
    mut item: syn::ItemStruct,
    acc: &mut darling::error::Accumulator,
) -> Option<RecordDecl> {
    let container = acc.handle(attr::record_attr(&item.attrs))?;
    attr::strip_csv(&mut item.attrs);

    let syn::Fields::Named(named) = item.fields else {
        acc.push(
            darling::Error::custom("a record declaration must use named fields")
                .with_span(&item.ident),
        );
        return None;
    };

    let extends = match container.extends {
        Some(path) => match path.segments.last() {
            Some(segment) => Some(segment.ident.clone()),
            None => {
                acc.push(
                    darling::Error::custom("'extends' expects a record type name")
                        .with_span(&path),
                );
                return None;
            }
        },
        None => None,
    };

    let mut fields = Vec::with_capacity(named.named.len());
    for mut field in named.named {
        let meta = acc.handle(attr::field_meta(&field.attrs)).flatten();
        attr::strip_csv(&mut field.attrs);
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        fields.push(FieldDecl {
            ident,
            vis: field.vis,
            attrs: field.attrs,
            ty: field.ty,
            meta,
        });
    }

    Some(RecordDecl {
        ident: item.ident,
        vis: item.vis,
        attrs: item.attrs,
        generics: item.generics,
        extends,
        include_all: container.include_all.is_present(),
        fields,
    })
}

fn lower_enum(item: &syn::ItemEnum) -> EnumDecl {
    EnumDecl {
        ident: item.ident.clone(),
        variants: item.variants.iter().map(|v| v.ident.clone()).collect(),
        has_non_unit: item
            .variants
            .iter()
            .any(|v| !matches!(v.fields, syn::Fields::Unit)),
    }
}
