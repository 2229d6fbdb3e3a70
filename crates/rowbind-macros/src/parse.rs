use rowbind_core::model::{FnDecl, ImplDecl};
use syn::{
    Attribute, Token,
    parse::{Parse, ParseStream},
};

///
/// CsvInput
///
/// The whole `csv_parse! { .. }` block: any number of struct, enum, and impl
/// declarations in source order.
///

pub struct CsvInput {
    pub items: Vec<CsvItem>,
}

impl Parse for CsvInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(input.parse()?);
        }
        Ok(Self { items })
    }
}

///
/// CsvItem
///

pub enum CsvItem {
    Record(syn::ItemStruct),
    Enum(syn::ItemEnum),
    Impl(CsvImpl),
}

impl Parse for CsvItem {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        // Peek past attributes and visibility to find the item keyword.
        let ahead = input.fork();
        ahead.call(Attribute::parse_outer)?;
        let _vis: syn::Visibility = ahead.parse()?;

        if ahead.peek(Token![struct]) {
            input.parse().map(Self::Record)
        } else if ahead.peek(Token![enum]) {
            input.parse().map(Self::Enum)
        } else if ahead.peek(Token![impl]) {
            input.parse().map(Self::Impl)
        } else {
            Err(ahead.error("expected a struct, enum, or impl declaration"))
        }
    }
}

///
/// CsvImpl
///
/// An impl block whose fns are declared without bodies. `syn::ItemImpl`
/// rejects bodyless fns, so the block is parsed by hand: the fn items reuse
/// `syn::TraitItemFn`, which keeps the body optional, prefixed with an
/// explicit visibility `ItemImpl` would have carried.
///

pub struct CsvImpl {
    pub decl: ImplDecl,
}

impl Parse for CsvImpl {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        input.parse::<Token![impl]>()?;
        let mut generics: syn::Generics = input.parse()?;
        let self_ty: syn::Type = input.parse()?;
        if input.peek(Token![where]) {
            generics.where_clause = Some(input.parse()?);
        }

        let content;
        syn::braced!(content in input);
        let mut fns = Vec::new();
        while !content.is_empty() {
            fns.push(parse_fn(&content)?);
        }

        Ok(Self {
            decl: ImplDecl {
                generics,
                self_ty,
                fns,
            },
        })
    }
}

fn parse_fn(input: ParseStream) -> syn::Result<FnDecl> {
    let attrs = input.call(Attribute::parse_outer)?;
    let vis: syn::Visibility = input.parse()?;
    let item: syn::TraitItemFn = input.parse()?;
    Ok(FnDecl {
        attrs,
        vis,
        sig: item.sig,
        body: item.default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_mixed_block() {
        let input: CsvInput = syn::parse_quote! {
            pub enum Grade { A, B }

            #[derive(Debug)]
            pub struct Person {
                #[csv]
                pub id: u32,
            }

            impl Person {
                pub fn parse(reader: &mut Reader) -> impl Iterator<Item = Result<Person>>;
            }
        };
        assert_eq!(input.items.len(), 3);
        assert!(matches!(input.items[0], CsvItem::Enum(_)));
        assert!(matches!(input.items[1], CsvItem::Record(_)));
        let CsvItem::Impl(block) = &input.items[2] else {
            panic!("expected an impl item");
        };
        assert_eq!(block.decl.fns.len(), 1);
        assert!(block.decl.fns[0].body.is_none());
    }

    #[test]
    fn keeps_a_supplied_body_for_later_rejection() {
        let input: CsvInput = syn::parse_quote! {
            impl Person {
                fn parse(reader: &mut Reader) -> impl Iterator<Item = Result<Person>> {
                    unimplemented!()
                }
            }
        };
        let CsvItem::Impl(block) = &input.items[0] else {
            panic!("expected an impl item");
        };
        assert!(block.decl.fns[0].body.is_some());
    }

    #[test]
    fn rejects_unknown_items() {
        let result: syn::Result<CsvInput> = syn::parse_str("fn loose() {}");
        assert!(result.is_err());
    }
}
