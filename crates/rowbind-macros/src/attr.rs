use darling::{FromMeta, ast::NestedMeta, util::Flag, util::SpannedValue};
use rowbind_core::model::{BindingMeta, HeaderName};
use syn::spanned::Spanned;

///
/// HeaderList
///
/// The `header("A", "B")` alias list. Each alias keeps the span of its
/// literal so diagnostics land on the offending name.
///

#[derive(Debug, Default)]
pub struct HeaderList(pub Vec<HeaderName>);

impl FromMeta for HeaderList {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let mut names = Vec::with_capacity(items.len());
        for item in items {
            match item {
                NestedMeta::Lit(syn::Lit::Str(lit)) => {
                    names.push(HeaderName::new(lit.value(), lit.span()));
                }
                other => {
                    return Err(
                        darling::Error::custom("expected a string literal header name")
                            .with_span(other),
                    );
                }
            }
        }
        Ok(Self(names))
    }

    fn from_value(value: &syn::Lit) -> darling::Result<Self> {
        match value {
            syn::Lit::Str(lit) => Ok(Self(vec![HeaderName::new(lit.value(), lit.span())])),
            other => Err(darling::Error::unexpected_lit_type(other)),
        }
    }
}

///
/// CsvFieldAttr
///
/// `#[csv(header("A", "B"), format = "..", required)]` on one member. A bare
/// `#[csv]` binds the member under its own name.
///

#[derive(Debug, Default, FromMeta)]
pub struct CsvFieldAttr {
    #[darling(default)]
    pub header: Option<HeaderList>,
    #[darling(default)]
    pub format: Option<SpannedValue<String>>,
    #[darling(default)]
    pub required: Flag,
}

///
/// CsvRecordAttr
///
/// `#[csv(extends = Base, include_all)]` on one record declaration.
///

#[derive(Debug, Default, FromMeta)]
pub struct CsvRecordAttr {
    #[darling(default)]
    pub extends: Option<syn::Path>,
    #[darling(default)]
    pub include_all: Flag,
}

/// Extract the binding metadata from a member's attributes, or `None` when
/// no `#[csv]` attribute is present.
pub fn field_meta(attrs: &[syn::Attribute]) -> darling::Result<Option<BindingMeta>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("csv")) else {
        return Ok(None);
    };

    let parsed = match &attr.meta {
        syn::Meta::Path(_) => CsvFieldAttr::default(),
        meta => CsvFieldAttr::from_meta(meta)?,
    };

    let mut meta = BindingMeta::new(attr.span());
    meta.headers = parsed.header.map(|list| list.0);
    meta.format = parsed
        .format
        .map(|format| ((*format).clone(), format.span()));
    meta.required = parsed.required.is_present();
    Ok(Some(meta))
}

/// Extract the record-level attribute, tolerating its absence.
pub fn record_attr(attrs: &[syn::Attribute]) -> darling::Result<CsvRecordAttr> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("csv")) else {
        return Ok(CsvRecordAttr::default());
    };
    match &attr.meta {
        syn::Meta::Path(_) => Ok(CsvRecordAttr::default()),
        meta => CsvRecordAttr::from_meta(meta),
    }
}

/// Drop every `#[csv(...)]` attribute from a passthrough attribute list.
pub fn strip_csv(attrs: &mut Vec<syn::Attribute>) {
    attrs.retain(|attr| !attr.path().is_ident("csv"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn bare_attribute_binds_by_name() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[csv])];
        let meta = field_meta(&attrs).expect("valid").expect("present");
        assert!(meta.headers.is_none());
        assert!(meta.format.is_none());
        assert!(!meta.required);
    }

    #[test]
    fn absent_attribute_is_none() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[derive(Debug)])];
        assert!(field_meta(&attrs).expect("valid").is_none());
    }

    #[test]
    fn alias_list_and_flags_round_trip() {
        let attrs: Vec<syn::Attribute> =
            vec![parse_quote!(#[csv(header("ID", "Id"), format = "[year]", required)])];
        let meta = field_meta(&attrs).expect("valid").expect("present");
        let headers = meta.headers.expect("aliases");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].value, "ID");
        assert_eq!(meta.format.expect("format").0, "[year]");
        assert!(meta.required);
    }

    #[test]
    fn single_alias_accepts_name_value_form() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[csv(header = "ID")])];
        let meta = field_meta(&attrs).expect("valid").expect("present");
        assert_eq!(meta.headers.expect("aliases")[0].value, "ID");
    }

    #[test]
    fn empty_alias_list_is_preserved_for_diagnosis() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[csv(header())])];
        let meta = field_meta(&attrs).expect("valid").expect("present");
        assert_eq!(meta.headers.expect("explicit empty list").len(), 0);
    }

    #[test]
    fn record_attr_reads_extends_and_include_all() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[csv(extends = Base, include_all)])];
        let attr = record_attr(&attrs).expect("valid");
        assert!(attr.include_all.is_present());
        let base = attr.extends.expect("base path");
        assert!(base.is_ident("Base"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[csv(colum = "oops")])];
        assert!(field_meta(&attrs).is_err());
    }
}
