use crate::model::PropertyBinding;
use syn::Ident;

///
/// SequenceShape
///
/// How the generated procedure hands records back: a strictly synchronous
/// pull iterator, or a cooperative stream the caller resumes.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SequenceShape {
    Finite,
    SuspensionBased,
}

///
/// RowSourceKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowSourceKind {
    /// The full reader abstraction; drives either sequence shape and
    /// resolves its own header.
    Reader,
    /// A synchronous sequence of raw rows; needs a header parameter.
    RowIterator,
    /// An asynchronous sequence of raw rows; needs a header parameter.
    RowStream,
}

///
/// RowSourceParam
///

#[derive(Clone, Debug)]
pub struct RowSourceParam {
    pub name: Ident,
    pub kind: RowSourceKind,
}

///
/// FnDecl
///
/// One user-declared fn inside a `csv_parse!` impl block, before signature
/// resolution. `body` is `Some` when the user (incorrectly) supplied one.
///

#[derive(Clone, Debug)]
pub struct FnDecl {
    pub attrs: Vec<syn::Attribute>,
    pub vis: syn::Visibility,
    pub sig: syn::Signature,
    pub body: Option<syn::Block>,
}

///
/// ImplDecl
///
/// One declared impl block; generated fns are grouped back into one emitted
/// impl per declaration.
///

#[derive(Clone, Debug)]
pub struct ImplDecl {
    pub generics: syn::Generics,
    pub self_ty: syn::Type,
    pub fns: Vec<FnDecl>,
}

///
/// GenerationTarget
///
/// One validated fn declaration plus the resolved schema of the type it
/// produces. Built fresh per expansion, immutable, consumed once by the
/// emitter.
///

#[derive(Clone, Debug)]
pub struct GenerationTarget {
    /// The record type owning the generated fn (the impl self type's name).
    pub owner: Ident,
    /// The record type being constructed; normally equals `owner`.
    pub item: Ident,
    /// The full produced type as declared, generic arguments included.
    pub item_ty: syn::Type,
    pub shape: SequenceShape,
    pub attrs: Vec<syn::Attribute>,
    pub vis: syn::Visibility,
    pub sig: syn::Signature,
    pub row_source: RowSourceParam,
    pub header_param: Option<Ident>,
    pub cancel_param: Option<Ident>,
    pub properties: Vec<PropertyBinding>,
}
