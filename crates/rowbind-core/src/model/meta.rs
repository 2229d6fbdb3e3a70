use proc_macro2::Span;

///
/// HeaderName
///
/// One acceptable column name for a property, with the span of the literal
/// it came from.
///

#[derive(Clone, Debug)]
pub struct HeaderName {
    pub value: String,
    pub span: Span,
}

impl HeaderName {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }
}

///
/// BindingMeta
///
/// The declarative `#[csv(...)]` metadata attached to one member. `headers`
/// distinguishes "not specified" (`None`, the member name becomes the only
/// alias) from an explicitly empty alias list (`Some(vec![])`, a hard
/// error).
///

#[derive(Clone, Debug)]
pub struct BindingMeta {
    pub headers: Option<Vec<HeaderName>>,
    pub format: Option<(String, Span)>,
    pub required: bool,
    pub span: Span,
}

impl BindingMeta {
    #[must_use]
    pub const fn new(span: Span) -> Self {
        Self {
            headers: None,
            format: None,
            required: false,
            span,
        }
    }
}
