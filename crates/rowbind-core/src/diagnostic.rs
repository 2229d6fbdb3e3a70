use derive_more::{Deref, IntoIterator};
use proc_macro2::{Span, TokenStream};
use quote::quote_spanned;
use std::fmt;

///
/// Code
///
/// Stable identifiers for every generation-time failure. The numbering is
/// part of the public surface: tooling and tests match on it, so codes are
/// never reused or renumbered.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Code {
    MethodHasBody,
    InvalidReturnType,
    MissingDateFormatAttribute,
    EssentialTypesNotFound,
    InvalidHeaderName,
    NoPropertiesFound,
    PropertyNotParsable,
    HeaderNamesEmpty,
    UnexpectedParameterType,
    MissingReaderParameter,
    MissingHeaderParameter,
    DuplicateCancellationTokenParameter,
    DuplicateHeaderParameter,
    DuplicateReaderParameter,
    UnexpectedIteratorParameter,
    UnexpectedStreamParameter,
    InvalidDateFormat,
    UnknownBaseType,
    UnknownItemType,
}

impl Code {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MethodHasBody => "CSVGEN001",
            Self::InvalidReturnType => "CSVGEN002",
            Self::MissingDateFormatAttribute => "CSVGEN004",
            Self::EssentialTypesNotFound => "CSVGEN005",
            Self::InvalidHeaderName => "CSVGEN006",
            Self::NoPropertiesFound => "CSVGEN007",
            Self::PropertyNotParsable => "CSVGEN008",
            Self::HeaderNamesEmpty => "CSVGEN009",
            Self::UnexpectedParameterType => "CSVGEN010",
            Self::MissingReaderParameter => "CSVGEN011",
            Self::MissingHeaderParameter => "CSVGEN012",
            Self::DuplicateCancellationTokenParameter => "CSVGEN013",
            Self::DuplicateHeaderParameter => "CSVGEN014",
            Self::DuplicateReaderParameter => "CSVGEN015",
            Self::UnexpectedIteratorParameter => "CSVGEN016",
            Self::UnexpectedStreamParameter => "CSVGEN017",
            Self::InvalidDateFormat => "CSVGEN018",
            Self::UnknownBaseType => "CSVGEN019",
            Self::UnknownItemType => "CSVGEN020",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Diagnostic
///
/// One generation-time failure: a stable code, a rendered message, and the
/// offending span. Message templates all live here so the walker, classifier,
/// and resolver never format their own text.
///

#[derive(Clone, Debug)]
pub struct Diagnostic {
    code: Code,
    message: String,
    span: Span,
}

impl Diagnostic {
    pub fn new(code: Code, span: Span, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }

    #[must_use]
    pub const fn code(&self) -> Code {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Render as a `compile_error!` invocation at the offending span.
    #[must_use]
    pub fn to_compile_error(&self) -> TokenStream {
        let text = format!("[{}] {}", self.code, self.message);
        quote_spanned!(self.span => ::core::compile_error!(#text);)
    }

    //
    // Method-shape violations
    //

    pub fn method_has_body(span: Span, fn_name: &impl fmt::Display) -> Self {
        Self::new(
            Code::MethodHasBody,
            span,
            format!("function '{fn_name}' must be declared without a body; its body is generated"),
        )
    }

    pub fn invalid_return_type(span: Span) -> Self {
        Self::new(
            Code::InvalidReturnType,
            span,
            "function must return 'impl Iterator<Item = Result<T>>' or \
             'impl Stream<Item = Result<T>>' for a record type T",
        )
    }

    pub fn unexpected_parameter_type(span: Span) -> Self {
        Self::new(
            Code::UnexpectedParameterType,
            span,
            "parameter is not of any expected type; expected one of '&mut Reader', '&Header', \
             'CancelToken', 'impl Iterator<Item = Row>', or 'impl Stream<Item = Row>'",
        )
    }

    pub fn missing_reader_parameter(span: Span) -> Self {
        Self::new(
            Code::MissingReaderParameter,
            span,
            "no row source specified; declare one parameter of type '&mut Reader', \
             'impl Iterator<Item = Row>', or 'impl Stream<Item = Row>'",
        )
    }

    pub fn missing_header_parameter(span: Span) -> Self {
        Self::new(
            Code::MissingHeaderParameter,
            span,
            "a raw row sequence cannot resolve column names; add a '&Header' parameter",
        )
    }

    pub fn duplicate_reader_parameter(span: Span) -> Self {
        Self::new(
            Code::DuplicateReaderParameter,
            span,
            "only one row source parameter can be specified in the parameter list",
        )
    }

    pub fn duplicate_header_parameter(span: Span) -> Self {
        Self::new(
            Code::DuplicateHeaderParameter,
            span,
            "only one parameter of type '&Header' can be specified in the parameter list",
        )
    }

    pub fn duplicate_cancellation_token_parameter(span: Span) -> Self {
        Self::new(
            Code::DuplicateCancellationTokenParameter,
            span,
            "only one parameter of type 'CancelToken' can be specified in the parameter list",
        )
    }

    pub fn unexpected_iterator_parameter(span: Span) -> Self {
        Self::new(
            Code::UnexpectedIteratorParameter,
            span,
            "a synchronous row sequence requires the function to return \
             'impl Iterator<Item = Result<T>>', not a stream",
        )
    }

    pub fn unexpected_stream_parameter(span: Span) -> Self {
        Self::new(
            Code::UnexpectedStreamParameter,
            span,
            "an asynchronous row sequence requires the function to return \
             'impl Stream<Item = Result<T>>', not an iterator",
        )
    }

    //
    // Schema violations
    //

    pub fn missing_date_format(span: Span, property: &impl fmt::Display) -> Self {
        Self::new(
            Code::MissingDateFormatAttribute,
            span,
            format!(
                "property '{property}' has a date/time type and must specify \
                 'format = \"..\"' in its #[csv] attribute"
            ),
        )
    }

    pub fn invalid_date_format(
        span: Span,
        property: &impl fmt::Display,
        detail: &impl fmt::Display,
    ) -> Self {
        Self::new(
            Code::InvalidDateFormat,
            span,
            format!("property '{property}' has an invalid date/time format: {detail}"),
        )
    }

    pub fn invalid_header_name(span: Span, property: &impl fmt::Display) -> Self {
        Self::new(
            Code::InvalidHeaderName,
            span,
            format!(
                "property '{property}' has an invalid header name; \
                 a header name cannot be empty or whitespace"
            ),
        )
    }

    pub fn header_names_empty(span: Span, property: &impl fmt::Display) -> Self {
        Self::new(
            Code::HeaderNamesEmpty,
            span,
            format!("property '{property}' must specify one or more header names"),
        )
    }

    pub fn no_properties_found(span: Span, ty: &impl fmt::Display) -> Self {
        Self::new(
            Code::NoPropertiesFound,
            span,
            format!("the type '{ty}' does not have any members with a #[csv] binding"),
        )
    }

    pub fn property_not_parsable(
        span: Span,
        property: &impl fmt::Display,
        ty: &impl fmt::Display,
    ) -> Self {
        Self::new(
            Code::PropertyNotParsable,
            span,
            format!(
                "property '{property}' of type '{ty}' is not parsable; it must be 'String', \
                 a unit-variant enum declared in this invocation, a date/time type, or a \
                 type with the 'FromStr' capability"
            ),
        )
    }

    pub fn unknown_base_type(
        span: Span,
        record: &impl fmt::Display,
        base: &impl fmt::Display,
    ) -> Self {
        Self::new(
            Code::UnknownBaseType,
            span,
            format!(
                "record '{record}' extends '{base}', which is not a record declared in \
                 this invocation"
            ),
        )
    }

    pub fn cyclic_base_type(span: Span, record: &impl fmt::Display) -> Self {
        Self::new(
            Code::UnknownBaseType,
            span,
            format!("the 'extends' chain of record '{record}' is cyclic"),
        )
    }

    pub fn unknown_item_type(span: Span, ty: &impl fmt::Display) -> Self {
        Self::new(
            Code::UnknownItemType,
            span,
            format!("the produced type '{ty}' is not a record declared in this invocation"),
        )
    }

    //
    // Environment violations
    //

    /// One aggregated report for every missing well-known type.
    pub fn essential_types_not_found(span: Span, missing: &[&str]) -> Self {
        Self::new(
            Code::EssentialTypesNotFound,
            span,
            format!(
                "essential types for generation were not found: {}",
                missing.join(", ")
            ),
        )
    }
}

///
/// Diagnostics
///
/// Ordered sink shared by the resolution passes. Rendering never panics and
/// never throws across the generation boundary; a non-empty sink simply means
/// the offending target is skipped.
///

#[derive(Debug, Default, Deref, IntoIterator)]
pub struct Diagnostics {
    #[deref]
    #[into_iterator(owned, ref)]
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Render every collected diagnostic as `compile_error!` tokens.
    #[must_use]
    pub fn to_compile_errors(&self) -> TokenStream {
        self.items.iter().map(Diagnostic::to_compile_error).collect()
    }

    /// Codes in collection order, for assertions.
    #[must_use]
    pub fn codes(&self) -> Vec<Code> {
        self.items.iter().map(Diagnostic::code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Code::MethodHasBody.as_str(), "CSVGEN001");
        assert_eq!(Code::UnexpectedStreamParameter.as_str(), "CSVGEN017");
        assert_eq!(Code::UnknownItemType.as_str(), "CSVGEN020");
    }

    #[test]
    fn missing_types_aggregate_into_one_message() {
        let diag =
            Diagnostic::essential_types_not_found(Span::call_site(), &["Reader", "CancelToken"]);
        assert_eq!(diag.code(), Code::EssentialTypesNotFound);
        assert!(diag.message().contains("Reader, CancelToken"));
    }

    #[test]
    fn compile_error_text_carries_the_code() {
        let diag = Diagnostic::invalid_return_type(Span::call_site());
        let rendered = diag.to_compile_error().to_string();
        assert!(rendered.contains("compile_error"));
        assert!(rendered.contains("CSVGEN002"));
    }

    #[test]
    fn sink_preserves_order() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::header_names_empty(Span::call_site(), &"a"));
        diags.push(Diagnostic::invalid_header_name(Span::call_site(), &"b"));
        assert_eq!(
            diags.codes(),
            vec![Code::HeaderNamesEmpty, Code::InvalidHeaderName]
        );
    }
}
