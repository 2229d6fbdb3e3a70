use std::fmt;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

///
/// Error
///
/// Everything a generated parsing procedure can fail with. Header
/// resolution failures surface once, before the first row; conversion
/// failures surface per row and name the offending property.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{}", render_missing(.property, .names))]
    MissingColumn {
        property: String,
        names: Vec<String>,
    },

    #[error("the operation was cancelled")]
    Cancelled,

    #[error("error reading row data: {0}")]
    Read(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("property '{property}' could not be converted: {message}")]
    Convert { property: String, message: String },

    #[error("property '{property}' has no symbol named '{value}'")]
    UnknownSymbol { property: String, value: String },
}

impl Error {
    #[must_use]
    pub fn missing_column(property: impl Into<String>, names: &[&str]) -> Self {
        Self::MissingColumn {
            property: property.into(),
            names: names.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn convert(property: impl Into<String>, error: &dyn fmt::Display) -> Self {
        Self::Convert {
            property: property.into(),
            message: error.to_string(),
        }
    }

    #[must_use]
    pub fn unknown_symbol(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownSymbol {
            property: property.into(),
            value: value.into(),
        }
    }
}

fn render_missing(property: &str, names: &[String]) -> String {
    match names {
        [single] => format!("missing column '{single}' required by property '{property}'"),
        many => format!(
            "no column matching any of the names '{}' was found for property '{property}'",
            many.join("', '")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_phrasing_matches_alias_count() {
        let one = Error::missing_column("id", &["ID"]);
        assert_eq!(
            one.to_string(),
            "missing column 'ID' required by property 'id'"
        );

        let many = Error::missing_column("id", &["ID", "Id"]);
        assert_eq!(
            many.to_string(),
            "no column matching any of the names 'ID', 'Id' was found for property 'id'"
        );
    }

    #[test]
    fn conversion_errors_name_the_property() {
        let err = Error::convert("count", &"invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "property 'count' could not be converted: invalid digit found in string"
        );
    }

    #[test]
    fn unknown_symbol_carries_the_raw_value() {
        let err = Error::unknown_symbol("grade", "Z");
        assert_eq!(err.to_string(), "property 'grade' has no symbol named 'Z'");
    }
}
