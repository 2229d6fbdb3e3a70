use crate::error::{Error, Result};
use std::{fs::File, io, path::Path};

///
/// Reader
///
/// The delimited-text boundary generated procedures read from. Type-erased
/// over its byte source so one reader type serves files, sockets, and
/// in-memory fixtures alike.
///

pub struct Reader {
    inner: csv::Reader<Box<dyn io::Read + Send>>,
}

impl Reader {
    pub fn from_reader(source: impl io::Read + Send + 'static) -> Self {
        let inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(Box::new(source) as Box<dyn io::Read + Send>);
        Self { inner }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }

    #[must_use]
    pub fn from_string(content: impl Into<String>) -> Self {
        Self::from_reader(io::Cursor::new(content.into()))
    }

    /// The column names of the leading header row.
    pub fn header(&mut self) -> Result<Header> {
        let record = self.inner.headers()?;
        Ok(Header {
            columns: record.iter().map(str::to_owned).collect(),
        })
    }

    /// The data rows following the header.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows {
            inner: self.inner.records(),
        }
    }
}

impl std::fmt::Debug for Reader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader").finish_non_exhaustive()
    }
}

///
/// Header
///
/// Resolves column names to field indices. Lookup walks the alias list in
/// declaration order, so the first alias present in the header wins.
///

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn try_index_of(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.columns.iter().position(|column| column == name))
    }

    pub fn index_of(&self, property: &str, names: &[&str]) -> Result<usize> {
        self.try_index_of(names)
            .ok_or_else(|| Error::missing_column(property, names))
    }
}

///
/// Row
///
/// One raw data row. Out-of-range access yields the empty slice rather than
/// panicking; short rows behave like rows padded with empty fields.
///

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row(csv::StringRecord);

impl Row {
    pub fn from_fields(fields: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let mut record = csv::StringRecord::new();
        for field in fields {
            record.push_field(field.as_ref());
        }
        Self(record)
    }

    #[must_use]
    pub fn field(&self, index: usize) -> &str {
        self.0.get(index).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<csv::StringRecord> for Row {
    fn from(record: csv::StringRecord) -> Self {
        Self(record)
    }
}

///
/// Rows
///

pub struct Rows<'r> {
    inner: csv::StringRecordsIter<'r, Box<dyn io::Read + Send>>,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|record| record.map(Row).map_err(Error::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn header_comes_from_the_first_row() {
        let mut reader = Reader::from_string("ID,Name\n1,Ann\n");
        let header = reader.header().expect("header row");
        assert_eq!(header.columns(), ["ID", "Name"]);

        let rows: Vec<_> = reader.rows().collect::<Result<_>>().expect("data rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field(1), "Ann");
    }

    #[test]
    fn first_alias_present_wins() {
        let header = Header::new(["Id", "ID"]);
        assert_eq!(header.try_index_of(&["ID", "Id"]), Some(1));
        assert_eq!(header.try_index_of(&["Code", "Id"]), Some(0));
        assert_eq!(header.try_index_of(&["Code"]), None);
    }

    #[test]
    fn required_lookup_reports_the_property() {
        let header = Header::new(["Name"]);
        let err = header.index_of("id", &["ID"]).expect_err("missing");
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn out_of_range_fields_read_as_empty() {
        let row = Row::from_fields(["a"]);
        assert_eq!(row.field(0), "a");
        assert_eq!(row.field(5), "");
    }

    proptest! {
        #[test]
        fn alias_order_never_changes_hit_or_miss(
            columns in proptest::collection::vec("[A-Za-z]{1,6}", 1..6),
        ) {
            let header = Header::new(columns.clone());
            for (index, column) in columns.iter().enumerate() {
                let hit = header.try_index_of(&[column.as_str()]).expect("present");
                prop_assert_eq!(&columns[hit], column);
                prop_assert!(hit <= index);
            }
        }
    }
}
