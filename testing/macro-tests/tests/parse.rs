//! Synchronous parsing paths: reader-backed iteration, raw row sequences,
//! alias resolution, optional columns, and cancellation.

use rowbind::{prelude::*, time};

csv_parse! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Grade {
        A,
        B,
        C,
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct Student {
        #[csv(header("ID", "Id"))]
        pub id: u32,
        #[csv(header("Name"))]
        pub name: String,
        #[csv(format = "[year]-[month]-[day]")]
        pub born: time::Date,
        #[csv]
        pub grade: Grade,
        #[csv]
        pub score: Option<u32>,
        pub memo: String,
    }

    impl Student {
        pub fn parse(reader: &mut Reader) -> impl Iterator<Item = Result<Student>>;

        pub fn parse_rows(
            rows: impl Iterator<Item = Row>,
            header: &Header,
        ) -> impl Iterator<Item = Result<Student>>;

        pub fn parse_cancellable(
            reader: &mut Reader,
            ct: CancelToken,
        ) -> impl Iterator<Item = Result<Student>>;
    }
}

csv_parse! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct Tiny {
        #[csv(header("ID"))]
        pub id: u32,
    }

    impl Tiny {
        pub fn parse(reader: &mut Reader) -> impl Iterator<Item = Result<Tiny>>;
    }
}

const DATA: &str = "\
ID,Name,born,grade,score
1,Ann,2001-02-03,A,90
2,Bob,1999-12-31,B,7
";

fn date(year: i32, month: time::Month, day: u8) -> time::Date {
    time::Date::from_calendar_date(year, month, day).expect("valid test date")
}

#[test]
fn parses_every_row_into_a_record() {
    let mut reader = Reader::from_string(DATA);
    let students: Vec<Student> = Student::parse(&mut reader)
        .collect::<Result<_>>()
        .expect("all rows convert");

    assert_eq!(students.len(), 2);
    assert_eq!(
        students[0],
        Student {
            id: 1,
            name: "Ann".to_owned(),
            born: date(2001, time::Month::February, 3),
            grade: Grade::A,
            score: Some(90),
            memo: String::new(),
        }
    );
    assert_eq!(students[1].id, 2);
    assert_eq!(students[1].grade, Grade::B);
}

#[test]
fn single_column_round_trip() {
    let mut reader = Reader::from_string("ID\n1\n2\n");
    let records: Vec<Tiny> = Tiny::parse(&mut reader)
        .collect::<Result<_>>()
        .expect("rows convert");
    assert_eq!(records, vec![Tiny { id: 1 }, Tiny { id: 2 }]);
}

#[test]
fn missing_every_alias_names_them_all() {
    let mut reader = Reader::from_string("Name,born,grade,score\nAnn,2001-02-03,A,1\n");
    let failure = Student::parse(&mut reader)
        .next()
        .expect("one failure item")
        .expect_err("no id column");
    assert_eq!(
        failure.to_string(),
        "no column matching any of the names 'ID', 'Id' was found for property 'id'"
    );
}

#[test]
fn second_alias_resolves_when_the_first_is_absent() {
    let mut reader = Reader::from_string("Id,Name,born,grade,score\n3,Cyn,2000-06-15,C,1\n");
    let students: Vec<Student> = Student::parse(&mut reader)
        .collect::<Result<_>>()
        .expect("alias resolves");
    assert_eq!(students[0].id, 3);
    assert_eq!(students[0].grade, Grade::C);
}

#[test]
fn missing_required_column_fails_once_before_any_row() {
    let mut reader = Reader::from_string("ID,born,grade\n1,2001-02-03,A\n2,1999-12-31,B\n");
    let mut items = Student::parse(&mut reader);

    let first = items.next().expect("one failure item");
    assert!(matches!(first, Err(Error::MissingColumn { .. })));
    assert!(first.unwrap_err().to_string().contains("'name'"));
    assert!(items.next().is_none(), "iterator is fused after the failure");
}

#[test]
fn omitted_optional_column_defaults_without_error() {
    let mut reader = Reader::from_string("ID,Name,born,grade\n1,Ann,2001-02-03,A\n");
    let students: Vec<Student> = Student::parse(&mut reader)
        .collect::<Result<_>>()
        .expect("optional column may be absent");
    assert_eq!(students[0].score, None);
}

#[test]
fn a_bad_row_does_not_stop_the_ones_after_it() {
    let mut reader =
        Reader::from_string("ID,Name,born,grade,score\nx,Ann,2001-02-03,A,1\n2,Bob,1999-12-31,B,2\n");
    let items: Vec<Result<Student>> = Student::parse(&mut reader).collect();

    assert_eq!(items.len(), 2);
    let failure = items[0].as_ref().expect_err("unparsable id");
    assert!(failure.to_string().contains("'id'"));
    assert_eq!(items[1].as_ref().expect("second row converts").id, 2);
}

#[test]
fn unknown_enum_symbol_names_the_value() {
    let mut reader = Reader::from_string("ID,Name,born,grade,score\n1,Ann,2001-02-03,Z,1\n");
    let failure = Student::parse(&mut reader)
        .next()
        .expect("one item")
        .expect_err("no such symbol");
    assert!(matches!(failure, Error::UnknownSymbol { .. }));
    assert!(failure.to_string().contains("'Z'"));
}

#[test]
fn raw_rows_resolve_against_the_supplied_header() {
    let header = Header::new(["ID", "Name", "born", "grade"]);
    let rows = vec![
        Row::from_fields(["7", "Dee", "1985-07-21", "A"]),
        Row::from_fields(["8", "Eli", "1990-01-02", "C"]),
    ];
    let students: Vec<Student> = Student::parse_rows(rows.into_iter(), &header)
        .collect::<Result<_>>()
        .expect("rows convert");

    assert_eq!(students.len(), 2);
    assert_eq!(students[0].name, "Dee");
    assert_eq!(students[1].grade, Grade::C);
    assert_eq!(students[1].score, None);
}

#[test]
fn cancellation_delivers_one_error_then_fuses() {
    let mut reader = Reader::from_string(DATA);
    let ct = CancelToken::new();
    let mut items = Student::parse_cancellable(&mut reader, ct.clone());

    let first = items.next().expect("first row").expect("first row converts");
    assert_eq!(first.id, 1);

    ct.cancel();
    let interrupted = items.next().expect("cancellation item");
    assert!(matches!(interrupted, Err(Error::Cancelled)));
    assert!(items.next().is_none(), "iterator is fused after cancellation");
}

#[test]
fn short_rows_read_missing_fields_as_empty() {
    let mut reader = Reader::from_string("ID,Name,born,grade,score\n1,Ann,2001-02-03,A\n");
    let items: Vec<Result<Student>> = Student::parse(&mut reader).collect();

    // The score column exists, so the short row yields an empty field that
    // fails integer conversion.
    assert_eq!(items.len(), 1);
    assert!(items[0].as_ref().unwrap_err().to_string().contains("'score'"));
}
