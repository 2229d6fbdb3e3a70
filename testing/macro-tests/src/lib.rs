//! Expansion tests for the `csv_parse!` macro. Everything lives in the
//! integration tests under `tests/`; this library target exists only so the
//! package participates in the workspace.
