//! Best-effort side assets of a processed document.
//!
//! Nothing in here returns an error to the caller: failures are logged and
//! whatever was produced so far (possibly nothing) is returned.

mod images;
mod tables;

pub use images::ImageExtractor;
pub use tables::{NoopTableExtractor, PdftotextTableExtractor, Table, TableExtractor};
