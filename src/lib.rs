//! `csv2xml` is a small library for joining delimited tables into a single nested XML
//! document.
//!
//! One "main" table plus zero or more "sub" tables go in; one [`types::Element`] tree comes
//! out, rooted at `<mainName>List` with one `<mainName>` record per main data row. Sub-table
//! rows are grouped by their identifier (always column 0) and attached, in row order, under
//! the main columns that name them. Everything happens in memory in a single pass; the join
//! index for all sub-tables is built before the first main row is read.
//!
//! ## Input format
//!
//! Each table is a text file whose first line is the header and whose remaining lines are
//! data rows. Fields are separated by comma or tab (mixed delimiters within one file are
//! fine). Quoting is not supported: a quote is an ordinary character. Main rows may be
//! shorter than the header (missing values become empty text); sub rows must be fully
//! populated.
//!
//! ## Quick example
//!
//! With `person.csv` holding `id,name,petList` / `1,Alice` and `pet.csv` holding
//! `id,name,species` / `1,Rex,dog` / `1,Milo,cat`:
//!
//! ```no_run
//! use csv2xml::convert::{convert_to_string, ConversionOptions};
//!
//! # fn main() -> Result<(), csv2xml::ConversionError> {
//! let xml = convert_to_string("person.csv", &["pet.csv"], &ConversionOptions::default())?;
//! // <personList><person><id>1</id><name>Alice</name>
//! //   <petListList><pet>...Rex...</pet><pet>...Milo...</pet></petListList></person></personList>
//! println!("{xml}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure model
//!
//! A sub-table that cannot be opened or holds a malformed row contributes an empty join group
//! (main rows referencing it get empty list containers); the failure is reported to the
//! configured [`convert::ConversionObserver`], if any. Failures reading the main table or
//! serializing output are fatal and propagate to the caller.
//!
//! ## Modules
//!
//! - [`convert`]: conversion entrypoints, join index building, tree assembly, observability
//! - [`tabular`]: delimited table reading
//! - [`types`]: table source + element tree types
//! - [`xml`]: indented XML serialization of the assembled tree
//! - [`error`]: error types used across the conversion

pub mod convert;
pub mod error;
pub mod tabular;
pub mod types;
pub mod xml;

pub use error::{ConversionError, ConversionResult};
