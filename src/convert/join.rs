//! Join index building.
//!
//! Before any main row is processed, every sub-table is read in full and its rows are turned
//! into elements grouped by their identifier (column 0). The resulting [`JoinIndex`] maps
//! sub-table name -> identifier -> ordered group of elements.
//!
//! The identifier is the join key only. It travels next to the built element while grouping
//! ([`KeyedElement`]) and is never stored on the element, so stored groups are already clean
//! and can be attached to any number of main rows without a stripping step.

use std::collections::HashMap;
use std::io::Read;

use crate::error::{ConversionError, ConversionResult};
use crate::tabular::TableReader;
use crate::types::{Element, TableSource};

/// Ordered groups of built sub-elements, keyed by identifier.
pub type JoinGroups = HashMap<String, Vec<Element>>;

/// Precomputed mapping from sub-table name and identifier to that identifier's group.
///
/// Built once per conversion and read-only thereafter. Lookups are by key; iteration order is
/// never observable, so plain hash maps suffice. Row order within a group is preserved.
#[derive(Debug, Default)]
pub struct JoinIndex {
    tables: HashMap<String, JoinGroups>,
}

impl JoinIndex {
    /// Register a sub-table's groups. A later table with the same name replaces an earlier one.
    pub fn insert_table(&mut self, name: impl Into<String>, groups: JoinGroups) {
        self.tables.insert(name.into(), groups);
    }

    /// Whether a sub-table of this name was supplied.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// The group of sub-elements for `identifier` in `table`, or an empty slice when either is
    /// unknown. Absence is not an error.
    pub fn group(&self, table: &str, identifier: &str) -> &[Element] {
        self.tables
            .get(table)
            .and_then(|groups| groups.get(identifier))
            .map_or(&[], Vec::as_slice)
    }

    /// Row counts of one table's groups, summed. Used for stats reporting.
    pub fn table_rows(&self, name: &str) -> usize {
        self.tables
            .get(name)
            .map_or(0, |groups| groups.values().map(Vec::len).sum())
    }
}

/// A built sub-element together with its transient join key.
struct KeyedElement {
    key: String,
    element: Element,
}

/// Read one sub-table in full and group its rows by identifier.
///
/// Errors (open failure, read failure, malformed row, missing header) propagate to the caller;
/// the conversion driver isolates them to this sub-table.
pub fn index_sub_table(source: &TableSource) -> ConversionResult<JoinGroups> {
    let mut reader = TableReader::open(source)?;
    index_sub_rows(&source.name, &mut reader)
}

/// Grouping over an already-open reader, usable with in-memory sources.
pub fn index_sub_rows<R: Read>(
    table: &str,
    reader: &mut TableReader<R>,
) -> ConversionResult<JoinGroups> {
    let header = reader.header().to_vec();

    let mut groups = JoinGroups::new();
    for (row_idx0, row) in reader.rows().enumerate() {
        let row = row?;
        // 1-based row number for users; +1 again because the header is row 1.
        let keyed = build_sub_element(table, &header, &row, row_idx0 + 2)?;
        groups.entry(keyed.key).or_default().push(keyed.element);
    }

    Ok(groups)
}

/// Build one sub-element: tag = sub-table name, one text child per header column at index >= 1.
///
/// Sub rows must be fully populated; a row shorter than the header is a defect in the input
/// data, not something to truncate silently.
fn build_sub_element(
    table: &str,
    header: &[String],
    row: &[String],
    row_no: usize,
) -> ConversionResult<KeyedElement> {
    if row.len() < header.len() {
        return Err(ConversionError::MalformedRow {
            table: table.to_string(),
            row: row_no,
            expected: header.len(),
            got: row.len(),
        });
    }

    let key = row.first().cloned().unwrap_or_default();
    let mut element = Element::new(table);
    for (column, value) in header.iter().zip(row).skip(1) {
        element.push(Element::with_text(column, value.clone()));
    }

    Ok(KeyedElement { key, element })
}

#[cfg(test)]
mod tests {
    use super::{JoinIndex, index_sub_rows};
    use crate::error::ConversionError;
    use crate::tabular::TableReader;

    fn index_of(input: &str) -> super::JoinGroups {
        let mut reader = TableReader::from_reader(input.as_bytes(), "pet").unwrap();
        index_sub_rows("pet", &mut reader).unwrap()
    }

    #[test]
    fn groups_rows_by_identifier_preserving_order() {
        let groups = index_of("id,name,species\n1,Rex,dog\n2,Tweety,bird\n1,Milo,cat\n");

        let ones = &groups["1"];
        assert_eq!(ones.len(), 2);
        assert_eq!(ones[0].find("name").unwrap().text, "Rex");
        assert_eq!(ones[1].find("name").unwrap().text, "Milo");
        assert_eq!(groups["2"].len(), 1);
    }

    #[test]
    fn identifier_column_is_not_a_child_and_not_an_attribute() {
        let groups = index_of("id,name,species\n1,Rex,dog\n");

        let pet = &groups["1"][0];
        assert_eq!(pet.name, "pet");
        assert_eq!(pet.children.len(), 2);
        assert!(pet.find("id").is_none());
        assert!(pet.attributes.is_empty());
    }

    #[test]
    fn short_sub_row_is_malformed() {
        let mut reader =
            TableReader::from_reader(&b"id,name,species\n1,Rex\n"[..], "pet").unwrap();
        let err = index_sub_rows("pet", &mut reader).unwrap_err();

        match err {
            ConversionError::MalformedRow {
                table,
                row,
                expected,
                got,
            } => {
                assert_eq!(table, "pet");
                assert_eq!(row, 2);
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("expected MalformedRow, got {other}"),
        }
    }

    #[test]
    fn extra_trailing_values_are_ignored() {
        let groups = index_of("id,name\n1,Rex,stray\n");
        assert_eq!(groups["1"][0].children.len(), 1);
    }

    #[test]
    fn header_only_sub_table_yields_empty_groups() {
        let groups = index_of("id,name,species\n");
        assert!(groups.is_empty());
    }

    #[test]
    fn lookups_on_missing_table_or_identifier_return_empty() {
        let mut index = JoinIndex::default();
        index.insert_table("pet", index_of("id,name,species\n1,Rex,dog\n"));

        assert!(index.group("pet", "99").is_empty());
        assert!(index.group("toy", "1").is_empty());
        assert_eq!(index.table_rows("pet"), 1);
        assert_eq!(index.table_rows("toy"), 0);
    }
}
