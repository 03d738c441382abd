//! Tree assembly for main-table rows.
//!
//! Column classification depends only on the main header and the join index's key set, so it
//! is computed once per conversion ([`ColumnPlan`]), not per row. The assembler then folds the
//! main row stream into a single root element, preserving row order; it has no state beyond
//! the root under construction and no commit step.

use crate::types::Element;

use super::join::JoinIndex;

/// How one main-table column is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PlannedColumn {
    /// A plain text child named after the column. Missing trailing values become empty text;
    /// short rows are tolerated for the main table only.
    Scalar { name: String, index: usize },
    /// A `<column>List` container filled from the join index. A column matches a sub-table
    /// either by naming it directly or by naming it with a `List` suffix (`petList` pulls in
    /// sub-table `pet`); the container keeps the column-derived name either way.
    List { list_name: String, table: String },
}

/// Per-conversion classification of the main header's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    columns: Vec<PlannedColumn>,
}

impl ColumnPlan {
    /// Classify each header column against the join index's key set.
    pub fn new(header: &[String], index: &JoinIndex) -> Self {
        let columns = header
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let table = if index.has_table(column) {
                    Some(column.as_str())
                } else {
                    column
                        .strip_suffix("List")
                        .filter(|stem| index.has_table(stem))
                };
                match table {
                    Some(table) => PlannedColumn::List {
                        list_name: format!("{column}List"),
                        table: table.to_string(),
                    },
                    None => PlannedColumn::Scalar {
                        name: column.clone(),
                        index: i,
                    },
                }
            })
            .collect();
        Self { columns }
    }

    /// Number of planned columns (== header length).
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the plan has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Builds the output tree row by row, rooted at `<mainName>List`.
pub struct TreeAssembler<'a> {
    root: Element,
    record_name: String,
    plan: ColumnPlan,
    index: &'a JoinIndex,
}

impl<'a> TreeAssembler<'a> {
    /// Create an assembler for a main table. The column plan is computed here, once.
    pub fn new(main_name: &str, header: &[String], index: &'a JoinIndex) -> Self {
        Self {
            root: Element::new(format!("{main_name}List")),
            record_name: main_name.to_string(),
            plan: ColumnPlan::new(header, index),
            index,
        }
    }

    /// Append one main row as a record element under the root.
    pub fn push_row(&mut self, row: &[String]) {
        let identifier = row.first().map(String::as_str).unwrap_or("");

        let mut record = Element::new(&self.record_name);
        for column in &self.plan.columns {
            let child = match column {
                PlannedColumn::Scalar { name, index } => {
                    Element::with_text(name, row.get(*index).cloned().unwrap_or_default())
                }
                PlannedColumn::List { list_name, table } => {
                    let mut list = Element::new(list_name.clone());
                    for sub in self.index.group(table, identifier) {
                        list.push(sub.clone());
                    }
                    list
                }
            };
            record.push(child);
        }
        self.root.push(record);
    }

    /// Transfer ownership of the assembled tree to the caller.
    pub fn finish(self) -> Element {
        self.root
    }
}
