//! Conversion entrypoints.
//!
//! Most callers should use [`convert_to_tree`] (or the [`convert_to_string`] /
//! [`convert_to_file`] serialization wrappers), which:
//!
//! - builds the full [`join::JoinIndex`] for every sub-table before the first main row is read
//! - streams the main table through the [`assemble::TreeAssembler`] in row order
//! - optionally reports per-table success/failure/alerts to a [`ConversionObserver`]
//!
//! Failures while building one sub-table's index are isolated to that sub-table (it
//! contributes an empty join group); failures reading the main table or serializing output
//! are fatal and propagate to the caller unchanged.

pub mod assemble;
pub mod join;
pub mod observability;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ConversionError, ConversionResult};
use crate::tabular::TableReader;
use crate::types::{Element, TableSource};
use crate::xml;

pub use assemble::{ColumnPlan, TreeAssembler};
pub use join::{JoinGroups, JoinIndex};
pub use observability::{
    CompositeObserver, ConversionObserver, ConversionSeverity, FileObserver, StdErrObserver,
    TableContext, TableRole, TableStats,
};

/// Options controlling conversion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ConversionOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl fmt::Debug for ConversionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

/// Convert a main table plus sub-tables into a single element tree.
///
/// The returned tree is rooted at `<mainName>List` with one `<mainName>` record per main data
/// row. A main column that names a supplied sub-table (directly, or with a `List` suffix)
/// becomes a `<column>List` container holding that row's joined sub-elements; every other
/// column becomes a text child.
///
/// # Examples
///
/// ```no_run
/// use csv2xml::convert::{convert_to_tree, ConversionOptions};
///
/// # fn main() -> Result<(), csv2xml::ConversionError> {
/// let tree = convert_to_tree("person.csv", &["pet.csv"], &ConversionOptions::default())?;
/// println!("records={}", tree.children.len());
/// # Ok(())
/// # }
/// ```
pub fn convert_to_tree<P: AsRef<Path>>(
    main: impl AsRef<Path>,
    subs: &[P],
    options: &ConversionOptions,
) -> ConversionResult<Element> {
    let main_source = TableSource::from_path(main);
    let sub_sources: Vec<TableSource> = subs.iter().map(TableSource::from_path).collect();

    let index = build_index(&sub_sources, options);

    let main_ctx = TableContext {
        path: main_source.path.clone(),
        role: TableRole::Main,
    };
    match assemble_main(&main_source, &index) {
        Ok((tree, rows)) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(&main_ctx, TableStats { rows });
            }
            Ok(tree)
        }
        Err(e) => {
            report_failure(&main_ctx, &e, options);
            Err(e)
        }
    }
}

/// Convert and serialize to an indented XML string.
pub fn convert_to_string<P: AsRef<Path>>(
    main: impl AsRef<Path>,
    subs: &[P],
    options: &ConversionOptions,
) -> ConversionResult<String> {
    let tree = convert_to_tree(main, subs, options)?;
    xml::to_string(&tree)
}

/// Convert and serialize to an indented XML file at `target`.
pub fn convert_to_file<P: AsRef<Path>>(
    target: impl AsRef<Path>,
    main: impl AsRef<Path>,
    subs: &[P],
    options: &ConversionOptions,
) -> ConversionResult<()> {
    let tree = convert_to_tree(main, subs, options)?;
    xml::to_file(&tree, target)
}

/// Convert and serialize to an arbitrary writer.
pub fn convert_to_writer<P: AsRef<Path>>(
    sink: impl Write,
    main: impl AsRef<Path>,
    subs: &[P],
    options: &ConversionOptions,
) -> ConversionResult<()> {
    let tree = convert_to_tree(main, subs, options)?;
    xml::write_document(&tree, sink)
}

/// Build the join index for all sub-tables, isolating per-table failures.
fn build_index(subs: &[TableSource], options: &ConversionOptions) -> JoinIndex {
    let mut index = JoinIndex::default();
    for source in subs {
        let ctx = TableContext {
            path: source.path.clone(),
            role: TableRole::Sub,
        };
        let groups = match join::index_sub_table(source) {
            Ok(groups) => {
                if let Some(obs) = options.observer.as_ref() {
                    let rows = groups.values().map(Vec::len).sum();
                    obs.on_success(&ctx, TableStats { rows });
                }
                groups
            }
            Err(e) => {
                report_failure(&ctx, &e, options);
                JoinGroups::new()
            }
        };
        index.insert_table(source.name.clone(), groups);
    }
    index
}

fn assemble_main(
    source: &TableSource,
    index: &JoinIndex,
) -> ConversionResult<(Element, usize)> {
    let mut reader = TableReader::open(source)?;
    let header = reader.header().to_vec();

    let mut assembler = TreeAssembler::new(&source.name, &header, index);
    let mut rows = 0usize;
    for row in reader.rows() {
        assembler.push_row(&row?);
        rows += 1;
    }
    Ok((assembler.finish(), rows))
}

fn report_failure(ctx: &TableContext, error: &ConversionError, options: &ConversionOptions) {
    if let Some(obs) = options.observer.as_ref() {
        let severity = severity_for_error(error);
        obs.on_failure(ctx, severity, error);
        if severity >= options.alert_at_or_above {
            obs.on_alert(ctx, severity, error);
        }
    }
}

fn severity_for_error(e: &ConversionError) -> ConversionSeverity {
    match e {
        ConversionError::Io(_) => ConversionSeverity::Critical,
        ConversionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ConversionSeverity::Critical,
            _ => ConversionSeverity::Error,
        },
        ConversionError::XmlWrite(err) => match err {
            ::xml::writer::Error::Io(_) => ConversionSeverity::Critical,
            _ => ConversionSeverity::Error,
        },
        ConversionError::EmptyTable { .. } => ConversionSeverity::Error,
        ConversionError::MalformedRow { .. } => ConversionSeverity::Error,
    }
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue conversion work in a job system.
#[derive(Clone)]
pub struct Conversion {
    /// Path to the main table.
    pub main: PathBuf,
    /// Paths to the sub-tables.
    pub subs: Vec<PathBuf>,
    /// Options controlling the conversion.
    pub options: ConversionOptions,
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("main", &self.main)
            .field("subs", &self.subs.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Conversion {
    /// Execute the request by calling [`convert_to_tree`].
    pub fn run(&self) -> ConversionResult<Element> {
        convert_to_tree(&self.main, &self.subs, &self.options)
    }
}
