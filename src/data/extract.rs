use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::collect::collect_leaves;
use crate::data::model::{Component, Dataset, ElementKind, ValueArray};
use crate::data::source::{GroupHandle, LeafHandle};
use crate::data::table::TableReader;
use crate::error::ExtractError;

// ---------------------------------------------------------------------------
// Extraction options
// ---------------------------------------------------------------------------

/// Which leaves an extraction run considers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSelection {
    /// Every eligible leaf in the container.
    All,
    /// Only the leaves at these fully-qualified paths.
    Paths(Vec<String>),
}

impl DatasetSelection {
    fn selects(&self, path: &str) -> bool {
        match self {
            DatasetSelection::All => true,
            DatasetSelection::Paths(paths) => paths.iter().any(|p| p == path),
        }
    }
}

/// Options for [`build_records`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Restrict extraction to a subset of leaf paths.
    pub use_datasets: DatasetSelection,
    /// Merge plain leaves that share a shape into one multi-component record.
    pub auto_merge: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            use_datasets: DatasetSelection::All,
            auto_merge: false,
        }
    }
}

/// Derive a record label base from a source file path: the file stem, or the
/// whole file name when the stem is empty.
pub fn label_base_for(path: &Path) -> String {
    let full_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.file_stem() {
        Some(stem) if !stem.is_empty() => stem.to_string_lossy().into_owned(),
        _ => full_name,
    }
}

// ---------------------------------------------------------------------------
// Bulk extraction: every plain leaf, one common shape
// ---------------------------------------------------------------------------

/// Extract every plain (scalar numeric) leaf under `root`, requiring all of
/// them to share one shape. Returns path → materialized array in traversal
/// order; an empty container yields an empty map, not an error.
///
/// The reference shape is taken from the leaf with the lexicographically
/// smallest path, so the expected/actual roles in
/// [`ExtractError::InconsistentShapes`] do not depend on traversal order.
pub fn extract_plain<G: GroupHandle>(
    root: &G,
) -> Result<IndexMap<String, ValueArray>, ExtractError> {
    let leaves: Vec<_> = collect_leaves(root)?
        .into_iter()
        .filter(|entry| entry.kind.is_plain())
        .collect();

    let Some(reference) = leaves.iter().min_by(|a, b| a.path.cmp(&b.path)) else {
        return Ok(IndexMap::new());
    };
    let reference_shape = reference.shape.clone();

    for entry in &leaves {
        if entry.shape != reference_shape {
            return Err(ExtractError::InconsistentShapes {
                expected: reference_shape.clone(),
                actual: entry.shape.clone(),
                path: entry.path.clone(),
            });
        }
    }

    let mut arrays = IndexMap::with_capacity(leaves.len());
    for entry in leaves {
        let values = entry.leaf.read().map_err(|cause| ExtractError::DatasetRead {
            path: entry.path.clone(),
            cause,
        })?;
        arrays.insert(entry.path, values);
    }
    Ok(arrays)
}

// ---------------------------------------------------------------------------
// Grouping engine: shape-keyed auto-merge into output records
// ---------------------------------------------------------------------------

/// Walk the container under `root` and build one output record per
/// structured leaf and per shape group of plain leaves.
///
/// Every leaf gets the label `"{label_base}[{path}]"`. Structured leaves are
/// decoded by `tables` into one record each, one component per column in
/// column order. Plain leaves either start a new record or, with
/// `auto_merge`, join the record first created for their exact shape; the
/// joining leaf contributes a component named after the leaf itself, not a
/// new output entry.
///
/// The returned sequence is in first-creation order: a record keeps the
/// position of the leaf that created it no matter how many later leaves
/// merge in. Any failure aborts the run; no partial sequence is returned.
pub fn build_records<G, R>(
    root: &G,
    label_base: &str,
    options: &ExtractOptions,
    tables: &R,
) -> Result<Vec<Dataset>, ExtractError>
where
    G: GroupHandle,
    R: TableReader<G::Leaf>,
{
    let mut records: Vec<Dataset> = Vec::new();
    let mut by_shape: HashMap<Vec<usize>, usize> = HashMap::new();

    for entry in collect_leaves(root)? {
        if !options.use_datasets.selects(&entry.path) {
            continue;
        }
        let label = format!("{label_base}[{}]", entry.path);

        match entry.kind {
            ElementKind::Structured => {
                let columns =
                    tables
                        .read_table(&entry.leaf)
                        .map_err(|cause| ExtractError::TabularRead {
                            path: entry.path.clone(),
                            cause,
                        })?;
                let mut data = Dataset::new(label);
                for column in columns {
                    let component = Component {
                        values: column.values,
                        unit: column.unit,
                    };
                    data.add_component(column.name, component);
                }
                records.push(data);
            }
            ElementKind::Float | ElementKind::Integer => {
                let values = entry.leaf.read().map_err(|cause| ExtractError::DatasetRead {
                    path: entry.path.clone(),
                    cause,
                })?;

                let existing = if options.auto_merge {
                    by_shape.get(&entry.shape).copied()
                } else {
                    None
                };
                let target = match existing {
                    Some(idx) => {
                        log::debug!("merging '{}' into '{}'", entry.path, records[idx].label);
                        idx
                    }
                    None => {
                        records.push(Dataset::new(label));
                        by_shape.insert(entry.shape.clone(), records.len() - 1);
                        records.len() - 1
                    }
                };

                // Component labels use the leaf's own name; when two
                // same-named leaves merge, the later one keeps its full path
                // so neither is overwritten.
                let record = &mut records[target];
                let component_label = if record.component(&entry.name).is_some() {
                    entry.path.clone()
                } else {
                    entry.name.clone()
                };
                record.add_component(component_label, Component::new(values));
            }
            ElementKind::Other => {}
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_base_drops_the_extension() {
        assert_eq!(label_base_for(Path::new("/data/run42.h5")), "run42");
        assert_eq!(label_base_for(Path::new("archive.tar.h5")), "archive.tar");
    }

    #[test]
    fn selection_matches_exact_paths() {
        let sel = DatasetSelection::Paths(vec!["/a/b".into()]);
        assert!(sel.selects("/a/b"));
        assert!(!sel.selects("/a"));
        assert!(DatasetSelection::All.selects("/anything"));
    }

    #[test]
    fn default_options_take_everything_unmerged() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.use_datasets, DatasetSelection::All);
        assert!(!opts.auto_merge);
    }
}
