//! rusty-hive – extract nested typed datasets from hierarchical scientific
//! containers into flat, plot-ready records.
//!
//! A container is an arbitrarily nested tree of named groups holding typed,
//! shaped leaf datasets (numeric arrays or tabular records). Extraction walks
//! the tree, classifies each leaf, and produces an ordered sequence of
//! [`Dataset`] records: tabular leaves become one record each, and numeric
//! leaves sharing a shape can be merged into grouped multi-component records.
//!
//! ```no_run
//! use rusty_hive::{build_records, BatchTableReader, ExtractOptions, MemoryGroup};
//!
//! let root = MemoryGroup::root();
//! root.add_floats("x", vec![3], vec![1.0, 2.0, 3.0]);
//! root.add_ints("y", vec![3], vec![4, 5, 6]);
//!
//! let options = ExtractOptions { auto_merge: true, ..Default::default() };
//! let records = build_records(&root, "run", &options, &BatchTableReader)?;
//! assert_eq!(records.len(), 1); // x and y share shape [3]
//! # Ok::<(), rusty_hive::ExtractError>(())
//! ```
//!
//! The container format itself is reached through the collaborator traits in
//! [`data::source`]; [`MemoryGroup`] is the bundled in-memory backend.
//! Styling of extracted records lives in [`visual`], a separate concern
//! consumed by plotting layers.

pub mod data;
pub mod error;
pub mod visual;

pub use data::collect::{collect_leaves, LeafEntry};
pub use data::extract::{
    build_records, extract_plain, label_base_for, DatasetSelection, ExtractOptions,
};
pub use data::memory::{MemoryGroup, MemoryLeaf};
pub use data::model::{Component, Dataset, ElementKind, ValueArray, Values};
pub use data::source::{is_container, BoxError, Child, GroupHandle, LeafHandle, CONTAINER_MAGIC};
pub use data::table::{BatchTableReader, TableColumn, TableReader};
pub use error::ExtractError;
pub use visual::{AttributeValue, ChangeSink, LineStyle, VisualAttributes, VisualError};
