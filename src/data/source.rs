use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::data::model::{ElementKind, ValueArray};

/// Failure type at the collaborator boundary. Sources and table readers
/// surface whatever their backend produced; the extraction layer wraps it
/// with the offending path.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Source handle traits
// ---------------------------------------------------------------------------

/// One entry of a group's child list: either a subgroup or a leaf dataset.
pub enum Child<G, L> {
    Group(G),
    Leaf(L),
}

/// A group node in a hierarchical container.
///
/// Opening and closing the underlying source is the caller's job, once,
/// after all leaf reads have completed: collect → read-all → release.
/// Traversal itself never mutates or closes the source.
pub trait GroupHandle: Sized {
    type Leaf: LeafHandle;

    /// Stable identity of the underlying object, used to detect cycles.
    /// Containers with hard links can alias one group under several names;
    /// two handles to the same object must report the same address.
    fn address(&self) -> u64;

    /// Children in stable, source-defined order. The order must be the same
    /// every time the same source is walked.
    fn children(&self) -> Result<Vec<(String, Child<Self, Self::Leaf>)>, BoxError>;
}

/// A leaf node: a typed, shaped, readable block of data.
pub trait LeafHandle {
    fn element_kind(&self) -> ElementKind;

    /// Dimension sizes, outermost first.
    fn shape(&self) -> Vec<usize>;

    /// Materialize the leaf's data. Only meaningful for plain (numeric)
    /// leaves; structured leaves are read through a
    /// [`TableReader`](crate::data::table::TableReader) instead.
    fn read(&self) -> Result<ValueArray, BoxError>;
}

// ---------------------------------------------------------------------------
// Container detection
// ---------------------------------------------------------------------------

/// Every container file in this family starts with the same 8-byte signature.
pub const CONTAINER_MAGIC: [u8; 8] = *b"\x89HDF\r\n\x1a\n";

/// Check whether the file at `path` belongs to the hierarchical-container
/// family. Reads at most 8 bytes; a file shorter than that is simply not a
/// container. Never mutates the file.
pub fn is_container(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    let mut head = [0u8; 8];
    let mut filled = 0;
    while filled < head.len() {
        let n = file.read(&mut head[filled..])?;
        if n == 0 {
            return Ok(false);
        }
        filled += n;
    }
    Ok(head == CONTAINER_MAGIC)
}
