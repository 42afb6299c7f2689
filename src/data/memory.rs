use std::cell::RefCell;
use std::rc::Rc;

use arrow::record_batch::RecordBatch;

use crate::data::model::{ElementKind, ValueArray};
use crate::data::source::{BoxError, Child, GroupHandle, LeafHandle};

// ---------------------------------------------------------------------------
// In-memory source backend
// ---------------------------------------------------------------------------

/// A group node of the in-memory container. Cheap to clone (shared handle to
/// the same underlying node), which also makes hard links expressible: the
/// same group attached under two names reports one `address()`.
#[derive(Clone)]
pub struct MemoryGroup {
    inner: Rc<GroupInner>,
}

#[derive(Default)]
struct GroupInner {
    children: RefCell<Vec<(String, MemoryNode)>>,
}

#[derive(Clone)]
enum MemoryNode {
    Group(MemoryGroup),
    Leaf(MemoryLeaf),
}

/// A leaf node of the in-memory container.
#[derive(Clone, Debug)]
pub struct MemoryLeaf {
    inner: Rc<LeafInner>,
}

#[derive(Debug)]
enum LeafInner {
    /// Scalar numeric data, already materialized.
    Plain { kind: ElementKind, data: ValueArray },
    /// Tabular rows, held as an Arrow record batch.
    Structured { batch: RecordBatch },
    /// Ineligible element type (strings, references, ...). Never extracted.
    Opaque { shape: Vec<usize> },
}

impl MemoryGroup {
    /// A fresh, empty root group.
    pub fn root() -> Self {
        MemoryGroup {
            inner: Rc::new(GroupInner::default()),
        }
    }

    /// Create an empty subgroup under `name` and return its handle.
    pub fn add_group(&self, name: &str) -> MemoryGroup {
        let group = MemoryGroup::root();
        self.inner
            .children
            .borrow_mut()
            .push((name.to_string(), MemoryNode::Group(group.clone())));
        group
    }

    /// Attach an existing group under another name (a hard link). Linking a
    /// group into its own subtree creates a cycle, which extraction rejects.
    pub fn link_group(&self, name: &str, target: &MemoryGroup) {
        self.inner
            .children
            .borrow_mut()
            .push((name.to_string(), MemoryNode::Group(target.clone())));
    }

    /// Add a floating-point leaf.
    pub fn add_floats(&self, name: &str, shape: Vec<usize>, values: Vec<f64>) {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        self.add_leaf(
            name,
            LeafInner::Plain {
                kind: ElementKind::Float,
                data: ValueArray::floats(shape, values),
            },
        );
    }

    /// Add an integer leaf.
    pub fn add_ints(&self, name: &str, shape: Vec<usize>, values: Vec<i64>) {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        self.add_leaf(
            name,
            LeafInner::Plain {
                kind: ElementKind::Integer,
                data: ValueArray::integers(shape, values),
            },
        );
    }

    /// Add a structured (tabular) leaf backed by an Arrow record batch.
    pub fn add_table(&self, name: &str, batch: RecordBatch) {
        self.add_leaf(name, LeafInner::Structured { batch });
    }

    /// Add a leaf with an ineligible element type; it is visible to the
    /// source but never extracted.
    pub fn add_opaque(&self, name: &str, shape: Vec<usize>) {
        self.add_leaf(name, LeafInner::Opaque { shape });
    }

    fn add_leaf(&self, name: &str, inner: LeafInner) {
        let leaf = MemoryLeaf {
            inner: Rc::new(inner),
        };
        self.inner
            .children
            .borrow_mut()
            .push((name.to_string(), MemoryNode::Leaf(leaf)));
    }
}

impl GroupHandle for MemoryGroup {
    type Leaf = MemoryLeaf;

    fn address(&self) -> u64 {
        Rc::as_ptr(&self.inner) as u64
    }

    fn children(&self) -> Result<Vec<(String, Child<Self, MemoryLeaf>)>, BoxError> {
        let children = self
            .inner
            .children
            .borrow()
            .iter()
            .map(|(name, node)| {
                let child = match node {
                    MemoryNode::Group(g) => Child::Group(g.clone()),
                    MemoryNode::Leaf(l) => Child::Leaf(l.clone()),
                };
                (name.clone(), child)
            })
            .collect();
        Ok(children)
    }
}

impl MemoryLeaf {
    /// The backing record batch, when this leaf is structured.
    pub fn table_batch(&self) -> Option<&RecordBatch> {
        match &*self.inner {
            LeafInner::Structured { batch } => Some(batch),
            _ => None,
        }
    }
}

impl LeafHandle for MemoryLeaf {
    fn element_kind(&self) -> ElementKind {
        match &*self.inner {
            LeafInner::Plain { kind, .. } => *kind,
            LeafInner::Structured { .. } => ElementKind::Structured,
            LeafInner::Opaque { .. } => ElementKind::Other,
        }
    }

    fn shape(&self) -> Vec<usize> {
        match &*self.inner {
            LeafInner::Plain { data, .. } => data.shape.clone(),
            LeafInner::Structured { batch } => vec![batch.num_rows()],
            LeafInner::Opaque { shape } => shape.clone(),
        }
    }

    fn read(&self) -> Result<ValueArray, BoxError> {
        match &*self.inner {
            LeafInner::Plain { data, .. } => Ok(data.clone()),
            LeafInner::Structured { .. } => {
                Err("structured dataset must be read through a table reader".into())
            }
            LeafInner::Opaque { .. } => Err("dataset element type is not readable".into()),
        }
    }
}
