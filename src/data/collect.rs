use std::collections::HashSet;

use crate::data::model::ElementKind;
use crate::data::source::{Child, GroupHandle, LeafHandle};
use crate::error::ExtractError;

// ---------------------------------------------------------------------------
// Leaf collection: hierarchy → flat, traversal-ordered leaf list
// ---------------------------------------------------------------------------

/// One leaf found while walking the hierarchy.
#[derive(Debug)]
pub struct LeafEntry<L> {
    /// Fully-qualified, '/'-delimited path from the root. Unique by
    /// construction.
    pub path: String,
    /// Last path segment (the leaf's own name).
    pub name: String,
    pub kind: ElementKind,
    pub shape: Vec<usize>,
    pub leaf: L,
}

/// Walk the hierarchy under `root` and return every leaf whose element kind
/// is eligible (float, integer or structured), in traversal order: source
/// child order, depth-first, descending into a subgroup at its position in
/// the child list.
///
/// Uses an explicit work-stack so container depth cannot exhaust the call
/// stack, and a visited set keyed by group identity so a hard-link cycle
/// fails with [`ExtractError::MalformedHierarchy`] instead of looping.
pub fn collect_leaves<G: GroupHandle>(root: &G) -> Result<Vec<LeafEntry<G::Leaf>>, ExtractError> {
    let mut out = Vec::new();
    let mut visited: HashSet<u64> = HashSet::new();
    visited.insert(root.address());

    // Stack of (group path prefix, remaining children of that group).
    let mut stack = vec![(String::new(), children_of(root, "/")?.into_iter())];

    while !stack.is_empty() {
        let (prefix, entry) = {
            let top = stack.last_mut().unwrap();
            match top.1.next() {
                Some(child) => (top.0.clone(), child),
                None => {
                    stack.pop();
                    continue;
                }
            }
        };

        let (name, node) = entry;
        let path = format!("{prefix}/{name}");
        match node {
            Child::Group(group) => {
                if !visited.insert(group.address()) {
                    return Err(ExtractError::MalformedHierarchy {
                        path,
                        reason: "cyclic link revisits a group".into(),
                    });
                }
                let children = children_of(&group, &path)?;
                stack.push((path, children.into_iter()));
            }
            Child::Leaf(leaf) => {
                let kind = leaf.element_kind();
                if kind.is_eligible() {
                    out.push(LeafEntry {
                        path,
                        name,
                        kind,
                        shape: leaf.shape(),
                        leaf,
                    });
                }
            }
        }
    }

    log::debug!("collected {} eligible leaves", out.len());
    Ok(out)
}

fn children_of<G: GroupHandle>(
    group: &G,
    path: &str,
) -> Result<Vec<(String, Child<G, G::Leaf>)>, ExtractError> {
    group
        .children()
        .map_err(|e| ExtractError::MalformedHierarchy {
            path: path.to_string(),
            reason: e.to_string(),
        })
}
