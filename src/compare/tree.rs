//! Difference tree types.

use serde::Serialize;
use std::fmt;

use crate::value::Value;

/// ComparisonNode is one node of a difference tree.
///
/// A node exists for the root and for every boundary-typed value; everything
/// below a node that is not itself a boundary value is folded into the node's
/// `differs` flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonNode<'a> {
    /// Display name of the node. Cosmetic; never used for comparison.
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'a Value>,
    /// True if this node or anything below it differs.
    pub differs: bool,
    /// Schema field the compared values were read from.
    #[serde(rename = "field", skip_serializing_if = "Option::is_none")]
    pub originating_field: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComparisonNode<'a>>,
}

/// Change classifies a node by which sides hold a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
    Unchanged,
    Modified,
    Added,
    Removed,
}

impl<'a> ComparisonNode<'a> {
    pub fn new(label: impl Into<String>, source: Option<&'a Value>, target: Option<&'a Value>) -> Self {
        ComparisonNode {
            label: label.into(),
            source,
            target,
            differs: false,
            originating_field: None,
            children: Vec::new(),
        }
    }

    /// Returns how this node changed between source and target. A node that
    /// does not differ is unchanged even when one side is absent.
    pub fn change(&self) -> Change {
        if !self.differs {
            return Change::Unchanged;
        }
        match (self.source, self.target) {
            (None, Some(_)) => Change::Added,
            (Some(_), None) => Change::Removed,
            _ => Change::Modified,
        }
    }

    /// Returns a copy of this subtree without unchanged descendants, or None
    /// if this node does not differ.
    pub fn differences(&self) -> Option<ComparisonNode<'a>> {
        if !self.differs {
            return None;
        }
        Some(ComparisonNode {
            label: self.label.clone(),
            source: self.source,
            target: self.target,
            differs: true,
            originating_field: self.originating_field,
            children: self.children.iter().filter_map(|c| c.differences()).collect(),
        })
    }
}

/// DifferenceTree is the result of comparing two documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DifferenceTree<'a> {
    root: ComparisonNode<'a>,
}

impl<'a> DifferenceTree<'a> {
    pub fn new(root: ComparisonNode<'a>) -> Self {
        DifferenceTree { root }
    }

    pub fn root(&self) -> &ComparisonNode<'a> {
        &self.root
    }

    /// Returns true if the two documents differ anywhere.
    pub fn differs(&self) -> bool {
        self.root.differs
    }

    /// Walks the tree depth-first, yielding each node with its depth.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            stack: vec![(0, &self.root)],
        }
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the tree restricted to differing nodes. The root is always kept.
    pub fn differences(&self) -> DifferenceTree<'a> {
        let root = self.root.differences().unwrap_or_else(|| {
            ComparisonNode {
                children: Vec::new(),
                ..self.root.clone()
            }
        });
        DifferenceTree { root }
    }
}

/// Depth-first iterator over a difference tree.
pub struct Iter<'t, 'a> {
    stack: Vec<(usize, &'t ComparisonNode<'a>)>,
}

impl<'t, 'a> Iterator for Iter<'t, 'a> {
    type Item = (usize, &'t ComparisonNode<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

impl fmt::Display for DifferenceTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (depth, node)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let marker = match node.change() {
                Change::Unchanged => ' ',
                Change::Modified => '~',
                Change::Added => '+',
                Change::Removed => '-',
            };
            write!(f, "{:indent$}{} {}", "", marker, node.label, indent = depth * 2)?;
        }
        Ok(())
    }
}
