//! The comparison engine.
//!
//! Two values are walked together depth-first. Records are compared field by
//! field in schema order, sequences element by element after alignment, and
//! scalars by equality. Boundary records get a node of their own; everything
//! else is folded into the nearest enclosing node.

use std::collections::BTreeSet;

use log::{debug, trace};

use super::align::align;
use super::identity::identity_key;
use super::reconcile::{reconcile, Reconciled};
use super::tree::{ComparisonNode, DifferenceTree};
use crate::schema::Schema;
use crate::value::{Value, ValueType};

/// Compares `source` against `target`.
///
/// Both values are expected to be roots of documents of the same schema. The
/// comparison never fails: values of incompatible types are reported as a
/// difference instead.
pub fn compare<'a>(schema: &'a Schema, source: &'a Value, target: &'a Value) -> DifferenceTree<'a> {
    let root_type = match reconcile(Some(source), Some(target)) {
        Reconciled::Common(value_type) => Some(value_type),
        _ => None,
    };
    let label = root_type
        .as_ref()
        .unwrap_or(&source.value_type())
        .to_string();
    debug!("comparing documents of type {}", label);

    let engine = Engine {
        schema,
        root_type: root_type.clone(),
    };
    let mut root = ComparisonNode::new(label, Some(source), Some(target));
    match root_type {
        Some(ref value_type) => {
            let outcome = engine.compare_contents(None, value_type, Some(source), Some(target));
            root.differs = outcome.differs;
            root.children = outcome.nodes;
        }
        None => root.differs = true,
    }

    let tree = DifferenceTree::new(root);
    debug!(
        "comparison finished: {} nodes, documents {}",
        tree.len(),
        if tree.differs() { "differ" } else { "are equal" }
    );
    tree
}

/// Outcome of comparing one pair of values: whether anything differs, and the
/// boundary nodes to attach to the nearest enclosing node.
#[derive(Debug, Default)]
struct Outcome<'a> {
    differs: bool,
    nodes: Vec<ComparisonNode<'a>>,
}

impl<'a> Outcome<'a> {
    fn different() -> Self {
        Outcome {
            differs: true,
            nodes: Vec::new(),
        }
    }

    fn absorb(&mut self, other: Outcome<'a>) {
        self.differs |= other.differs;
        self.nodes.extend(other.nodes);
    }
}

struct Engine<'a> {
    schema: &'a Schema,
    /// Values of the document root type never get a nested node.
    root_type: Option<ValueType>,
}

impl<'a> Engine<'a> {
    fn compare_into(
        &self,
        field: Option<&'a str>,
        source: Option<&'a Value>,
        target: Option<&'a Value>,
    ) -> Outcome<'a> {
        let value_type = match reconcile(source, target) {
            Reconciled::Absent => return Outcome::default(),
            Reconciled::Mismatch { source, target } => {
                trace!(
                    "type mismatch at {}: {} vs {}",
                    field.unwrap_or("<element>"),
                    source,
                    target
                );
                return Outcome::different();
            }
            Reconciled::Common(value_type) => value_type,
        };

        if !self.is_boundary(&value_type) {
            return self.compare_contents(field, &value_type, source, target);
        }

        let inner = self.compare_contents(field, &value_type, source, target);
        let mut node = ComparisonNode::new(self.label(&value_type, source, target), source, target);
        node.originating_field = field;
        node.differs = inner.differs;
        node.children = inner.nodes;
        Outcome {
            differs: node.differs,
            nodes: vec![node],
        }
    }

    fn compare_contents(
        &self,
        field: Option<&'a str>,
        value_type: &ValueType,
        source: Option<&'a Value>,
        target: Option<&'a Value>,
    ) -> Outcome<'a> {
        match value_type {
            ValueType::Record(type_name) => self.compare_records(type_name, source, target),
            ValueType::Sequence(_) => {
                let mut outcome = Outcome::default();
                let aligned = align(
                    self.schema,
                    source.and_then(Value::as_sequence),
                    target.and_then(Value::as_sequence),
                );
                for (s, t) in aligned.pairs() {
                    outcome.absorb(self.compare_into(field, s, t));
                }
                outcome
            }
            ValueType::Boolean | ValueType::Number | ValueType::String => Outcome {
                differs: source != target,
                nodes: Vec::new(),
            },
        }
    }

    fn compare_records(
        &self,
        type_name: &str,
        source: Option<&'a Value>,
        target: Option<&'a Value>,
    ) -> Outcome<'a> {
        let source = source.and_then(Value::as_record);
        let target = target.and_then(Value::as_record);

        let schema: &'a Schema = self.schema;
        let fields: Vec<&'a str> = match schema.record(type_name) {
            Some(definition) => definition.fields.iter().map(|f| f.name.as_str()).collect(),
            None => {
                // Unknown to the schema: fall back to every field either side holds.
                let names: BTreeSet<&'a str> = source
                    .into_iter()
                    .chain(target)
                    .flat_map(|r| r.fields.keys().map(String::as_str))
                    .collect();
                names.into_iter().collect()
            }
        };

        let mut outcome = Outcome::default();
        for name in fields {
            let s = source.and_then(|r| r.get(name));
            let t = target.and_then(|r| r.get(name));
            outcome.absorb(self.compare_into(Some(name), s, t));
        }
        outcome
    }

    fn is_boundary(&self, value_type: &ValueType) -> bool {
        match value_type {
            ValueType::Record(name) => {
                self.root_type.as_ref() != Some(value_type)
                    && self.schema.record(name).is_some_and(|r| r.boundary)
            }
            _ => false,
        }
    }

    /// Labels a boundary node: the comparison-name field, then the identity,
    /// then the type name. Source is preferred over target.
    fn label(&self, value_type: &ValueType, source: Option<&Value>, target: Option<&Value>) -> String {
        let definition = match value_type {
            ValueType::Record(name) => self.schema.record(name),
            _ => None,
        };
        let from_field = |field: Option<&str>| {
            field.and_then(|field| {
                source
                    .and_then(|v| identity_key(v, field))
                    .or_else(|| target.and_then(|v| identity_key(v, field)))
            })
        };

        definition
            .and_then(|d| {
                from_field(d.comparison_name.as_deref())
                    .or_else(|| from_field(d.identity_field()))
            })
            .unwrap_or_else(|| value_type.to_string())
    }
}
