//! Sequence alignment.
//!
//! Two sequences are brought into a common index space before they are
//! compared element by element. Elements whose type has an identity are
//! joined on that identity, independent of their original order; other
//! elements are paired by position.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use log::{debug, trace, warn};

use super::identity::{identity_field, identity_key};
use crate::schema::Schema;
use crate::value::{Sequence, Value};

/// Alignment pairs `source[i]` with `target[i]` for every index. A `None`
/// marks an element present on one side only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment<'a> {
    pub source: Vec<Option<&'a Value>>,
    pub target: Vec<Option<&'a Value>>,
}

impl<'a> Alignment<'a> {
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Returns the aligned pairs in index order.
    pub fn pairs(&self) -> impl Iterator<Item = (Option<&'a Value>, Option<&'a Value>)> + '_ {
        self.source.iter().copied().zip(self.target.iter().copied())
    }
}

/// Aligns two sequences; either may be absent.
pub fn align<'a>(
    schema: &Schema,
    source: Option<&'a Sequence>,
    target: Option<&'a Sequence>,
) -> Alignment<'a> {
    let element_type = source
        .or(target)
        .and_then(|s| s.element_type.as_deref());

    match identity_field(schema, element_type) {
        Some(field) => align_by_identity(field, items(source), items(target)),
        None => align_by_position(items(source), items(target)),
    }
}

fn items(sequence: Option<&Sequence>) -> &[Value] {
    sequence.map(|s| s.items.as_slice()).unwrap_or(&[])
}

/// Pairs elements by index, padding the shorter side with `None`.
pub fn align_by_position<'a>(source: &'a [Value], target: &'a [Value]) -> Alignment<'a> {
    let len = source.len().max(target.len());
    Alignment {
        source: (0..len).map(|i| source.get(i)).collect(),
        target: (0..len).map(|i| target.get(i)).collect(),
    }
}

/// Slot key of an element in an identity join: the identity key, or for
/// elements without one, their ordinal among the keyless elements of their side.
type Slot = (Option<String>, usize);

/// Joins elements on the identity key read from `field`.
///
/// The output index space is the sorted union of the keys on both sides.
/// Elements without a key sort first and are paired by position among
/// themselves. When a key occurs more than once on one side, the first
/// element holding it wins.
pub fn align_by_identity<'a>(field: &str, source: &'a [Value], target: &'a [Value]) -> Alignment<'a> {
    let source_by_key = index_by_identity(field, source, "source");
    let target_by_key = index_by_identity(field, target, "target");

    let keys: BTreeSet<&Slot> = source_by_key.keys().chain(target_by_key.keys()).collect();
    trace!(
        "aligned {} source and {} target elements on '{}' into {} slots",
        source.len(),
        target.len(),
        field,
        keys.len()
    );

    Alignment {
        source: keys.iter().map(|k| source_by_key.get(*k).copied()).collect(),
        target: keys.iter().map(|k| target_by_key.get(*k).copied()).collect(),
    }
}

fn index_by_identity<'a>(field: &str, items: &'a [Value], side: &str) -> HashMap<Slot, &'a Value> {
    let mut by_key = HashMap::with_capacity(items.len());
    let mut keyless = 0;
    for item in items {
        let slot = match identity_key(item, field) {
            Some(key) => (Some(key), 0),
            None => {
                keyless += 1;
                (None, keyless - 1)
            }
        };
        match by_key.entry(slot) {
            Entry::Vacant(entry) => {
                entry.insert(item);
            }
            Entry::Occupied(entry) => {
                warn!(
                    "duplicate identity {:?} in {} sequence; only the first element is compared",
                    entry.key().0,
                    side
                );
            }
        }
    }
    if keyless > 0 {
        debug!(
            "{} {} elements have no '{}'; pairing them by position",
            keyless, side, field
        );
    }
    by_key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    const SCHEMA: &str = r#"types:
- name: entity
  record:
    identity: id
    fields:
    - name: id
      type:
        scalar: string
    - name: v
      type:
        scalar: numeric
"#;

    fn schema() -> Schema {
        serde_yaml::from_str(SCHEMA).unwrap()
    }

    fn entity(id: &str, v: i64) -> Value {
        Record::new("entity").with("id", id).with("v", v).into()
    }

    fn ids(side: &[Option<&Value>]) -> Vec<Option<String>> {
        side.iter()
            .copied()
            .map(|v| v.and_then(|v| identity_key(v, "id")))
            .collect()
    }

    #[test]
    fn test_positional_pads_shorter_side() {
        let source = Sequence::new(vec![1i64.into(), 2i64.into(), 3i64.into()]);
        let target = Sequence::new(vec![3i64.into()]);

        let aligned = align(&schema(), Some(&source), Some(&target));
        assert_eq!(aligned.len(), 3);
        assert_eq!(aligned.source, vec![Some(&source.items[0]), Some(&source.items[1]), Some(&source.items[2])]);
        assert_eq!(aligned.target, vec![Some(&target.items[0]), None, None]);
    }

    #[test]
    fn test_identity_join_ignores_order() {
        let source = Sequence::of_records("entity", vec![entity("b", 2), entity("a", 1)]);
        let target = Sequence::of_records("entity", vec![entity("a", 1), entity("b", 2)]);

        let aligned = align(&schema(), Some(&source), Some(&target));
        let expected = vec![Some("a".to_string()), Some("b".to_string())];
        assert_eq!(ids(&aligned.source), expected);
        assert_eq!(ids(&aligned.target), expected);
    }

    #[test]
    fn test_identity_join_pads_missing_keys() {
        let source = Sequence::of_records("entity", vec![entity("c", 1), entity("a", 1)]);
        let target = Sequence::of_records("entity", vec![entity("b", 1), entity("a", 2)]);

        let aligned = align(&schema(), Some(&source), Some(&target));
        assert_eq!(
            ids(&aligned.source),
            vec![Some("a".to_string()), None, Some("c".to_string())]
        );
        assert_eq!(
            ids(&aligned.target),
            vec![Some("a".to_string()), Some("b".to_string()), None]
        );
        assert_eq!(aligned.target[0], Some(&target.items[1]));
    }

    #[test]
    fn test_identity_join_with_absent_side() {
        let target = Sequence::of_records("entity", vec![entity("b", 1), entity("a", 1)]);

        let aligned = align(&schema(), None, Some(&target));
        assert_eq!(aligned.source, vec![None, None]);
        assert_eq!(
            ids(&aligned.target),
            vec![Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[test]
    fn test_duplicate_identity_first_wins() {
        let source = Sequence::of_records("entity", vec![entity("a", 1), entity("a", 2)]);
        let target = Sequence::of_records("entity", vec![entity("a", 1)]);

        let aligned = align(&schema(), Some(&source), Some(&target));
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned.source, vec![Some(&source.items[0])]);
    }

    #[test]
    fn test_missing_identity_sorts_first() {
        let keyless: Value = Record::new("entity").with("v", 5i64).into();
        let source = Sequence::of_records("entity", vec![entity("a", 1), keyless]);
        let target = Sequence::of_records("entity", vec![entity("a", 1)]);

        let aligned = align(&schema(), Some(&source), Some(&target));
        assert_eq!(aligned.source, vec![Some(&source.items[1]), Some(&source.items[0])]);
        assert_eq!(aligned.target, vec![None, Some(&target.items[0])]);
    }

    #[test]
    fn test_keyless_elements_pair_by_position() {
        let keyless = |v: i64| -> Value { Record::new("entity").with("v", v).into() };
        let source = Sequence::of_records("entity", vec![keyless(1), entity("a", 1), keyless(2)]);
        let target = Sequence::of_records("entity", vec![keyless(1), keyless(3), keyless(4)]);

        let aligned = align(&schema(), Some(&source), Some(&target));
        assert_eq!(
            aligned.source,
            vec![Some(&source.items[0]), Some(&source.items[2]), None, Some(&source.items[1])]
        );
        assert_eq!(
            aligned.target,
            vec![Some(&target.items[0]), Some(&target.items[1]), Some(&target.items[2]), None]
        );
    }

    #[test]
    fn test_both_empty() {
        let aligned = align(&schema(), None, None);
        assert!(aligned.is_empty());
        assert_eq!(aligned.pairs().count(), 0);
    }
}
