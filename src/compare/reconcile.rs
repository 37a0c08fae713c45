//! Type reconciliation for a pair of compared values.

use crate::value::{Value, ValueType};

/// Reconciled is the runtime type governing the comparison of two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// Neither side holds a value; there is nothing to compare.
    Absent,
    /// Both sides share this type, or only one side is present.
    Common(ValueType),
    /// Both sides are present with different runtime types. Comparison stops
    /// here and the pair counts as different.
    Mismatch { source: ValueType, target: ValueType },
}

/// Determines the single runtime type of `source` and `target`.
pub fn reconcile(source: Option<&Value>, target: Option<&Value>) -> Reconciled {
    match (source, target) {
        (None, None) => Reconciled::Absent,
        (Some(v), None) | (None, Some(v)) => Reconciled::Common(v.value_type()),
        (Some(s), Some(t)) => {
            let (source, target) = (s.value_type(), t.value_type());
            if source == target {
                Reconciled::Common(source)
            } else {
                Reconciled::Mismatch { source, target }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    #[test]
    fn test_one_side_absent() {
        let v = Value::from("x");
        assert_eq!(reconcile(Some(&v), None), Reconciled::Common(ValueType::String));
        assert_eq!(reconcile(None, Some(&v)), Reconciled::Common(ValueType::String));
        assert_eq!(reconcile(None, None), Reconciled::Absent);
    }

    #[test]
    fn test_same_type() {
        let a = Value::from(1i64);
        let b = Value::from(2.5);
        assert_eq!(reconcile(Some(&a), Some(&b)), Reconciled::Common(ValueType::Number));
    }

    #[test]
    fn test_mismatch() {
        let a = Value::from(Record::new("entity"));
        let b = Value::from(Record::new("form"));
        assert_eq!(
            reconcile(Some(&a), Some(&b)),
            Reconciled::Mismatch {
                source: ValueType::Record("entity".into()),
                target: ValueType::Record("form".into()),
            }
        );
    }
}
