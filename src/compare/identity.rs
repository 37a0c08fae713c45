//! Identity lookup for sequence elements.

use crate::schema::Schema;
use crate::value::Value;

/// Returns the identity field of records of `element_type`, or None when the
/// type has no identity capability.
pub fn identity_field<'s>(schema: &'s Schema, element_type: Option<&str>) -> Option<&'s str> {
    element_type
        .and_then(|name| schema.record(name))
        .and_then(|record| record.identity_field())
}

/// Returns the identity key of `value` read from `field`.
///
/// None means the element carries no key: it is not a record, the field is
/// absent, or the field does not hold a scalar.
pub fn identity_key(value: &Value, field: &str) -> Option<String> {
    value
        .as_record()
        .and_then(|record| record.get(field))
        .and_then(Value::as_scalar)
        .map(|key| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Record, Sequence};

    const SCHEMA: &str = r#"types:
- name: entity
  record:
    identity: name
    fields:
    - name: name
      type:
        scalar: untyped
- name: label
  record:
    fields:
    - name: text
      type:
        scalar: string
"#;

    #[test]
    fn test_identity_field() {
        let schema: Schema = serde_yaml::from_str(SCHEMA).unwrap();
        assert_eq!(identity_field(&schema, Some("entity")), Some("name"));
        assert_eq!(identity_field(&schema, Some("label")), None);
        assert_eq!(identity_field(&schema, Some("unknown")), None);
        assert_eq!(identity_field(&schema, None), None);
    }

    #[test]
    fn test_identity_key() {
        let named = Value::from(Record::new("entity").with("name", "account"));
        let numbered = Value::from(Record::new("entity").with("name", 7i64));
        let unnamed = Value::from(Record::new("entity"));
        let nested = Value::from(Record::new("entity").with("name", Sequence::new(vec![])));

        assert_eq!(identity_key(&named, "name"), Some("account".to_string()));
        assert_eq!(identity_key(&numbered, "name"), Some("7".to_string()));
        assert_eq!(identity_key(&unnamed, "name"), None);
        assert_eq!(identity_key(&nested, "name"), None);
        assert_eq!(identity_key(&Value::from("account"), "name"), None);
    }
}
