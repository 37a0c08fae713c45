//! Core schema elements and type definitions.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Schema is a list of named types.
///
/// Schema types are indexed in a map before the first search so this type
/// should be considered immutable.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDef>,

    #[serde(skip)]
    type_map: OnceCell<HashMap<String, usize>>,
}

impl Clone for Schema {
    fn clone(&self) -> Self {
        Schema::with_types(self.types.clone())
    }
}

/// TypeDef represents a named type in a schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDef {
    /// Every type must have a unique name. Record values carry this name as
    /// their runtime type.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(flatten)]
    pub atom: Atom,
}

/// TypeRef either refers to a named type or declares an inlined type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRef {
    /// Reference to named type in schema.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "namedType")]
    pub named_type: Option<String>,

    /// Inline type definition.
    #[serde(flatten)]
    pub inlined: Box<Atom>,
}

/// Atom represents the smallest possible pieces of the type system.
///
/// Each set field is a possible shape for the value; a document node is
/// decoded with whichever alternative matches its shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Atom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Sequence>,
}

/// Scalar (AKA "primitive") represents a type which has a single value which is
/// either numeric, string, or boolean, or untyped for any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scalar {
    Numeric,
    String,
    Boolean,
    Untyped,
}

/// Record is a type composed of a fixed, ordered list of named fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Each field appears exactly once in this list. The order is the order
    /// in which fields are compared.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<StructField>,

    /// Name of the scalar field holding the record's identity key, unique
    /// within a containing sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    /// Name of the field whose value labels this record in a comparison tree.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "comparisonName"
    )]
    pub comparison_name: Option<String>,

    /// Boundary records get their own node in a comparison tree.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub boundary: bool,

    #[serde(skip)]
    field_map: OnceCell<HashMap<String, usize>>,
}

/// StructField pairs a field name with a field type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructField {
    /// Name is the field name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Type is the field type.
    #[serde(default, rename = "type")]
    pub field_type: TypeRef,
}

/// Sequence represents a type which contains zero or more elements, all of the
/// same subtype.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sequence {
    /// ElementType is the type of the sequence's elements.
    #[serde(default, rename = "elementType")]
    pub element_type: TypeRef,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Schema::default()
    }

    /// Creates a schema with the given type definitions.
    pub fn with_types(types: Vec<TypeDef>) -> Self {
        Schema {
            types,
            type_map: OnceCell::new(),
        }
    }

    /// Returns the referenced TypeDef, if it exists.
    pub fn find_named_type(&self, name: &str) -> Option<&TypeDef> {
        let map = self.type_map.get_or_init(|| {
            self.types
                .iter()
                .enumerate()
                .map(|(i, t)| (t.name.clone(), i))
                .collect()
        });
        map.get(name).map(|&i| &self.types[i])
    }

    /// Returns the atom referenced, whether it is inline or named.
    /// Returns None if a named reference can't be resolved.
    pub fn resolve<'a>(&'a self, tr: &'a TypeRef) -> Option<&'a Atom> {
        match tr.named_type {
            Some(ref named) => self.find_named_type(named).map(|t| &t.atom),
            None => Some(&tr.inlined),
        }
    }

    /// Returns the record definition of the named type, if it is a record.
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.find_named_type(name)
            .and_then(|t| t.atom.record.as_ref())
    }
}

impl TypeRef {
    /// Creates a reference to a named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef {
            named_type: Some(name.into()),
            ..Default::default()
        }
    }

    /// Creates an inlined scalar type.
    pub fn scalar(scalar: Scalar) -> Self {
        TypeRef {
            named_type: None,
            inlined: Box::new(Atom {
                scalar: Some(scalar),
                ..Default::default()
            }),
        }
    }

    /// Creates an inlined sequence of the given element type.
    pub fn sequence_of(element_type: TypeRef) -> Self {
        TypeRef {
            named_type: None,
            inlined: Box::new(Atom {
                sequence: Some(Sequence { element_type }),
                ..Default::default()
            }),
        }
    }
}

impl Record {
    /// Creates a new Record with the given fields.
    pub fn with_fields(fields: Vec<StructField>) -> Self {
        Record {
            fields,
            ..Default::default()
        }
    }

    /// Returns the referenced StructField, if it exists.
    pub fn find_field(&self, name: &str) -> Option<&StructField> {
        let map = self.field_map.get_or_init(|| {
            self.fields
                .iter()
                .enumerate()
                .map(|(i, f)| (f.name.clone(), i))
                .collect()
        });
        map.get(name).map(|&i| &self.fields[i])
    }

    /// Returns the name of the identity field, if records of this type can be
    /// correlated by identity.
    pub fn identity_field(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

impl StructField {
    /// Creates a new field.
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        StructField {
            name: name.into(),
            field_type,
        }
    }
}

impl Atom {
    /// Returns true if this atom can represent a scalar.
    pub fn is_scalar(&self) -> bool {
        self.scalar.is_some()
    }

    /// Returns true if this atom can represent a record.
    pub fn is_record(&self) -> bool {
        self.record.is_some()
    }

    /// Returns true if this atom can represent a sequence.
    pub fn is_sequence(&self) -> bool {
        self.sequence.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"types:
- name: solution
  record:
    fields:
    - name: entities
      type:
        sequence:
          elementType:
            namedType: entity
- name: entity
  record:
    identity: name
    comparisonName: displayName
    boundary: true
    fields:
    - name: name
      type:
        scalar: string
    - name: displayName
      type:
        scalar: string
"#;

    #[test]
    fn test_scalar_serialization() {
        assert_eq!(
            serde_json::to_string(&Scalar::Numeric).unwrap(),
            "\"numeric\""
        );
        assert_eq!(
            serde_json::to_string(&Scalar::Untyped).unwrap(),
            "\"untyped\""
        );
    }

    #[test]
    fn test_schema_from_yaml() {
        let schema: Schema = serde_yaml::from_str(SCHEMA).unwrap();
        assert_eq!(schema.types.len(), 2);

        let entity = schema.record("entity").unwrap();
        assert_eq!(entity.identity_field(), Some("name"));
        assert_eq!(entity.comparison_name.as_deref(), Some("displayName"));
        assert!(entity.boundary);

        let solution = schema.record("solution").unwrap();
        assert!(!solution.boundary);
        assert!(solution.identity_field().is_none());
    }

    #[test]
    fn test_schema_find_named_type() {
        let schema = Schema::with_types(vec![TypeDef {
            name: "string".to_string(),
            atom: Atom {
                scalar: Some(Scalar::String),
                ..Default::default()
            },
        }]);

        assert!(schema.find_named_type("string").is_some());
        assert!(schema.find_named_type("nonexistent").is_none());
        assert!(schema.record("string").is_none());
    }

    #[test]
    fn test_record_find_field() {
        let record = Record::with_fields(vec![
            StructField::new("name", TypeRef::scalar(Scalar::String)),
            StructField::new("age", TypeRef::scalar(Scalar::Numeric)),
        ]);

        assert!(record.find_field("name").is_some());
        assert!(record.find_field("age").is_some());
        assert!(record.find_field("nonexistent").is_none());
    }

    #[test]
    fn test_schema_resolve() {
        let schema: Schema = serde_yaml::from_str(SCHEMA).unwrap();

        let named = TypeRef::named("entity");
        assert!(schema.resolve(&named).unwrap().is_record());

        let inline = TypeRef::sequence_of(TypeRef::named("entity"));
        assert!(schema.resolve(&inline).unwrap().is_sequence());

        assert!(schema.resolve(&TypeRef::named("missing")).is_none());
    }

    #[test]
    fn test_clone_resets_index() {
        let schema: Schema = serde_yaml::from_str(SCHEMA).unwrap();
        assert!(schema.find_named_type("entity").is_some());
        let copy = schema.clone();
        assert!(copy.find_named_type("solution").is_some());
    }
}
