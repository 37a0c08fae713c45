//! Parser for creating typed values from YAML schemas and documents.

use serde_yaml::Value as YamlValue;

use super::errors::{DecodeError, DecodeErrors, ParseError};
use crate::schema::{Atom, Record as RecordDef, Scalar, Schema, Sequence as SequenceDef, TypeRef};
use crate::value::{Primitive, Record, Sequence, Value};

/// Parser holds a schema and hands out ParseableTypes for its named types.
#[derive(Debug, Clone)]
pub struct Parser {
    pub schema: Schema,
}

impl Parser {
    /// Creates a new parser from a YAML schema string.
    pub fn new(schema_yaml: &str) -> Result<Parser, ParseError> {
        let schema: Schema = serde_yaml::from_str(schema_yaml).map_err(ParseError::Schema)?;
        Ok(Parser { schema })
    }

    /// Returns the list of type names in this schema.
    pub fn type_names(&self) -> Vec<&str> {
        self.schema.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Returns a ParseableType helper for the given type name.
    pub fn type_by_name(&self, name: &str) -> ParseableType {
        ParseableType {
            schema: self.schema.clone(),
            type_ref: TypeRef::named(name),
        }
    }
}

/// ParseableType decodes documents into values of one schema type.
#[derive(Debug, Clone)]
pub struct ParseableType {
    pub schema: Schema,
    pub type_ref: TypeRef,
}

impl ParseableType {
    /// Returns true if the type is valid in the schema.
    pub fn is_valid(&self) -> bool {
        self.schema.resolve(&self.type_ref).is_some()
    }

    /// Parses a YAML (or JSON) string into a Value.
    pub fn from_yaml(&self, yaml: &str) -> Result<Value, ParseError> {
        let node: YamlValue = serde_yaml::from_str(yaml).map_err(ParseError::Syntax)?;
        self.from_yaml_value(&node)
    }

    /// Decodes an already parsed YAML node into a Value.
    pub fn from_yaml_value(&self, node: &YamlValue) -> Result<Value, ParseError> {
        let mut decoder = Decoder {
            schema: &self.schema,
            errors: DecodeErrors::new(),
        };
        let value = decoder.decode(node, &self.type_ref, "");

        if !decoder.errors.is_empty() {
            return Err(ParseError::Decode(decoder.errors));
        }
        value.ok_or(ParseError::Empty)
    }
}

/// Walks a YAML node alongside its schema type, producing a Value and
/// collecting every mismatch it encounters.
struct Decoder<'s> {
    schema: &'s Schema,
    errors: DecodeErrors,
}

impl<'s> Decoder<'s> {
    fn decode(&mut self, node: &YamlValue, type_ref: &TypeRef, path: &str) -> Option<Value> {
        let schema = self.schema;
        let atom = match schema.resolve(type_ref) {
            Some(atom) => atom,
            None => {
                if let Some(ref name) = type_ref.named_type {
                    self.errors.add(DecodeError::schema_error(format!(
                        "no type found matching: {}",
                        name
                    )));
                }
                return None;
            }
        };

        match node {
            YamlValue::Null => None,
            YamlValue::Tagged(tagged) => self.decode(&tagged.value, type_ref, path),
            YamlValue::Mapping(mapping) => match atom.record {
                Some(ref record) => self.decode_record(mapping, record, type_ref, path),
                None => self.mismatch(path, atom, "map"),
            },
            YamlValue::Sequence(items) => match atom.sequence {
                Some(ref sequence) => self.decode_sequence(items, sequence, path),
                None => self.mismatch(path, atom, "list"),
            },
            scalar => match atom.scalar {
                Some(kind) => self.decode_scalar(scalar, kind, path),
                None => self.mismatch(path, atom, yaml_type_name(scalar)),
            },
        }
    }

    fn decode_scalar(&mut self, node: &YamlValue, kind: Scalar, path: &str) -> Option<Value> {
        let primitive = match (node, kind) {
            (YamlValue::Bool(b), Scalar::Boolean | Scalar::Untyped) => Primitive::Bool(*b),
            (YamlValue::Number(n), Scalar::Numeric | Scalar::Untyped) => {
                if let Some(i) = n.as_i64() {
                    Primitive::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Primitive::UInt(u)
                } else {
                    Primitive::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            (YamlValue::String(s), Scalar::String | Scalar::Untyped) => {
                Primitive::String(s.clone())
            }
            _ => {
                let expected = match kind {
                    Scalar::Numeric => "numeric",
                    Scalar::String => "string",
                    Scalar::Boolean => "boolean",
                    Scalar::Untyped => "scalar",
                };
                self.errors.add(DecodeError::type_mismatch(
                    display_path(path),
                    expected,
                    yaml_type_name(node),
                ));
                return None;
            }
        };
        Some(Value::Scalar(primitive))
    }

    fn decode_record(
        &mut self,
        mapping: &serde_yaml::Mapping,
        definition: &RecordDef,
        type_ref: &TypeRef,
        path: &str,
    ) -> Option<Value> {
        let type_name = match type_ref.named_type {
            Some(ref name) => name.clone(),
            None => {
                self.errors.add(DecodeError::schema_error(format!(
                    "{}: record types must be named",
                    display_path(path)
                )));
                return None;
            }
        };

        let mut record = Record::new(type_name);
        for (key, node) in mapping {
            let key = match key {
                YamlValue::String(s) => s,
                _ => {
                    self.errors.add(DecodeError::NonStringKey {
                        path: display_path(path),
                    });
                    continue;
                }
            };

            let field = match definition.find_field(key) {
                Some(field) => field,
                None => {
                    self.errors
                        .add(DecodeError::unknown_field(display_path(path), key.clone()));
                    continue;
                }
            };

            let field_path = format!("{}.{}", path, key);
            if let Some(value) = self.decode(node, &field.field_type, &field_path) {
                record.fields.insert(key.clone(), value);
            }
        }
        Some(Value::Record(record))
    }

    fn decode_sequence(
        &mut self,
        items: &[YamlValue],
        definition: &SequenceDef,
        path: &str,
    ) -> Option<Value> {
        let element_type = definition.element_type.named_type.clone().filter(|name| {
            self.schema
                .find_named_type(name)
                .is_some_and(|t| t.atom.is_record())
        });

        let mut values = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            if item.is_null() {
                self.errors.add(DecodeError::NullElement {
                    path: display_path(&item_path),
                });
                continue;
            }
            if let Some(value) = self.decode(item, &definition.element_type, &item_path) {
                values.push(value);
            }
        }

        Some(Value::Sequence(Sequence {
            element_type,
            items: values,
        }))
    }

    fn mismatch(&mut self, path: &str, atom: &Atom, actual: &str) -> Option<Value> {
        let mut expected = Vec::new();
        if atom.is_scalar() {
            expected.push("scalar");
        }
        if atom.is_record() {
            expected.push("map");
        }
        if atom.is_sequence() {
            expected.push("list");
        }
        self.errors.add(DecodeError::type_mismatch(
            display_path(path),
            expected.join(" or "),
            actual,
        ));
        None
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        ".".to_string()
    } else {
        path.to_string()
    }
}

fn yaml_type_name(node: &YamlValue) -> &'static str {
    match node {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "boolean",
        YamlValue::Number(n) if n.is_f64() => "float",
        YamlValue::Number(_) => "int",
        YamlValue::String(_) => "string",
        YamlValue::Sequence(_) => "list",
        YamlValue::Mapping(_) => "map",
        YamlValue::Tagged(_) => "tagged",
    }
}
