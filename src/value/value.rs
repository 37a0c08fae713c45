//! Core value types.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Value is one node of a typed object graph: a scalar, a record or a
/// sequence. Absence is expressed with `Option<Value>` at the slot holding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Primitive),
    Record(Record),
    Sequence(Sequence),
}

/// Primitive is an opaque leaf value compared by equality.
///
/// Integers beyond `i64::MAX` are held as `UInt` so that no precision is lost.
/// Floats compare with IEEE equality except that NaN equals NaN, which keeps
/// every value equal to itself.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Primitive {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Primitive::Bool(a), Primitive::Bool(b)) => a == b,
            (Primitive::Int(a), Primitive::Int(b)) => a == b,
            (Primitive::UInt(a), Primitive::UInt(b)) => a == b,
            (Primitive::Float(a), Primitive::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Primitive::String(a), Primitive::String(b)) => a == b,
            _ => false,
        }
    }
}

/// Record is an instance of a named record type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    #[serde(skip)]
    pub type_name: String,
    /// Fields present on this instance. A field missing here is absent.
    pub fields: BTreeMap<String, Value>,
}

/// Sequence is an ordered collection of values of one element type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sequence {
    /// Named record type of the elements; None for primitives and nested
    /// sequences.
    #[serde(skip)]
    pub element_type: Option<String>,
    pub items: Vec<Value>,
}

/// ValueType is the runtime type of a value. Two values are only compared
/// structurally when their runtime types are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Number,
    String,
    Record(String),
    Sequence(Option<String>),
}

impl Value {
    /// Returns the runtime type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Scalar(Primitive::Bool(_)) => ValueType::Boolean,
            Value::Scalar(Primitive::Int(_) | Primitive::UInt(_) | Primitive::Float(_)) => {
                ValueType::Number
            }
            Value::Scalar(Primitive::String(_)) => ValueType::String,
            Value::Record(r) => ValueType::Record(r.type_name.clone()),
            Value::Sequence(s) => ValueType::Sequence(s.element_type.clone()),
        }
    }

    pub fn as_scalar(&self) -> Option<&Primitive> {
        match self {
            Value::Scalar(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Primitive::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl Record {
    /// Creates an empty record of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Record {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Sequence {
    /// Creates a sequence of primitives or nested sequences.
    pub fn new(items: Vec<Value>) -> Self {
        Sequence {
            element_type: None,
            items,
        }
    }

    /// Creates a sequence of records of the named type.
    pub fn of_records(element_type: impl Into<String>, items: Vec<Value>) -> Self {
        Sequence {
            element_type: Some(element_type.into()),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(b) => write!(f, "{}", b),
            Primitive::Int(i) => write!(f, "{}", i),
            Primitive::UInt(u) => write!(f, "{}", u),
            Primitive::Float(x) => write!(f, "{}", x),
            Primitive::String(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Number => write!(f, "number"),
            ValueType::String => write!(f, "string"),
            ValueType::Record(name) => write!(f, "{}", name),
            ValueType::Sequence(Some(name)) => write!(f, "sequence<{}>", name),
            ValueType::Sequence(None) => write!(f, "sequence"),
        }
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        Value::Scalar(p)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Sequence> for Value {
    fn from(s: Sequence) -> Self {
        Value::Sequence(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Primitive::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Primitive::Int(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Scalar(Primitive::UInt(u))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(Primitive::Float(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Primitive::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Primitive::String(s))
    }
}
