//! Declarative structural contracts for tool inputs and outputs.
//!
//! An [`ObjectSchema`] is documentation (every field carries a description
//! that ends up in the tool descriptor), a validator (rendered to JSON Schema
//! and checked with `jsonschema`) and a projector (normalizes upstream
//! payloads to exactly the declared shape).

use crate::error::ToolError;
use jsonschema::{error::ValidationErrorKind, JSONSchema};
use serde_json::{json, Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    /// Accepts any JSON value, passed through untouched.
    Any,
    Array(Box<FieldType>),
    Object(ObjectSchema),
}

impl FieldType {
    pub fn array_of(item: FieldType) -> Self {
        FieldType::Array(Box::new(item))
    }

    fn json_type(&self) -> Option<&'static str> {
        match self {
            FieldType::String => Some("string"),
            FieldType::Number => Some("number"),
            FieldType::Integer => Some("integer"),
            FieldType::Boolean => Some("boolean"),
            FieldType::Any => None,
            FieldType::Array(_) => Some("array"),
            FieldType::Object(_) => Some("object"),
        }
    }

    fn to_json_schema(&self, nullable: bool) -> Value {
        let mut schema = match self {
            FieldType::Array(item) => json!({ "items": item.to_json_schema(false) }),
            FieldType::Object(object) => object.to_json_schema(),
            _ => json!({}),
        };

        if let Some(ty) = self.json_type() {
            schema["type"] = if nullable {
                json!([ty, "null"])
            } else {
                json!(ty)
            };
        }

        schema
    }

    fn project(&self, value: &Value) -> Value {
        match (self, value) {
            (FieldType::Object(object), Value::Object(_)) => object.project(value),
            (FieldType::Array(item), Value::Array(values)) => {
                Value::Array(values.iter().map(|v| item.project(v)).collect())
            }
            _ => value.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-null.
    Required,
    /// May be null; an absent value is normalized to null.
    Nullable,
    /// May be absent, but not null; an absent value stays absent.
    Optional,
}

/// Where an input field travels on the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Query,
    Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    pub presence: Presence,
    pub description: Option<String>,
    pub location: Location,
}

impl Field {
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            presence: Presence::Optional,
            description: None,
            location: Location::Query,
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn any(name: &str) -> Self {
        Self::new(name, FieldType::Any)
    }

    pub fn array(name: &str, item: FieldType) -> Self {
        Self::new(name, FieldType::array_of(item))
    }

    pub fn object(name: &str, schema: ObjectSchema) -> Self {
        Self::new(name, FieldType::Object(schema))
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.presence = Presence::Nullable;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Path fields are substituted into `{name}` placeholders and are
    /// always required.
    pub fn in_path(mut self) -> Self {
        self.location = Location::Path;
        self.presence = Presence::Required;
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = self.ty.to_json_schema(self.presence == Presence::Nullable);
        if let Some(description) = &self.description {
            schema["description"] = json!(description);
        }
        schema
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<Field>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.presence == Presence::Required)
            .map(|f| f.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn compile(&self) -> Result<CompiledSchema, ToolError> {
        let document = self.to_json_schema();
        let inner = JSONSchema::compile(&document)
            .map_err(|e| ToolError::validation("", format!("invalid schema: {}", e)))?;
        Ok(CompiledSchema { inner })
    }

    /// One-shot validation. Callers that validate repeatedly should hold on
    /// to a [`CompiledSchema`] instead.
    pub fn validate(&self, value: &Value) -> Result<(), ToolError> {
        self.compile()?.validate(value)
    }

    /// Reshapes `value` to the declared fields.
    ///
    /// Undeclared properties are dropped, absent arrays become `[]`, absent
    /// nullable fields become `null`. Required fields are never invented, so
    /// a later [`validate`](Self::validate) still reports them. Non-object
    /// input is returned as-is.
    pub fn project(&self, value: &Value) -> Value {
        let Some(object) = value.as_object() else {
            return value.clone();
        };

        let mut projected = Map::new();
        for field in &self.fields {
            match object.get(&field.name) {
                Some(v) => {
                    projected.insert(field.name.clone(), field.ty.project(v));
                }
                None => match (&field.ty, field.presence) {
                    (FieldType::Array(_), _) => {
                        projected.insert(field.name.clone(), Value::Array(Vec::new()));
                    }
                    (_, Presence::Nullable) => {
                        projected.insert(field.name.clone(), Value::Null);
                    }
                    _ => {}
                },
            }
        }

        Value::Object(projected)
    }
}

pub struct CompiledSchema {
    inner: JSONSchema,
}

impl CompiledSchema {
    /// Reports the first violation found.
    pub fn validate(&self, value: &Value) -> Result<(), ToolError> {
        let Err(mut errors) = self.inner.validate(value) else {
            return Ok(());
        };

        match errors.next() {
            Some(error) => {
                let path = match &error.kind {
                    ValidationErrorKind::Required { property } => format!(
                        "{}/{}",
                        error.instance_path,
                        escape_pointer_token(property.as_str().unwrap_or_default())
                    ),
                    _ => error.instance_path.to_string(),
                };
                Err(ToolError::validation(path, error.to_string()))
            }
            None => Ok(()),
        }
    }
}

/// RFC 6901 escaping for a single reference token.
fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema").finish_non_exhaustive()
    }
}
