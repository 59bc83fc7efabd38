use crate::error::ToolError;
use crate::schema::ObjectSchema;
use async_trait::async_trait;
use oms_core::ExecutionContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInput {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolInput {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments: Map::new(),
        }
    }

    /// Wraps a raw payload. Anything but a JSON object (or null, meaning no
    /// arguments) is rejected.
    pub fn from_value(name: &str, payload: Value) -> Result<Self, ToolError> {
        let arguments = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ToolError::validation(
                    "",
                    format!("{} is not of type \"object\"", other),
                ))
            }
        };
        Ok(Self {
            name: name.to_string(),
            arguments,
        })
    }

    pub fn with_argument<T: Serialize>(mut self, key: &str, value: T) -> Result<Self, ToolError> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ToolError::validation(format!("/{}", key), e.to_string()))?;
        self.arguments.insert(key.to_string(), json_value);
        Ok(self)
    }

    pub fn get_argument<T>(&self, key: &str) -> Result<T, ToolError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let path = format!("/{}", key);
        let value = self
            .arguments
            .get(key)
            .ok_or_else(|| ToolError::validation(path.clone(), format!("Argument '{}' not found", key)))?;

        serde_json::from_value(value.clone()).map_err(|e| ToolError::validation(path, e.to_string()))
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.arguments.clone())
    }
}

/// Discovery document for one tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub id: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> &ObjectSchema;
    fn output_schema(&self) -> &ObjectSchema;

    /// Runs the tool once. Implementations make at most one outbound call
    /// and never retry.
    async fn execute(&self, input: ToolInput, ctx: &ExecutionContext) -> Result<Value, ToolError>;

    fn validate_input(&self, input: &ToolInput) -> Result<(), ToolError> {
        if input.name != self.id() {
            return Err(ToolError::validation(
                "",
                format!("Expected tool '{}', got '{}'", self.id(), input.name),
            ));
        }
        self.input_schema().validate(&input.to_value())
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            id: self.id().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema().to_json_schema(),
            output_schema: self.output_schema().to_json_schema(),
        }
    }
}
