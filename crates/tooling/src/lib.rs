pub mod error;
pub mod http_tool;
pub mod query;
pub mod registry;
pub mod schema;
pub mod tool;

pub use error::ToolError;
pub use http_tool::{CredentialHeaders, HttpTool, HttpToolSpec};
pub use registry::{BoxedTool, SharedRegistry, ToolRegistry};
pub use schema::{CompiledSchema, Field, FieldType, Location, ObjectSchema, Presence};
pub use tool::{Tool, ToolDescriptor, ToolInput};
