use crate::error::ToolError;
use crate::tool::{Tool, ToolDescriptor, ToolInput};
use oms_core::ExecutionContext;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub type BoxedTool = Box<dyn Tool>;

/// Ordered set of tools, assembled once at startup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `tool`. A colliding id is rejected and the existing entry
    /// is left untouched.
    pub fn register(&mut self, tool: BoxedTool) -> Result<(), ToolError> {
        let id = tool.id().to_string();

        if self.is_registered(&id) {
            return Err(ToolError::DuplicateTool(id));
        }

        self.index.insert(id, self.tools.len());
        self.tools.push(Arc::from(tool));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.index
            .get(id)
            .map(|&i| self.tools[i].clone())
            .ok_or_else(|| ToolError::NotFound(id.to_string()))
    }

    /// Tools in registration order.
    pub fn list(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn list_tools(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.id().to_string()).collect()
    }

    pub fn descriptor(&self, id: &str) -> Result<ToolDescriptor, ToolError> {
        self.get(id).map(|tool| tool.descriptor())
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|tool| tool.descriptor()).collect()
    }

    pub async fn execute_tool(
        &self,
        input: ToolInput,
        ctx: &ExecutionContext,
    ) -> Result<Value, ToolError> {
        let tool = self.get(&input.name)?;
        tool.execute(input, ctx).await
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

/// Registry holder whose contents can be swapped while readers are active.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep using it for the
/// whole call, so they see either the old or the new registry, never a mix.
pub struct SharedRegistry {
    current: RwLock<Arc<ToolRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    pub fn snapshot(&self) -> Arc<ToolRegistry> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Installs a fully built registry and returns the previous one.
    pub fn replace(&self, registry: ToolRegistry) -> Arc<ToolRegistry> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *current, Arc::new(registry))
    }
}

impl From<ToolRegistry> for SharedRegistry {
    fn from(registry: ToolRegistry) -> Self {
        Self::new(registry)
    }
}
