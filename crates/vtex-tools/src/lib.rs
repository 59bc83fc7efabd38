//! VTEX Order Management System tools.

pub mod orders;

use reqwest::Client;
use tooling::{BoxedTool, CredentialHeaders, ToolError, ToolRegistry};
use tracing::info;

pub const APP_KEY_HEADER: &str = "X-VTEX-API-AppKey";
pub const APP_TOKEN_HEADER: &str = "X-VTEX-API-AppToken";

pub const CREDENTIAL_HEADERS: CredentialHeaders = CredentialHeaders {
    key: APP_KEY_HEADER,
    token: APP_TOKEN_HEADER,
};

/// Every tool, one per upstream operation, in declaration order.
pub fn tools(client: &Client) -> Result<Vec<BoxedTool>, ToolError> {
    let list_orders: BoxedTool = Box::new(orders::create_list_orders_tool(client.clone())?);
    let get_order: BoxedTool = Box::new(orders::create_get_order_tool(client.clone())?);
    Ok(vec![list_orders, get_order])
}

pub fn build_registry() -> Result<ToolRegistry, ToolError> {
    build_registry_with_client(Client::new())
}

pub fn build_registry_with_client(client: Client) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    for tool in tools(&client)? {
        registry.register(tool)?;
    }
    info!(tools = ?registry.list_tools(), "Tool registry assembled");
    Ok(registry)
}
