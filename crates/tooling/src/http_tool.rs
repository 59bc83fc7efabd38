//! Generic adapter that exposes one upstream REST operation as a [`Tool`].

use crate::error::ToolError;
use crate::query::build_url;
use crate::schema::{CompiledSchema, ObjectSchema};
use crate::tool::{Tool, ToolInput};
use async_trait::async_trait;
use oms_core::ExecutionContext;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

/// Header names carrying the credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialHeaders {
    pub key: &'static str,
    pub token: &'static str,
}

#[derive(Debug, Clone)]
pub struct HttpToolSpec {
    pub id: String,
    pub description: String,
    pub method: Method,
    /// Resource path appended to the context base URL, with optional
    /// `{field}` placeholders.
    pub path: String,
    pub input: ObjectSchema,
    pub output: ObjectSchema,
    pub credential_headers: CredentialHeaders,
}

#[derive(Debug)]
pub struct HttpTool {
    spec: HttpToolSpec,
    input_validator: CompiledSchema,
    output_validator: CompiledSchema,
    client: Client,
}

impl HttpTool {
    pub fn new(spec: HttpToolSpec) -> Result<Self, ToolError> {
        Self::with_client(spec, Client::new())
    }

    /// Shares a preconfigured client (pooling, timeouts) with other tools.
    pub fn with_client(spec: HttpToolSpec, client: Client) -> Result<Self, ToolError> {
        let input_validator = spec.input.compile()?;
        let output_validator = spec.output.compile()?;
        Ok(Self {
            spec,
            input_validator,
            output_validator,
            client,
        })
    }
}

#[async_trait]
impl Tool for HttpTool {
    fn id(&self) -> &str {
        &self.spec.id
    }

    fn description(&self) -> &str {
        &self.spec.description
    }

    fn input_schema(&self) -> &ObjectSchema {
        &self.spec.input
    }

    fn output_schema(&self) -> &ObjectSchema {
        &self.spec.output
    }

    fn validate_input(&self, input: &ToolInput) -> Result<(), ToolError> {
        if input.name != self.id() {
            return Err(ToolError::validation(
                "",
                format!("Expected tool '{}', got '{}'", self.id(), input.name),
            ));
        }
        self.input_validator.validate(&input.to_value())
    }

    async fn execute(&self, input: ToolInput, ctx: &ExecutionContext) -> Result<Value, ToolError> {
        self.validate_input(&input)?;

        let url = build_url(&ctx.base_url, &self.spec.path, &self.spec.input, &input.arguments)?;
        debug!(
            tool = %self.spec.id,
            method = %self.spec.method,
            path = url.path(),
            params = url.query_pairs().count(),
            "Dispatching upstream request"
        );

        let headers = &self.spec.credential_headers;
        let response = self
            .client
            .request(self.spec.method.clone(), url)
            .header(headers.key, &ctx.credentials.app_key)
            .header(headers.token, &ctx.credentials.app_token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(tool = %self.spec.id, status = status.as_u16(), "Upstream returned error status");
            return Err(ToolError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body).map_err(|e| {
            warn!(tool = %self.spec.id, error = %e, "Upstream body is not valid JSON");
            ToolError::Decode(e.to_string())
        })?;

        let output = self.spec.output.project(&payload);
        self.output_validator.validate(&output)?;
        Ok(output)
    }
}
