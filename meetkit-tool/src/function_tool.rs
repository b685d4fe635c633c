use async_trait::async_trait;
use meetkit_core::{Result, Tool, ToolContext};
use serde_json::{Value, json};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type AsyncHandler = Box<
    dyn Fn(Arc<dyn ToolContext>, Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>>
        + Send
        + Sync,
>;

/// Wraps an async closure as a [`Tool`].
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: Value,
    handler: AsyncHandler,
}

impl FunctionTool {
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<dyn ToolContext>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: json!({"type": "object", "properties": {}}),
            handler: Box::new(move |ctx, args| Box::pin(handler(ctx, args))),
        }
    }

    /// JSON schema for the tool's arguments, forwarded to the model in the
    /// function declaration.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn declaration(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters,
        })
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        (self.handler)(ctx, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestToolContext;

    impl ToolContext for TestToolContext {
        fn invocation_id(&self) -> &str {
            "inv-test"
        }
    }

    #[tokio::test]
    async fn test_function_tool_invokes_handler() {
        let tool = FunctionTool::new("add", "adds two numbers", |_ctx, args| async move {
            let a = args["a"].as_i64().unwrap_or(0);
            let b = args["b"].as_i64().unwrap_or(0);
            Ok(json!({"sum": a + b}))
        });

        let result = tool.execute(Arc::new(TestToolContext), json!({"a": 2, "b": 3})).await.unwrap();
        assert_eq!(result["sum"], 5);
    }

    #[test]
    fn test_declaration_includes_parameters() {
        let tool = FunctionTool::new("noop", "does nothing", |_ctx, _args| async move {
            Ok(json!({}))
        })
        .with_parameters(json!({
            "type": "object",
            "properties": {"value": {"type": "string"}},
            "required": ["value"]
        }));

        let declaration = tool.declaration();
        assert_eq!(declaration["name"], "noop");
        assert_eq!(declaration["parameters"]["required"][0], "value");
    }
}
