use async_stream::stream;
use async_trait::async_trait;
use meetkit_core::{
    Agent, Content, Event, EventStream, FunctionCallData, GenerateContentConfig,
    InvocationContext, Llm, LlmRequest, MeetkitError, Result, Tool, ToolContext,
};
use std::sync::Arc;

/// Upper bound on model round-trips per invocation before the agent gives up.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// An agent that answers by calling a language model in a loop, executing any
/// tools the model requests and feeding their replies back until the model
/// produces a plain text answer.
pub struct LlmAgent {
    name: String,
    description: String,
    model: Arc<dyn Llm>,
    instruction: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: usize,
}

impl std::fmt::Debug for LlmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAgent")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("model", &self.model.model_name())
            .field("instruction", &self.instruction)
            .field("tools_count", &self.tools.len())
            .finish()
    }
}

impl LlmAgent {
    pub fn builder(name: impl Into<String>) -> LlmAgentBuilder {
        LlmAgentBuilder::new(name)
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }
}

pub struct LlmAgentBuilder {
    name: String,
    description: Option<String>,
    model: Option<Arc<dyn Llm>>,
    instruction: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: usize,
}

impl LlmAgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            model: None,
            instruction: None,
            tools: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn model(mut self, model: Arc<dyn Llm>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(self) -> Result<LlmAgent> {
        let model =
            self.model.ok_or_else(|| MeetkitError::Agent("Model is required".to_string()))?;

        Ok(LlmAgent {
            name: self.name,
            description: self.description.unwrap_or_default(),
            model,
            instruction: self.instruction,
            tools: self.tools,
            max_iterations: self.max_iterations,
        })
    }
}

/// Per-call context handed to tools executed by the loop.
struct AgentToolContext {
    invocation_id: String,
    function_call_id: String,
}

impl ToolContext for AgentToolContext {
    fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    fn function_call_id(&self) -> Option<&str> {
        Some(&self.function_call_id)
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    #[meetkit_telemetry::instrument(
        skip(self, ctx),
        fields(
            agent.name = %self.name,
            invocation.id = %ctx.invocation_id(),
            user.id = %ctx.user_id(),
            session.id = %ctx.session_id()
        )
    )]
    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        meetkit_telemetry::info!("Starting agent execution");

        let agent_name = self.name.clone();
        let invocation_id = ctx.invocation_id().to_string();
        let model = self.model.clone();
        let tools = self.tools.clone();
        let instruction = self.instruction.clone();
        let max_iterations = self.max_iterations;

        let s = stream! {
            // Conversation sent to the model: prior turns first, then the
            // message that started this invocation.
            let mut contents: Vec<Content> = ctx.history().to_vec();
            contents.push(ctx.user_content().clone());

            let declarations: Vec<serde_json::Value> =
                tools.iter().map(|t| t.declaration()).collect();

            let mut iteration = 0;

            loop {
                iteration += 1;
                if iteration > max_iterations {
                    yield Err(MeetkitError::Agent(
                        format!("Max iterations ({}) exceeded", max_iterations)
                    ));
                    return;
                }

                let request = LlmRequest {
                    model: model.model_name().to_string(),
                    contents: contents.clone(),
                    tools: declarations.clone(),
                    config: GenerateContentConfig {
                        system_instruction: instruction.clone(),
                        ..Default::default()
                    },
                };

                let response = match model.generate(request).await {
                    Ok(response) => response,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let calls: Vec<FunctionCallData> = response
                    .content
                    .as_ref()
                    .map(|c| c.function_calls().into_iter().cloned().collect())
                    .unwrap_or_default();

                let mut model_event = Event::new(&invocation_id).with_author(agent_name.clone());
                model_event.content = response.content.clone();
                yield Ok(model_event);

                if let Some(content) = response.content {
                    contents.push(content);
                }

                if calls.is_empty() {
                    break;
                }

                for call in &calls {
                    meetkit_telemetry::info!(tool.name = %call.name, "Executing tool");

                    let result = if let Some(tool) =
                        tools.iter().find(|t| t.name() == call.name)
                    {
                        let tool_ctx: Arc<dyn ToolContext> = Arc::new(AgentToolContext {
                            invocation_id: invocation_id.clone(),
                            function_call_id: format!("{}_{}", invocation_id, call.name),
                        });

                        match tool.execute(tool_ctx, call.args.clone()).await {
                            Ok(result) => result,
                            Err(e) => serde_json::json!({ "error": e.to_string() }),
                        }
                    } else {
                        serde_json::json!({ "error": format!("Tool {} not found", call.name) })
                    };

                    let reply = Content::function_response(&call.name, result);

                    let tool_event = Event::new(&invocation_id)
                        .with_author(agent_name.clone())
                        .with_content(reply.clone());
                    yield Ok(tool_event);

                    contents.push(reply);
                }
            }
        };

        Ok(Box::pin(s))
    }
}
