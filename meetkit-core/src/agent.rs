use crate::context::InvocationContext;
use crate::error::Result;
use crate::event::Event;
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;

/// Stream of events produced by one agent invocation.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event>> + Send>>;

/// An agent turns an invocation (user message + history) into a stream of
/// events: model replies, tool replies, and a final text answer.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Content;
    use futures::StreamExt;

    struct EchoAgent;

    #[async_trait]
    impl Agent for EchoAgent {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "repeats the user message"
        }

        async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
            let text = ctx.user_content().text().unwrap_or_default();
            let event = Event::new(ctx.invocation_id())
                .with_author(self.name())
                .with_content(Content::model_text(text));
            Ok(Box::pin(async_stream::stream! { yield Ok(event) }))
        }
    }

    struct TestContext {
        content: Content,
    }

    impl InvocationContext for TestContext {
        fn invocation_id(&self) -> &str {
            "inv-test"
        }

        fn app_name(&self) -> &str {
            "meetkit"
        }

        fn user_id(&self) -> &str {
            "user-1"
        }

        fn session_id(&self) -> &str {
            "sess-1"
        }

        fn user_content(&self) -> &Content {
            &self.content
        }

        fn history(&self) -> &[Content] {
            &[]
        }
    }

    #[tokio::test]
    async fn test_agent_emits_events() {
        let agent = EchoAgent;
        let ctx = Arc::new(TestContext { content: Content::user_text("hello") });
        let mut stream = agent.run(ctx).await.unwrap();
        let event = stream.next().await.unwrap().unwrap();
        assert_eq!(event.author, "echo");
        assert_eq!(event.text().as_deref(), Some("hello"));
    }
}
