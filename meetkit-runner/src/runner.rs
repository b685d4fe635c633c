use crate::RunContext;
use async_stream::stream;
use futures::StreamExt;
use meetkit_core::{Agent, Content, Event, EventStream, Result};
use meetkit_session::{GetRequest, SessionService};
use std::sync::Arc;

pub struct RunnerConfig {
    pub app_name: String,
    pub agent: Arc<dyn Agent>,
    pub session_service: Arc<dyn SessionService>,
}

/// Drives one agent against one session store.
///
/// For every invocation the runner loads the session, appends the user
/// message, streams the agent's events while persisting each one, and leaves
/// the session ready for the next turn.
pub struct Runner {
    app_name: String,
    agent: Arc<dyn Agent>,
    session_service: Arc<dyn SessionService>,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            app_name: config.app_name,
            agent: config.agent,
            session_service: config.session_service,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn session_service(&self) -> Arc<dyn SessionService> {
        self.session_service.clone()
    }

    pub async fn run(
        &self,
        user_id: String,
        session_id: String,
        new_message: Content,
    ) -> Result<EventStream> {
        let app_name = self.app_name.clone();
        let agent = self.agent.clone();
        let session_service = self.session_service.clone();

        tracing::info!(app = %app_name, session = %session_id, "Running agent");

        let s = stream! {
            let session = match session_service
                .get(GetRequest {
                    app_name: app_name.clone(),
                    user_id: user_id.clone(),
                    session_id: session_id.clone(),
                })
                .await
            {
                Ok(session) => session,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            // History snapshot predates this invocation's user message.
            let history = session.conversation_history();

            let invocation_id = format!("inv-{}", uuid::Uuid::new_v4());

            let user_event = Event::new(&invocation_id)
                .with_author("user")
                .with_content(new_message.clone());
            if let Err(e) = session_service.append_event(&session_id, user_event).await {
                yield Err(e);
                return;
            }

            let ctx = Arc::new(RunContext::new(
                invocation_id,
                app_name,
                user_id,
                session_id.clone(),
                new_message,
                history,
            ));

            let mut agent_stream = match agent.run(ctx).await {
                Ok(stream) => stream,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            while let Some(result) = agent_stream.next().await {
                match result {
                    Ok(event) => {
                        if let Err(e) =
                            session_service.append_event(&session_id, event.clone()).await
                        {
                            yield Err(e);
                            return;
                        }
                        yield Ok(event);
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(s))
    }

    /// Run to completion and return the final text answer.
    pub async fn run_collect(
        &self,
        user_id: String,
        session_id: String,
        new_message: Content,
    ) -> Result<String> {
        let mut stream = self.run(user_id, session_id, new_message).await?;
        let mut final_text = String::new();

        while let Some(result) = stream.next().await {
            let event = result?;
            if event.is_final_response() {
                if let Some(text) = event.text() {
                    final_text = text;
                }
            }
        }

        Ok(final_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use meetkit_core::InvocationContext;
    use meetkit_session::{CreateRequest, InMemorySessionService};
    use std::sync::Mutex;

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
            let event = Event::new(ctx.invocation_id())
                .with_author(self.name())
                .with_content(Content::model_text(
                    ctx.user_content().text().unwrap_or_default(),
                ));
            Ok(Box::pin(stream! { yield Ok(event) }))
        }
    }

    /// Records the history length it was handed, then echoes.
    struct ProbeAgent {
        seen_history: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Agent for ProbeAgent {
        fn name(&self) -> &str {
            "probe"
        }

        fn description(&self) -> &str {
            "records invocation history"
        }

        async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
            self.seen_history.lock().unwrap().push(ctx.history().len());
            let event = Event::new(ctx.invocation_id())
                .with_author(self.name())
                .with_content(Content::model_text("noted"));
            Ok(Box::pin(stream! { yield Ok(event) }))
        }
    }

    async fn runner_with(agent: Arc<dyn Agent>) -> Runner {
        let sessions = Arc::new(InMemorySessionService::new());
        sessions
            .create(CreateRequest {
                app_name: "meetkit".into(),
                user_id: "u1".into(),
                session_id: Some("s1".into()),
                state: Default::default(),
            })
            .await
            .unwrap();
        Runner::new(RunnerConfig {
            app_name: "meetkit".into(),
            agent,
            session_service: sessions,
        })
    }

    #[tokio::test]
    async fn test_run_persists_user_and_agent_events() {
        let runner = runner_with(Arc::new(EchoAgent)).await;

        let events: Vec<_> = runner
            .run("u1".into(), "s1".into(), Content::user_text("hello"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(events.len(), 1);

        let session = runner
            .session_service()
            .get(GetRequest {
                app_name: "meetkit".into(),
                user_id: "u1".into(),
                session_id: "s1".into(),
            })
            .await
            .unwrap();
        assert_eq!(session.events.len(), 2);
        assert_eq!(session.events[0].author, "user");
        assert_eq!(session.events[1].author, "echo");
    }

    #[tokio::test]
    async fn test_missing_session_yields_error() {
        let runner = runner_with(Arc::new(EchoAgent)).await;
        let mut stream = runner
            .run("u1".into(), "missing".into(), Content::user_text("hi"))
            .await
            .unwrap();
        let first = stream.next().await.unwrap();
        assert!(first.unwrap_err().to_string().contains("session not found"));
    }

    #[tokio::test]
    async fn test_history_excludes_current_message() {
        let agent = Arc::new(ProbeAgent { seen_history: Mutex::new(Vec::new()) });
        let runner = runner_with(agent.clone()).await;

        runner
            .run_collect("u1".into(), "s1".into(), Content::user_text("first"))
            .await
            .unwrap();
        runner
            .run_collect("u1".into(), "s1".into(), Content::user_text("second"))
            .await
            .unwrap();

        let seen = agent.seen_history.lock().unwrap().clone();
        // First turn sees nothing; second sees the first turn's two events.
        assert_eq!(seen, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_run_collect_returns_final_text() {
        let runner = runner_with(Arc::new(EchoAgent)).await;
        let text = runner
            .run_collect("u1".into(), "s1".into(), Content::user_text("ping"))
            .await
            .unwrap();
        assert_eq!(text, "ping");
    }
}
