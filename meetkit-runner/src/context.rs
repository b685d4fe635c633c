use meetkit_core::{Content, InvocationContext};

/// Invocation context assembled by the runner from a loaded session.
///
/// `history` is the conversation before this invocation; the new user message
/// is only in `user_content`.
pub struct RunContext {
    invocation_id: String,
    app_name: String,
    user_id: String,
    session_id: String,
    user_content: Content,
    history: Vec<Content>,
}

impl RunContext {
    pub fn new(
        invocation_id: String,
        app_name: String,
        user_id: String,
        session_id: String,
        user_content: Content,
        history: Vec<Content>,
    ) -> Self {
        Self { invocation_id, app_name, user_id, session_id, user_content, history }
    }
}

impl InvocationContext for RunContext {
    fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn user_content(&self) -> &Content {
        &self.user_content
    }

    fn history(&self) -> &[Content] {
        &self.history
    }
}
