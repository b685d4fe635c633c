use crate::types::Content;

/// Everything an agent needs to know about the invocation it is serving:
/// identity, the new user message, and the conversation so far.
///
/// Implementations live with the runner, which owns session loading; agents
/// only read from this trait.
pub trait InvocationContext: Send + Sync {
    fn invocation_id(&self) -> &str;

    fn app_name(&self) -> &str;

    fn user_id(&self) -> &str;

    fn session_id(&self) -> &str;

    /// The message that started this invocation.
    fn user_content(&self) -> &Content;

    /// Prior turns, oldest first, not including `user_content`.
    fn history(&self) -> &[Content];
}
