use async_trait::async_trait;

/// Asks the operator to approve an irreversible action.
///
/// Implementations only present the prompt and resolve it; they never run
/// the action themselves.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn ask(&self, message: &str, title: &str) -> bool;
}

/// Answers every prompt the same way without asking anyone.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmation(pub bool);

#[async_trait]
impl ConfirmationGate for FixedConfirmation {
    async fn ask(&self, message: &str, title: &str) -> bool {
        tracing::debug!(title, message, answer = self.0, "auto-answered confirmation");
        self.0
    }
}
