//! Outbound mail seam. Delivery is an external collaborator; the service
//! only depends on this interface.

use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Default implementation: writes the message to the log instead of
/// dispatching it anywhere.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(to, subject, body, "Mail dispatch (log only)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let result = LogMailer
            .send("user@example.com", "Activate your account", "link body")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn trait_object_dispatches_to_the_mock() {
        let mut mock = MockMailer::new();
        mock.expect_send()
            .withf(|to, subject, _| to == "user@example.com" && subject == "Reset your password")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mailer: Arc<dyn Mailer> = Arc::new(mock);
        mailer
            .send("user@example.com", "Reset your password", "link body")
            .await
            .expect("mock send");
    }
}
