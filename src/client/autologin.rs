//! The single retry policy: one re-login, one retry.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::{BoxFuture, ModemClient, ModemError, Session};
use crate::domain::{DeviceAction, Snapshot};

/// A device call that can run under the session token.
pub(crate) trait Operation: Send + Sync {
    type Output: Send;

    fn name(&self) -> &'static str;

    fn call<'a>(
        &'a self,
        client: &'a ModemClient,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Self::Output, ModemError>>;
}

impl Operation for DeviceAction {
    type Output = u16;

    fn name(&self) -> &'static str {
        DeviceAction::name(self)
    }

    fn call<'a>(
        &'a self,
        client: &'a ModemClient,
        token: &'a str,
    ) -> BoxFuture<'a, Result<u16, ModemError>> {
        Box::pin(client.post_action(self, token))
    }
}

/// Status poll (`GET model.json`).
pub(crate) struct FetchStatus;

impl Operation for FetchStatus {
    type Output = Snapshot;

    fn name(&self) -> &'static str {
        "information"
    }

    fn call<'a>(
        &'a self,
        client: &'a ModemClient,
        _token: &'a str,
    ) -> BoxFuture<'a, Result<Snapshot, ModemError>> {
        Box::pin(client.fetch_status())
    }
}

/// Runs an operation under the current token; on any failure logs in again
/// with the stored password and retries exactly once.
///
/// The first attempt and the login-plus-retry each get one `timeout` budget.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Autologin {
    timeout: Duration,
}

impl Autologin {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// `Ok(None)` without touching the network when the session was logged out.
    pub(crate) async fn run<O: Operation>(
        &self,
        client: &ModemClient,
        session: &mut Session,
        operation: &O,
    ) -> Result<Option<O::Output>, ModemError> {
        if !session.active {
            debug!("already logged out");
            return Ok(None);
        }

        // Without a token there is nothing to try yet; go straight to login.
        if let Some(token) = session.token.clone() {
            match self.bounded(operation.call(client, &token)).await {
                Ok(output) => return Ok(Some(output)),
                Err(err) => debug!(operation = operation.name(), "attempt failed: {err}"),
            }
        }

        debug!(operation = operation.name(), "autologin");
        let retry = self
            .bounded(async {
                let token = client.login_session(session).await?;
                operation.call(client, &token).await
            })
            .await;

        retry.map(Some).map_err(|err| ModemError::Operation {
            operation: operation.name(),
            source: Box::new(err),
        })
    }

    async fn bounded<T>(
        &self,
        attempt: impl Future<Output = Result<T, ModemError>>,
    ) -> Result<T, ModemError> {
        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| ModemError::Timeout {
                timeout: self.timeout,
            })?
    }
}
