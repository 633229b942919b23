use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Session;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthOperation {
    GetSession,
    SignOut,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthOutput {
    Session(Session),
    SignedOut,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthError {
    #[error("sign-out failed: {message}")]
    SignOutFailed { message: String },

    #[error("session unavailable: {message}")]
    SessionUnavailable { message: String },

    #[error("unexpected auth output for {operation}")]
    UnexpectedOutput { operation: String },
}

pub type AuthResult = Result<AuthOutput, AuthError>;

impl Operation for AuthOperation {
    type Output = AuthResult;
}

/// Bridge to the shell's authentication provider.
#[derive(crux_core::macros::Capability)]
pub struct Auth<Ev> {
    context: CapabilityContext<AuthOperation, Ev>,
}

impl<Ev> Auth<Ev> {
    pub fn new(context: CapabilityContext<AuthOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Auth<Ev>
where
    Ev: Send + 'static,
{
    pub fn get_session<F>(&self, make_event: F)
    where
        F: FnOnce(Result<Session, AuthError>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let session = match ctx.request_from_shell(AuthOperation::GetSession).await {
                Ok(AuthOutput::Session(session)) => Ok(session),
                Ok(AuthOutput::SignedOut) => Err(AuthError::UnexpectedOutput {
                    operation: "get_session".into(),
                }),
                Err(e) => Err(e),
            };
            ctx.update_app(make_event(session));
        });
    }

    pub fn sign_out<F>(&self, make_event: F)
    where
        F: FnOnce(Result<(), AuthError>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = match ctx.request_from_shell(AuthOperation::SignOut).await {
                Ok(AuthOutput::SignedOut) => Ok(()),
                Ok(AuthOutput::Session(_)) => Err(AuthError::UnexpectedOutput {
                    operation: "sign_out".into(),
                }),
                Err(e) => Err(e),
            };
            ctx.update_app(make_event(result));
        });
    }
}
