use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

use crate::{
    controller::events::FlowStep,
    element::{Control, NodeId},
};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("affordability violation: {0}")]
    AffordabilityViolation(String),
    #[error("cannot attach listeners to {node}: missing controls {missing:?}")]
    ListenerAttach { node: NodeId, missing: Vec<Control> },
    #[error("cannot apply '{command}' while the flow is at {from}")]
    InvalidTransition { from: FlowStep, command: &'static str },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("catalog load failed: {0:#}")]
    Catalog(anyhow::Error),
    #[error("agent is not initialized")]
    NotInitialized,
    #[error("agent is already initialized; call destroy first")]
    AlreadyInitialized,
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

impl AgentError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) | Self::InvalidTransition { .. } => ErrorCode::InvalidInput,
            Self::AffordabilityViolation(_) => ErrorCode::AffordabilityViolation,
            Self::ListenerAttach { .. } => ErrorCode::ListenerAttach,
            Self::Config(_) => ErrorCode::Config,
            Self::Catalog(_) => ErrorCode::Catalog,
            Self::NotInitialized | Self::AlreadyInitialized => ErrorCode::Lifecycle,
            Self::UnknownNode(_) => ErrorCode::Internal,
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        ApiError::new(self.code(), self.to_string())
    }
}

impl From<AgentError> for ApiError {
    fn from(value: AgentError) -> Self {
        value.to_api_error()
    }
}
