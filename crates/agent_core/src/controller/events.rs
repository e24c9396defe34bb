//! Flow steps and the commands hosts feed back from user gestures.
//!
//! The controller is stateless; hosts that want step bookkeeping keep a
//! [`FlowStep`] and advance it with [`FlowStep::apply`].

use std::fmt;

use crate::{element::Control, error::AgentError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStep {
    Start,
    Confirmation,
    Error,
    /// Confirm was forwarded to the host; what happens next is the host's call.
    Confirmed,
    Closed,
}

impl FlowStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Confirmation => "confirmation",
            Self::Error => "error",
            Self::Confirmed => "confirmed",
            Self::Closed => "closed",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }

    pub fn apply(self, command: FlowCommand) -> Result<FlowStep, AgentError> {
        use FlowCommand as C;
        use FlowStep as S;

        let next = match (self, command) {
            (S::Start, C::Open { affordable: true }) => S::Confirmation,
            (S::Start, C::Open { affordable: false }) => S::Error,
            (S::Confirmation, C::Confirm) => S::Confirmed,
            (S::Error, C::Confirm) => {
                return Err(AgentError::AffordabilityViolation(
                    "cannot confirm a redemption the balance does not cover".into(),
                ))
            }
            (S::Confirmation | S::Error, C::Back) => S::Start,
            (S::Confirmation | S::Error | S::Confirmed, C::Close) => S::Closed,
            (from, command) => {
                return Err(AgentError::InvalidTransition {
                    from,
                    command: command.name(),
                })
            }
        };
        tracing::debug!(from = %self, command = command.name(), to = %next, "flow step advanced");
        Ok(next)
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCommand {
    Open { affordable: bool },
    Back,
    Close,
    Confirm,
}

impl FlowCommand {
    pub fn name(self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::Back => "back",
            Self::Close => "close",
            Self::Confirm => "confirm",
        }
    }

    pub fn from_control(control: Control) -> Option<Self> {
        match control {
            Control::Back => Some(Self::Back),
            Control::Close => Some(Self::Close),
            Control::Confirm => Some(Self::Confirm),
            Control::ViewOffers => None,
        }
    }
}
