//! Controller layer: flow steps, host commands and the redemption flow.

pub mod events;
pub mod redemption;

pub use events::{FlowCommand, FlowStep};
pub use redemption::{FlowCallbacks, FlowRender, FlowState, RedemptionFlowController};
