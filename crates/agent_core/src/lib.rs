//! Core of the me-agent rewards widget: the redemption confirmation and
//! affordability flow, the catalog renderers around it, and the [`MeAgent`]
//! lifecycle handle hosts drive them through.
//!
//! Nothing here talks to the network or persists state. Balances, swap
//! quotes and offers arrive pre-computed; the core validates them, renders
//! markup and forwards user gestures to host callbacks.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod element;
pub mod error;
pub mod views;

pub use agent::MeAgent;
pub use catalog::{CatalogSource, JsonFileCatalog, StaticCatalog};
pub use config::{load_config, MeAgentConfig};
pub use controller::{
    FlowCallbacks, FlowCommand, FlowRender, FlowState, FlowStep, RedemptionFlowController,
};
pub use element::{Control, Element, NodeId};
pub use error::AgentError;
pub use shared::domain::{Environment, SupportedNetwork};
