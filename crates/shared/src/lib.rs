//! Data model shared by the widget core and its hosts.

pub mod domain;
pub mod error;
pub mod protocol;
