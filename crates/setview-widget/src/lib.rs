//! Set summary widget — attach/start/stop/detach lifecycle around the set
//! aggregator.
//!
//! Rendering is delegated to a [`Renderer`]; the widget only decides when
//! loading, result and error notifications are sent.

pub mod contract;
pub mod controller;
pub mod types;

pub use contract::{Host, Renderer, SessionProvider, StaticSession, Widget};
pub use controller::{SetWidget, StartHandle};
pub use types::*;
