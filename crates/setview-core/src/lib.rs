//! SetView Core — set summary data model, type strings, errors, configuration.

pub mod config;
pub mod error;
pub mod reference;
pub mod typestr;
pub mod types;

pub use config::ServiceEndpoints;
pub use error::{Error, ErrorKind, ErrorReport, Result};
pub use reference::{SetReference, WidgetParams};
pub use typestr::display_type;
pub use types::*;
