//! Embeddable chat widget core: relays user text to an answering endpoint and
//! falls back to canned replies when the endpoint is slow, down, or answers
//! with something unusable.

pub mod config;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;
pub mod ui;

pub use config::WidgetConfig;
pub use error::DispatchError;
pub use services::widget::Widget;
