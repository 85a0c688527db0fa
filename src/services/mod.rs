pub mod dispatcher;
pub mod fallback;
pub mod metrics_manager;
pub mod session_manager;
pub mod widget;
