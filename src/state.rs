// src/state.rs
use std::sync::Arc;

use crate::config::WidgetConfig;
use crate::error::ConfigError;
use crate::services::widget::Widget;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub widget: Widget,
    /// Required as `x-widget-key` on control routes when set.
    pub control_key: Option<String>,
}

impl AppState {
    pub fn new(config: &WidgetConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            widget: Widget::new(config)?,
            control_key: None,
        })
    }

    pub fn with_control_key(mut self, key: impl Into<String>) -> Self {
        self.control_key = Some(key.into());
        self
    }
}
