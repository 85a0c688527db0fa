// src/ui.rs
//! Headless handles for the widget's elements, and the events that flow
//! in (`UiEvent`) and out (`WidgetEvent`).

use crate::message::LogEntry;

#[derive(Clone, Debug, Default)]
pub struct ChatWindow {
    pub visible: bool,
}

#[derive(Clone, Debug)]
pub struct InputField {
    pub value: String,
    pub enabled: bool,
    pub focused: bool,
}

impl Default for InputField {
    fn default() -> Self {
        Self {
            value: String::new(),
            enabled: true,
            focused: false,
        }
    }
}

/// Scrollable message log plus the transient typing placeholder.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    pub entries: Vec<LogEntry>,
    pub typing: bool,
}

/// Input from the launcher button, close button, send button and text box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    LauncherClicked,
    CloseClicked,
    SendClicked,
    KeyPressed(String),
    InputChanged(String),
}

/// Change notifications delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    Opened,
    Closed,
    MessageAppended(LogEntry),
    TypingShown,
    TypingCleared,
}
