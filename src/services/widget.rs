// src/services/widget.rs
use std::{fmt::Debug, sync::Arc};

use tokio::sync::{RwLock, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::WidgetConfig,
    error::{ConfigError, DispatchError},
    message::{LogEntry, ReplyOrigin, UserText},
    services::{
        dispatcher::Dispatcher,
        fallback::{APOLOGY_REPLY, FallbackCategory, classify},
        metrics_manager::{DispatchOutcome, MetricsManager},
        session_manager::{SessionId, TabSession},
    },
    ui::{ChatWindow, InputField, MessageLog, UiEvent, WidgetEvent},
};

const EVENT_CAPACITY: usize = 64;

struct WidgetUi {
    window: ChatWindow,
    input: InputField,
    log: MessageLog,
    pending: bool,
    events: Option<broadcast::Sender<WidgetEvent>>,
}

impl WidgetUi {
    fn emit(&self, event: WidgetEvent) {
        if let Some(tx) = &self.events {
            // No subscribers is fine.
            let _ = tx.send(event);
        }
    }

    fn append(&mut self, entry: LogEntry) {
        self.log.entries.push(entry.clone());
        self.emit(WidgetEvent::MessageAppended(entry));
    }

    fn set_visible(&mut self, visible: bool) {
        if self.window.visible == visible {
            return;
        }
        self.window.visible = visible;
        if visible {
            self.input.focused = true;
            self.emit(WidgetEvent::Opened);
        } else {
            self.input.focused = false;
            self.emit(WidgetEvent::Closed);
        }
    }

    fn clear_typing(&mut self) {
        if self.log.typing {
            self.log.typing = false;
            self.emit(WidgetEvent::TypingCleared);
        }
    }
}

struct WidgetInner {
    dispatcher: Dispatcher,
    enable_fallback: bool,
    session: Arc<TabSession>,
    metrics: MetricsManager,
    ui: RwLock<WidgetUi>,
    lifetime: CancellationToken,
}

/// One chat widget instance. Cloning yields another handle to the same widget.
#[derive(Clone)]
pub struct Widget {
    inner: Arc<WidgetInner>,
}

impl Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("endpoint", &self.inner.dispatcher.endpoint().as_str())
            .field("enable_fallback", &self.inner.enable_fallback)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

impl Widget {
    pub fn new(config: &WidgetConfig) -> Result<Self, ConfigError> {
        Self::with_session(config, Arc::new(TabSession::new()), MetricsManager::new())
    }

    /// Build a widget that shares the tab's session (and metrics) with others.
    pub fn with_session(
        config: &WidgetConfig,
        session: Arc<TabSession>,
        metrics: MetricsManager,
    ) -> Result<Self, ConfigError> {
        let dispatcher = Dispatcher::new(config)?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        info!(
            endpoint = %dispatcher.endpoint(),
            timeout_ms = config.timeout,
            fallback = config.enable_fallback,
            "chat widget initialised"
        );
        Ok(Self {
            inner: Arc::new(WidgetInner {
                dispatcher,
                enable_fallback: config.enable_fallback,
                session,
                metrics,
                ui: RwLock::new(WidgetUi {
                    window: ChatWindow::default(),
                    input: InputField::default(),
                    log: MessageLog::default(),
                    pending: false,
                    events: Some(events),
                }),
                lifetime: CancellationToken::new(),
            }),
        })
    }

    pub fn metrics(&self) -> &MetricsManager {
        &self.inner.metrics
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.inner.session.peek().cloned()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.lifetime.is_cancelled()
    }

    /// `None` once the widget has been destroyed.
    pub async fn subscribe(&self) -> Option<broadcast::Receiver<WidgetEvent>> {
        let ui = self.inner.ui.read().await;
        ui.events.as_ref().map(|tx| tx.subscribe())
    }

    pub async fn handle(&self, event: UiEvent) {
        match event {
            UiEvent::LauncherClicked | UiEvent::CloseClicked => self.toggle().await,
            UiEvent::SendClicked => {
                self.submit().await;
            }
            UiEvent::KeyPressed(key) if key == "Enter" => {
                self.submit().await;
            }
            UiEvent::KeyPressed(_) => {}
            UiEvent::InputChanged(value) => self.set_input(value).await,
        }
    }

    pub async fn open(&self) {
        self.set_visible(Some(true)).await;
    }

    pub async fn close(&self) {
        self.set_visible(Some(false)).await;
    }

    pub async fn toggle(&self) {
        self.set_visible(None).await;
    }

    async fn set_visible(&self, visible: Option<bool>) {
        if self.is_destroyed() {
            return;
        }
        let mut ui = self.inner.ui.write().await;
        let target = visible.unwrap_or(!ui.window.visible);
        ui.set_visible(target);
    }

    pub async fn is_open(&self) -> bool {
        self.inner.ui.read().await.window.visible
    }

    pub async fn set_input(&self, value: impl Into<String>) {
        if self.is_destroyed() {
            return;
        }
        self.inner.ui.write().await.input.value = value.into();
    }

    pub async fn input(&self) -> InputField {
        self.inner.ui.read().await.input.clone()
    }

    pub async fn messages(&self) -> Vec<LogEntry> {
        self.inner.ui.read().await.log.entries.clone()
    }

    pub async fn is_typing(&self) -> bool {
        self.inner.ui.read().await.log.typing
    }

    /// Host-page entry point: behaves exactly like typing `text` and pressing send.
    pub async fn send_message(&self, text: &str) {
        self.submit_inner(Some(text)).await;
    }

    /// Send whatever is in the input field. Returns the bot message rendered
    /// for it, or `None` when nothing was sent.
    pub async fn submit(&self) -> Option<LogEntry> {
        self.submit_inner(None).await
    }

    async fn submit_inner(&self, typed: Option<&str>) -> Option<LogEntry> {
        if self.is_destroyed() {
            return None;
        }

        let text = {
            let mut ui = self.inner.ui.write().await;
            if self.is_destroyed() {
                return None;
            }
            if ui.pending {
                warn!("send ignored: previous reply still pending");
                return None;
            }
            if let Some(typed) = typed {
                ui.input.value = typed.to_string();
            }
            let text = UserText::parse(&ui.input.value)?;

            ui.append(LogEntry::user(text.as_str()));
            ui.input.value.clear();
            ui.log.typing = true;
            ui.emit(WidgetEvent::TypingShown);
            ui.input.enabled = false;
            ui.pending = true;
            text
        };

        let session_id = self.inner.session.get_or_create();
        let result = self
            .inner
            .dispatcher
            .send_with_cancel(&text, session_id, &self.inner.lifetime)
            .await;
        self.finish(&text, result).await
    }

    /// Render the reply for a completed dispatch. The destroyed check happens
    /// under the ui lock, which `destroy` also holds while cancelling.
    async fn finish(
        &self,
        text: &UserText,
        result: Result<String, DispatchError>,
    ) -> Option<LogEntry> {
        let mut ui = self.inner.ui.write().await;
        ui.pending = false;
        if self.is_destroyed() {
            ui.log.typing = false;
            debug!("widget destroyed while a reply was pending; dropping it");
            return None;
        }

        let outcome = DispatchOutcome::of(&result);
        let (content, origin, category) = self.settle(text, result);
        self.inner.metrics.record(outcome, category).await;

        ui.clear_typing();
        let entry = LogEntry::bot(content, origin);
        ui.append(entry.clone());
        ui.input.enabled = true;
        Some(entry)
    }

    /// Turn a dispatch result into the text to render, and the canned reply
    /// category when one was used.
    fn settle(
        &self,
        text: &UserText,
        result: Result<String, DispatchError>,
    ) -> (String, ReplyOrigin, Option<FallbackCategory>) {
        match result {
            Ok(reply) => (reply, ReplyOrigin::Remote, None),
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "error communicating with backend");
                if self.inner.enable_fallback {
                    let category = classify(text.as_str());
                    debug!(?category, "using canned reply");
                    (category.reply().to_string(), ReplyOrigin::Fallback, Some(category))
                } else {
                    (APOLOGY_REPLY.to_string(), ReplyOrigin::Apology, None)
                }
            }
        }
    }

    /// Tear down subscriptions and abort any in-flight request. The widget is
    /// inert afterwards.
    pub async fn destroy(&self) {
        if self.is_destroyed() {
            return;
        }
        let mut ui = self.inner.ui.write().await;
        self.inner.lifetime.cancel();
        ui.set_visible(false);
        ui.events.take();
        info!("chat widget destroyed");
    }
}
