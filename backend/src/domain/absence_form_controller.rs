use chrono::NaiveTime;
use shared::{AbsenceFormConfig, Child};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::domain::absence_form::{reduce, FormAction, FormEdit, FormPhase, FormState};
use crate::domain::absence_window::AbsenceWindow;
use crate::domain::errors::AbsenceError;
use crate::domain::identity_cache::IdentityCache;
use crate::domain::identity_number;
use crate::domain::message_encoder::{encode, SubmissionMessage};
use crate::io::messaging::MessageSender;
use crate::io::text::TextProvider;

/// Result of a submit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was handed to the messaging capability
    Submitted(SubmissionMessage),
    Failed(AbsenceError),
    /// A submission was already running, or the form was never mounted
    Ignored,
}

/// Drives one absence form session for one child.
///
/// Form state sits behind a mutex that is released before every collaborator
/// call, so guardian edits can land while the cache read or the message
/// dispatch is in flight.
pub struct AbsenceFormController {
    child: Child,
    config: AbsenceFormConfig,
    cache: IdentityCache,
    messenger: Arc<dyn MessageSender>,
    texts: Arc<dyn TextProvider>,
    state: Mutex<FormState>,
}

impl AbsenceFormController {
    pub fn new(
        child: Child,
        config: AbsenceFormConfig,
        cache: IdentityCache,
        messenger: Arc<dyn MessageSender>,
        texts: Arc<dyn TextProvider>,
    ) -> Self {
        let state = Mutex::new(FormState::new(config.reportable_range));
        Self {
            child,
            config,
            cache,
            messenger,
            texts,
            state,
        }
    }

    pub fn child(&self) -> &Child {
        &self.child
    }

    pub fn config(&self) -> &AbsenceFormConfig {
        &self.config
    }

    /// Snapshot of the current form state
    pub async fn state(&self) -> FormState {
        self.state.lock().await.clone()
    }

    /// Start the session using the local wall clock
    pub async fn mount(&self) {
        self.mount_at(chrono::Local::now().time()).await
    }

    /// Start the session: seed defaults, then fill in the cached identity number
    pub async fn mount_at(&self, now: NaiveTime) {
        {
            let mut state = self.state.lock().await;
            if state.phase != FormPhase::Idle {
                debug!("Absence form for child {} already mounted", self.child.id);
                return;
            }
            *state = reduce(
                state.clone(),
                FormAction::Mounted {
                    now,
                    range: self.config.reportable_range,
                    granularity_minutes: self.config.granularity_minutes,
                },
            );
        }
        info!("Absence form mounted for child {}", self.child.id);

        let cached = self.cache.get(&self.child.id).await;
        self.apply(FormAction::CachedIdentityLoaded(cached)).await;
    }

    /// Apply a guardian edit
    pub async fn dispatch(&self, edit: FormEdit) -> FormState {
        self.apply(edit.into()).await
    }

    /// Validate, send and cache.
    ///
    /// Nothing is sent or cached when validation fails. A send failure skips
    /// the cache write.
    pub async fn submit(&self) -> SubmitOutcome {
        let snapshot = {
            let mut state = self.state.lock().await;
            if !state.can_submit() {
                debug!(
                    "Ignoring submit for child {} in phase {:?}",
                    self.child.id, state.phase
                );
                return SubmitOutcome::Ignored;
            }
            *state = reduce(state.clone(), FormAction::SubmitStarted);
            state.clone()
        };

        let (canonical, message) = match self.build_message(&snapshot) {
            Ok(built) => built,
            Err(e) => {
                debug!("Absence form for child {} rejected: {}", self.child.id, e);
                return self.fail(e).await;
            }
        };

        info!(
            "Sending absence report for child {} ({})",
            self.child.id,
            if snapshot.is_full_day { "full day" } else { "partial day" }
        );
        if let Err(e) = self.messenger.send_message(message.as_str()).await {
            error!("Sending absence report for child {} failed: {}", self.child.id, e);
            return self.fail(AbsenceError::MessagingFailure(e.to_string())).await;
        }

        self.cache.set(&self.child.id, &canonical).await;
        self.apply(FormAction::SubmitSucceeded).await;

        info!("Absence report submitted for child {}", self.child.id);
        SubmitOutcome::Submitted(message)
    }

    /// Display text for the error currently visible on the form
    pub async fn error_text(&self) -> Option<String> {
        let error = self.state().await.visible_error()?;
        let key = error.translation_key();
        Some(self.texts.text(key).unwrap_or_else(|| key.to_string()))
    }

    fn build_message(&self, state: &FormState) -> Result<(String, SubmissionMessage), AbsenceError> {
        let identity = identity_number::validate(&state.identity_input)?;
        let window = AbsenceWindow::new(
            state.is_full_day,
            state.start_time,
            state.end_time,
            self.config.reportable_range,
            self.config.granularity_minutes,
        )?;

        let canonical = identity.canonical();
        let message = encode(&canonical, &window);
        Ok((canonical, message))
    }

    async fn fail(&self, error: AbsenceError) -> SubmitOutcome {
        self.apply(FormAction::SubmitFailed(error.clone())).await;
        SubmitOutcome::Failed(error)
    }

    async fn apply(&self, action: FormAction) -> FormState {
        let mut state = self.state.lock().await;
        *state = reduce(state.clone(), action);
        state.clone()
    }
}
