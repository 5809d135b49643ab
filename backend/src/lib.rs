//! # Absence Reporter Backend
//!
//! Non-UI logic for reporting a child's school absence by text message.
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer (screens, pickers, translations)
//!     ↓
//! Domain Layer (validation, absence window, message, form session)
//!     ↓                       ↓
//! Storage Layer            IO Layer
//! (identity cache store)   (messaging capability, text provider)
//! ```
//!
//! The presentation layer builds an [`AbsenceFormController`] per screen
//! instance with its collaborators, mounts it, forwards guardian edits and
//! calls `submit`.

pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use shared::{AbsenceFormConfig, Child};
use tokio::sync::mpsc;
use tracing::info;

pub use domain::*;
pub use io::*;
pub use storage::{DbConnection, InMemoryStorage, KeyValueStorage};

/// Long-lived collaborators shared by every absence form the app opens
#[derive(Clone)]
pub struct AbsenceBackend {
    pub config: AbsenceFormConfig,
    pub storage: Arc<dyn KeyValueStorage>,
    pub messenger: Arc<dyn MessageSender>,
    pub texts: Arc<dyn TextProvider>,
}

impl AbsenceBackend {
    pub fn new(
        config: AbsenceFormConfig,
        storage: Arc<dyn KeyValueStorage>,
        messenger: Arc<dyn MessageSender>,
        texts: Arc<dyn TextProvider>,
    ) -> Self {
        Self {
            config,
            storage,
            messenger,
            texts,
        }
    }

    /// A form controller for `child`, not yet mounted
    pub fn absence_form(&self, child: Child) -> AbsenceFormController {
        AbsenceFormController::new(
            child,
            self.config.clone(),
            IdentityCache::from_config(self.storage.clone(), &self.config),
            self.messenger.clone(),
            self.texts.clone(),
        )
    }
}

/// Wire the default stack: SQLite cache at `database_url`, SMS drafts for the
/// configured school number, Swedish texts.
///
/// Returns the backend and the receiver the app shell opens drafts from.
pub async fn initialize_backend(
    config: AbsenceFormConfig,
    database_url: &str,
) -> Result<(AbsenceBackend, mpsc::Receiver<SmsDraft>)> {
    info!("Setting up identity cache store");
    let db_conn = DbConnection::new(database_url).await?;

    info!("Setting up SMS composer channel");
    let (sender, drafts) = SmsDraftSender::channel(config.school_sms_number.clone(), 8);

    let backend = AbsenceBackend::new(
        config,
        Arc::new(db_conn),
        Arc::new(sender),
        Arc::new(StaticTextProvider::swedish()),
    );
    Ok((backend, drafts))
}
