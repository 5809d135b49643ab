//! # Domain Module
//!
//! Business rules for reporting a child's school absence.
//!
//! The pipeline runs leaf-first:
//!
//! - **identity_number**: validating and canonicalizing a personnummer
//! - **absence_window**: full day, or a start/end pair inside the reportable range
//! - **message_encoder**: the exact outbound text
//! - **identity_cache**: last submitted identity number per child
//! - **absence_form**: form state and its pure transition function
//! - **absence_form_controller**: the session, wiring the above to the
//!   messaging capability and the cache
//!
//! Nothing in this module knows about screens or transports; collaborators
//! are injected through the traits in `storage` and `io`.

pub mod absence_form;
pub mod absence_form_controller;
pub mod absence_window;
pub mod errors;
pub mod identity_cache;
pub mod identity_number;
pub mod message_encoder;

pub use absence_form::{reduce, FormAction, FormEdit, FormPhase, FormState};
pub use absence_form_controller::{AbsenceFormController, SubmitOutcome};
pub use absence_window::AbsenceWindow;
pub use errors::{AbsenceError, IdentityError, WindowError};
pub use identity_cache::IdentityCache;
pub use identity_number::{validate, validate_at, IdentityNumber};
pub use message_encoder::{encode, SubmissionMessage};
