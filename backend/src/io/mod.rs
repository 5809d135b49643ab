//! # IO Module
//!
//! Collaborators the absence core talks to but does not own: the messaging
//! capability that delivers the report, and the text provider that turns error
//! keys into display text.

pub mod messaging;
pub mod text;

pub use messaging::{MessageSender, SmsDraft, SmsDraftSender};
pub use text::{StaticTextProvider, TextProvider};
