//! `ca-social` — who an agent talks to, and what it says.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`contact`]     | `ContactSelectionBehavior`, `ContactChoice` parsing         |
//! | [`message`]     | `MessageComposeBehavior`, chat history, `MessagePayload`    |
//! | [`coordinator`] | `SocialAction`, `SocialCoordinator`                         |
//! | [`prompts`]     | Oracle prompt templates                                     |
//!
//! # Flow
//!
//! Contact selection publishes a target into the [`Context`]; a following
//! message step takes it.  A message step with no published target runs its
//! own contact selection first.
//!
//! [`Context`]: ca_behavior::Context

pub mod contact;
pub mod coordinator;
pub mod message;
pub mod prompts;


pub use contact::{ContactChoice, ContactSelectionBehavior};
pub use coordinator::{SocialAction, SocialCoordinator};
pub use message::{append_chat_line, MessageComposeBehavior, MessagePayload, DEFAULT_MESSAGE};
