// file: src/utils/mod.rs
// version: 2.0.0
// guid: v2w3x4y5-z6a7-8901-2345-678901vwxyza

//! Utility modules

pub mod mailbox;

pub use mailbox::{parse_mailbox, Mailbox, MailboxError};
