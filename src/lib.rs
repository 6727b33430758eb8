//! Classmail — sorts student email into per-class IMAP folders.

pub mod config;
pub mod error;
pub mod mailbox;
pub mod roster;
pub mod sorter;
