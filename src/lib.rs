//! Core library for the `vigil` review status watcher.
//!
//! The watch loop polls a review API on a fixed interval and turns
//! status changes into human-readable messages. Each distinct message
//! is forwarded to a Telegram chat at most once.

pub mod api;
pub mod commands;
pub mod envelope;
pub mod error;
pub mod gate;
pub mod logging;
pub mod notify;
pub mod settings;
pub mod verdict;
pub mod watcher;
