//! Business logic and store trait definitions for Chat Hub.
//!
//! This crate defines the bot registry and dispatcher, the "ports" (store
//! traits) that the infrastructure layer implements, the session-scoped
//! accessors built on top of them, and the command interpreter. It depends
//! only on `chathub-types` -- never on `chathub-infra` or any database crate.

pub mod command;
pub mod handler;
pub mod hub;
pub mod registry;
pub mod session;
pub mod store;
