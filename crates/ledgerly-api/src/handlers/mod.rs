//! HTTP handlers, organized by domain.

pub mod account;
pub mod chat;
pub mod health;
pub mod subscription;
pub mod usage;
pub mod webhook;
