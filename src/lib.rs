//! Core library for `taskkeep`: a single-user terminal task tracker with
//! bcrypt-protected accounts and JSON persistence.

pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod i18n;
pub mod lifecycle;
pub mod models;
pub mod storage;
pub mod store;
pub mod tui;
