//! Karmabot Library
//!
//! A Telegram group bot tracking peer-granted karma scores.
//!
//! This crate provides the core functionality for:
//! - Routing `/command` messages to handlers
//! - Granting and removing karma via reply commands, with anti-spam
//!   rate limiting
//! - Serving daily restaurant menus scraped from the web
//! - Persisting user records in SQLite

pub mod commands;
pub mod config;
pub mod fetch;
pub mod storage;
pub mod telegram;
