//! Core model for botshelf: the bot catalog, the GitHub changelog fetchers,
//! the navigation state machine, and unified patch parsing.
//!
//! Nothing in this crate touches the terminal. The `botshelf` binary drives a
//! [`navigation::Navigator`] from key events, executes the [`navigation::Effect`]s
//! it returns on background tasks, and feeds the results back through
//! [`navigation::Navigator::apply_history`] / [`navigation::Navigator::apply_detail`].

pub mod catalog;
pub mod error;
pub mod github;
pub mod navigation;
pub mod patch;
pub mod types;
