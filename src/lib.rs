//! Weather widget board - a tui-dispatch app
//!
//! This library exposes the board's modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod conditions;
pub mod config;
pub mod effect;
pub mod error;
pub mod input;
pub mod reducer;
pub mod state;
pub mod storage;
