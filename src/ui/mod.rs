//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout, header, view-state messages
//! - `helpers` - Shared utility functions
//! - `categories` - Category filter bar
//! - `articles` - Hero block and card grid
//! - `status` - Status bar widget
//! - `help` - Help overlay

mod articles;
mod categories;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
