//! Terminal client for the AGRO-RADAR 360 agribusiness news feed.
//!
//! - [`feed`] - HTTP loading and normalization of articles
//! - [`filter`] - category options and the visible subset
//! - [`app`] - view state: activation lifecycle, load state, selection
//! - [`ui`] - ratatui front-end
//! - [`plain`] - plain-text output for non-interactive use

pub mod app;
pub mod config;
pub mod feed;
pub mod filter;
pub mod keybindings;
pub mod plain;
pub mod theme;
pub mod ui;
pub mod util;
