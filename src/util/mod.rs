//! Utility functions shared by the feed pipeline and the UI.
//!
//! - **Text**: character-budget truncation for summaries, width-aware clipping
//!   for terminal cells, control-character stripping for API text
//! - **URLs**: validation of the API base URL and of article links before they
//!   are opened in a browser
//!
//! # Examples
//!
//! ```
//! use agro_radar::util::{display_width, truncate_chars, validate_api_base};
//!
//! let base = validate_api_base("https://agro-radar-360-3-0.onrender.com").unwrap();
//! assert_eq!(base.scheme(), "https");
//!
//! assert_eq!(truncate_chars("Colheita de café avança", 7), "Colheit...");
//! assert_eq!(display_width("Café"), 4);
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_chars, truncate_to_width, ELLIPSIS};
pub use url_validator::{validate_api_base, validate_url_for_open, UrlValidationError};
