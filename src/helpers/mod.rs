//! Helper functions for templates
//!
//! Date formatting, reading time and URL helpers shared by the generator
//! and the templates.

mod date;
mod reading;
mod url;

pub use date::*;
pub use reading::*;
pub use url::*;
