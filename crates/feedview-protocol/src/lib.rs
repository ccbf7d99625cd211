//! feedview Protocol - snapshot data model and wire decoding
//!
//! Defines the two collections returned by the dashboard backend
//! (vocabulary feedback log and beta waitlist) and the error taxonomy
//! for fetching them.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
