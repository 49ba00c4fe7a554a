//! Third-party service clients.
//!
//! # Services
//!
//! - `formspree` - Contact form delivery

pub mod formspree;

pub use formspree::{FormspreeClient, FormspreeError};
