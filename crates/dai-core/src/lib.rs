//! dai-site/crates/dai-core/src/lib.rs
//!
//! The visitor-state store behind the D.A.I landing pages: accessibility
//! preferences, the photosensitivity consent, the sticky admin flag and the
//! testimonial moderation queues, persisted through the `KvStore` port.

pub mod error;
pub mod models;
pub mod store;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use store::*;
pub use traits::*;
