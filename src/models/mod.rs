//! Domain models for the admin-editable site content
//!
//! Every model serializes with camelCase field names, which is the shape the
//! dashboard and the game client already consume.

pub mod banner;
pub mod floating_social;
pub mod game;
pub mod game_history;
pub mod notice;
pub mod payment_method;
pub mod promotion;
pub mod settings;
pub mod site_config;
pub mod withdraw_method;

pub use banner::*;
pub use floating_social::*;
pub use game::*;
pub use game_history::*;
pub use notice::*;
pub use payment_method::*;
pub use promotion::*;
pub use settings::*;
pub use site_config::*;
pub use withdraw_method::*;

/// Records that own an uploaded image on disk
///
/// Used by delete handlers to clean up the file once the row is gone.
pub trait ImageOwner {
    fn image_paths(&self) -> Vec<&str>;
}

/// Listing options shared by the collections that carry an `is_active` flag
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionQuery {
    /// Restrict to active records (client-facing listings)
    pub active_only: bool,
}

impl CollectionQuery {
    pub fn all() -> Self {
        Self { active_only: false }
    }

    pub fn active() -> Self {
        Self { active_only: true }
    }
}
