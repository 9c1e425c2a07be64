//! Request extractors.

pub mod id;
pub mod identity;

pub use id::EntityId;
pub use identity::CurrentIdentity;
