//! Client-side durable storage for the freelancer workspace.
//!
//! The browser client kept everything in a flat string-valued key-value
//! store. This crate keeps that model (`KeyValueStore`) but puts a typed,
//! schema-versioned repository in front of it so stored shapes can be
//! migrated and tested without a UI.
//!
//! ## Keys
//!
//! ```text
//! freelancerProfile   JSON envelope { schemaVersion, profile }
//! profileSubmitted    "true" | "false"
//! userName            display name
//! userEmail           account email
//! userRole            "freelancer" | "client" | ...
//! token               bearer credential for the REST collaborator
//! ```

pub mod error;
pub mod keys;
pub mod kv;
pub mod repository;

pub use error::{Result, StoreError};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::{PROFILE_SCHEMA_VERSION, ProfileRepository, Session, StoredProfile};
