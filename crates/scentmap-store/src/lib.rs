//! Firestore-backed catalog source and payment audit log.

pub mod client;
pub mod error;
pub mod value;

pub use client::{FirestoreClient, HOTPLACES, PAYMENTS};
pub use error::StoreError;
