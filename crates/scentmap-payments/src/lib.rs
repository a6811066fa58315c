//! Payment confirmation against Toss Payments, with an audit trail in the
//! store.

pub mod client;
pub mod confirm;
pub mod error;

pub use client::TossClient;
pub use confirm::confirm_and_record;
pub use error::PaymentError;
