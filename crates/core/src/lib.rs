//! Postal address records and the rules that decide whether they are
//! well-formed.
//!
//! Everything here is pure logic over in-memory values: no I/O, no logging,
//! no shared state.

pub mod address;
pub mod error;
pub mod types;
pub mod validation;

pub use address::{AddressInput, AddressRecord};
pub use error::CoreError;
pub use types::DbId;
