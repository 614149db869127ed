//! GigDesk Common Types
//!
//! This crate contains shared types used across the GigDesk marketplace,
//! including identifiers, the Gig/Bid domain records with their status state
//! machines, and the error taxonomy.

pub mod bid;
pub mod error;
pub mod gig;
pub mod identifiers;
pub mod user;
pub mod validate;

pub use bid::*;
pub use error::*;
pub use gig::*;
pub use identifiers::*;
pub use user::*;
