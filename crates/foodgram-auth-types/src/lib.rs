//! Identity types shared across Foodgram services.
//!
//! Authentication happens upstream; services only read the identity headers
//! the gateway injects.

pub mod identity;
