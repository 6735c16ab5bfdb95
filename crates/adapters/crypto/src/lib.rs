//! # eodsa-adapter-crypto
//!
//! Implements the security ports of `eodsa-app`:
//! - [`Argon2Hasher`] for studio and judge passwords
//! - [`HmacSessionTokens`] for stateless bearer tokens
//!
//! Both are synchronous and hold no IO resources, so they are cheap to clone
//! into every service.

mod error;
mod password;
mod token;

pub use error::CryptoError;
pub use password::Argon2Hasher;
pub use token::{HmacSessionTokens, MIN_SECRET_LEN};
