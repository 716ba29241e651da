//! Bearer token verification.
//!
//! Accounts are created and tokens issued by the external account service; this
//! module only verifies the HS256 signature and exposes the caller as an
//! [`AuthenticatedUser`] request extension.

mod validator;

pub mod model;

pub use model::AuthenticatedUser;
pub use validator::JwtValidator;
