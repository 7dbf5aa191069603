//! Bearer-token providers
//!
//! Sign-in, sign-up and password flows live outside this crate; they leave a
//! [`Session`](crate::session::Session) behind, which [`SessionTokenProvider`]
//! turns into the bearer token attached to every request.

mod session_provider;
mod token;

pub use session_provider::SessionTokenProvider;
pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
