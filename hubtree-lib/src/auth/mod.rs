//! Authentication
//!
//! Session management happens outside this crate. The client only asks a
//! [`TokenProvider`] for the bearer token to attach to each request.

mod token;

pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
