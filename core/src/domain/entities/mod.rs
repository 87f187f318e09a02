//! Domain entities representing core business objects.

pub mod account;
pub mod token;

// Re-export commonly used types
pub use account::{Account, Profile, Role};
pub use token::{Claims, SessionTokens, TokenKind};
