//! Account repository port and in-memory mock.

#[path = "trait.rs"]
mod trait_;

pub mod mock;

pub use mock::MockAccountRepository;
pub use trait_::AccountRepository;
