//! Repository ports for the persistence layer.

pub mod account;

pub use account::{AccountRepository, MockAccountRepository};
