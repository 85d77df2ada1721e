pub mod identity;

pub use identity::{IdentityResolver, InMemoryIdentityDirectory};
