//! Planboard domain core.
//!
//! Entity kind registry, favorites and federated search. No database
//! dependency: persistence is reached through the traits in [`store`].

pub mod entity;
pub mod error;
pub mod favorites;
pub mod search;
pub mod store;
pub mod suggestions;
pub mod types;

#[cfg(test)]
mod testing;
