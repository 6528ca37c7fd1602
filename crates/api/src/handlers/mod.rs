pub mod favorites;
pub mod search;
