pub mod favorite;
pub mod project;
pub mod search;
pub mod task;
pub mod team;
pub mod user;
