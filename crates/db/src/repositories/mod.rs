//! One zero-sized repository per table, each taking `&PgPool`.

pub mod catalog_repo;
pub mod favorite_repo;
pub mod project_repo;
pub mod task_repo;
pub mod team_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepo;
pub use favorite_repo::FavoriteRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use team_repo::TeamRepo;
pub use user_repo::UserRepo;
