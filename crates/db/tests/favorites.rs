//! Integration tests for favorite persistence and the favorites services
//! running on PostgreSQL.

use assert_matches::assert_matches;
use planboard_core::entity::{EntityKind, EntityRef, Identified, ProjectId, TaskId, TeamId, UserId};
use planboard_core::error::{CoreError, ServiceError};
use planboard_core::favorites;
use planboard_core::store::{FavoriteStore, InsertOutcome};
use planboard_db::models::project::CreateProject;
use planboard_db::models::team::CreateTeam;
use planboard_db::models::user::CreateUser;
use planboard_db::repositories::{FavoriteRepo, ProjectRepo, TeamRepo, UserRepo};
use planboard_db::PgStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, name: &str) -> UserId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        },
    )
    .await
    .unwrap();
    UserId(user.user_id)
}

async fn create_project(pool: &PgPool, name: &str) -> ProjectId {
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            description: None,
            team_id: None,
        },
    )
    .await
    .unwrap();
    ProjectId(project.id)
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_insert_returns_none(pool: PgPool) {
    let user = create_user(&pool, "Ada").await;

    let first = FavoriteRepo::insert(&pool, user.get(), "project", 5).await.unwrap();
    assert!(first.is_some());

    let second = FavoriteRepo::insert(&pool, user.get(), "project", 5).await.unwrap();
    assert!(second.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_entity_type_is_rejected_by_check_constraint(pool: PgPool) {
    let user = create_user(&pool, "Ada").await;

    let result = FavoriteRepo::insert(&pool, user.get(), "milestone", 1).await;
    assert_matches!(result, Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23514"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_user_removes_their_favorites(pool: PgPool) {
    let user = create_user(&pool, "Ada").await;
    FavoriteRepo::insert(&pool, user.get(), "task", 3).await.unwrap();

    assert!(UserRepo::delete(&pool, user.get()).await.unwrap());

    let rows = FavoriteRepo::list_for_user(&pool, user.get(), None).await.unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn count_by_type_groups_rows(pool: PgPool) {
    let user = create_user(&pool, "Ada").await;
    FavoriteRepo::insert(&pool, user.get(), "task", 1).await.unwrap();
    FavoriteRepo::insert(&pool, user.get(), "task", 2).await.unwrap();
    FavoriteRepo::insert(&pool, user.get(), "team", 1).await.unwrap();

    let mut counts = FavoriteRepo::count_by_type(&pool, user.get()).await.unwrap();
    counts.sort();
    assert_eq!(counts, vec![("task".to_string(), 2), ("team".to_string(), 1)]);
}

// ---------------------------------------------------------------------------
// Services on PgStore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn add_then_query_then_remove(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let user = create_user(&pool, "Ada").await;
    let target = EntityRef::Project(ProjectId(5));

    let favorite = favorites::add_favorite(&store, user, target).await.unwrap();
    assert_eq!(favorite.target, target);
    assert!(favorites::is_favorite(&store, user, target).await.unwrap());

    let again = favorites::add_favorite(&store, user, target).await;
    assert_matches!(again, Err(ServiceError::Core(CoreError::Conflict(_))));

    favorites::remove_favorite(&store, user, target).await.unwrap();
    assert!(!favorites::is_favorite(&store, user, target).await.unwrap());

    let gone = favorites::remove_favorite(&store, user, target).await;
    assert_matches!(gone, Err(ServiceError::Core(CoreError::NotFound { .. })));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn add_for_unknown_user_is_not_found(pool: PgPool) {
    let store = PgStore::new(pool);

    let result = favorites::add_favorite(&store, UserId(999), EntityRef::Task(TaskId(1))).await;
    assert_matches!(
        result,
        Err(ServiceError::Core(CoreError::NotFound { entity: "User", id: 999 }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_for_deleted_user_reports_user_missing(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let user = create_user(&pool, "Ada").await;
    UserRepo::delete(&pool, user.get()).await.unwrap();

    // Skips the service's existence check, as a concurrent delete would.
    let outcome = store
        .insert_favorite(user, EntityRef::Task(TaskId(1)))
        .await
        .unwrap();
    assert_eq!(outcome, InsertOutcome::UserMissing);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_store_insert_reports_duplicate(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let user = create_user(&pool, "Ada").await;
    let target = EntityRef::Team(TeamId(2));

    assert_matches!(
        store.insert_favorite(user, target).await.unwrap(),
        InsertOutcome::Inserted(f) if f.target == target
    );
    assert_eq!(
        store.insert_favorite(user, target).await.unwrap(),
        InsertOutcome::Duplicate
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn grouped_listing_is_newest_first_per_kind(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let user = create_user(&pool, "Ada").await;
    for target in [
        EntityRef::Task(TaskId(1)),
        EntityRef::Team(TeamId(4)),
        EntityRef::Task(TaskId(2)),
    ] {
        favorites::add_favorite(&store, user, target).await.unwrap();
    }

    let grouped = favorites::list_favorites_for_user(&store, user).await.unwrap();
    let tasks: Vec<i64> = grouped[&EntityKind::Task].iter().map(|f| f.target.id()).collect();
    assert_eq!(tasks, vec![2, 1]);
    assert_eq!(grouped[&EntityKind::Team].len(), 1);
    assert!(!grouped.contains_key(&EntityKind::Project));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hydration_marks_deleted_entities_absent(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let user = create_user(&pool, "Ada").await;
    let kept = create_project(&pool, "Apollo").await;
    let doomed = TeamRepo::create(
        &pool,
        &CreateTeam {
            name: "Gemini".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    favorites::add_favorite(&store, user, EntityRef::Project(kept)).await.unwrap();
    favorites::add_favorite(&store, user, EntityRef::Team(TeamId(doomed.id)))
        .await
        .unwrap();
    TeamRepo::delete(&pool, doomed.id).await.unwrap();

    let projects = favorites::list_favorites_by_kind(&store, &store, user, EntityKind::Project)
        .await
        .unwrap();
    assert_eq!(projects.len(), 1);
    let entity = projects[0].entity.as_ref().unwrap();
    assert_eq!(entity.entity_ref(), EntityRef::Project(kept));

    let teams = favorites::list_favorites_by_kind(&store, &store, user, EntityKind::Team)
        .await
        .unwrap();
    assert_eq!(teams.len(), 1);
    assert!(teams[0].entity.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_favorites_hydrate_by_user_id(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let ada = create_user(&pool, "Ada").await;
    let grace = create_user(&pool, "Grace").await;

    favorites::add_favorite(&store, ada, EntityRef::User(grace)).await.unwrap();

    let users = favorites::list_favorites_by_kind(&store, &store, ada, EntityKind::User)
        .await
        .unwrap();
    let json = serde_json::to_value(&users).unwrap();
    assert_eq!(json[0]["entity_type"], "user");
    assert_eq!(json[0]["entity"]["user_id"], grace.get());
    assert_eq!(json[0]["entity"]["name"], "Grace");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn counts_cover_every_kind(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let user = create_user(&pool, "Ada").await;
    favorites::add_favorite(&store, user, EntityRef::Task(TaskId(1))).await.unwrap();
    favorites::add_favorite(&store, user, EntityRef::Task(TaskId(2))).await.unwrap();

    let counts = favorites::count_favorites(&store, user).await.unwrap();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.counts[&EntityKind::Task], 2);
    assert_eq!(counts.counts[&EntityKind::Project], 0);
    assert_eq!(counts.counts.len(), 4);
}
