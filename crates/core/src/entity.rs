//! Entity kind registry.
//!
//! Lists the record types that can be favorited and searched, the columns
//! each one is matched on, and the typed ids that identify them. Nothing
//! outside this module branches on a kind's tag string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Typed ids
// ---------------------------------------------------------------------------

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub DbId);

        impl $name {
            /// The raw database key.
            pub fn get(self) -> DbId {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id!(
    /// Primary key of a `projects` row.
    ProjectId
);
typed_id!(
    /// Primary key of a `tasks` row.
    TaskId
);
typed_id!(
    /// Primary key (`user_id`) of a `users` row.
    UserId
);
typed_id!(
    /// Primary key of a `teams` row.
    TeamId
);

impl UserId {
    /// Validate a user id supplied by a caller.
    pub fn new(raw: DbId) -> Result<Self, CoreError> {
        require_positive("user_id", raw).map(Self)
    }
}

/// Reject ids that can never name a row.
pub fn require_positive(field: &str, value: DbId) -> Result<DbId, CoreError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be a positive integer, got {value}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// A favoritable / searchable record type.
///
/// Declaration order is registry order, which drives suggestion merging and
/// the ordering of grouped favorites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Task,
    User,
    Team,
}

/// How one entity kind is stored and matched.
#[derive(Debug)]
pub struct KindDescriptor {
    /// Wire tag, as stored in `favorites.entity_type`.
    pub tag: &'static str,
    /// Human-readable name used in error messages.
    pub label: &'static str,
    pub table: &'static str,
    /// Primary key column. Not uniform across kinds.
    pub id_column: &'static str,
    /// Text columns matched by a case-insensitive substring search.
    pub search_columns: &'static [&'static str],
    /// Column used as the display name and for suggestions.
    pub name_column: &'static str,
}

const PROJECT: KindDescriptor = KindDescriptor {
    tag: "project",
    label: "Project",
    table: "projects",
    id_column: "id",
    search_columns: &["name", "description"],
    name_column: "name",
};

const TASK: KindDescriptor = KindDescriptor {
    tag: "task",
    label: "Task",
    table: "tasks",
    id_column: "id",
    search_columns: &["title", "description"],
    name_column: "title",
};

const USER: KindDescriptor = KindDescriptor {
    tag: "user",
    label: "User",
    table: "users",
    id_column: "user_id",
    search_columns: &["name", "email"],
    name_column: "name",
};

const TEAM: KindDescriptor = KindDescriptor {
    tag: "team",
    label: "Team",
    table: "teams",
    id_column: "id",
    search_columns: &["name", "description"],
    name_column: "name",
};

impl EntityKind {
    /// Every kind, in registry order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Project,
        EntityKind::Task,
        EntityKind::User,
        EntityKind::Team,
    ];

    pub fn descriptor(self) -> &'static KindDescriptor {
        match self {
            EntityKind::Project => &PROJECT,
            EntityKind::Task => &TASK,
            EntityKind::User => &USER,
            EntityKind::Team => &TEAM,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.descriptor().tag
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::InvalidEntityKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Polymorphic reference
// ---------------------------------------------------------------------------

/// A reference to one entity of any kind.
///
/// Replaces the `(entity_type, entity_id)` column pair so an id can never be
/// read under the wrong kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Project(ProjectId),
    Task(TaskId),
    User(UserId),
    Team(TeamId),
}

impl EntityRef {
    /// Build a reference from caller input, rejecting non-positive ids.
    pub fn new(kind: EntityKind, id: DbId) -> Result<Self, CoreError> {
        require_positive("entity_id", id)?;
        Ok(Self::from_parts(kind, id))
    }

    /// Parse a wire tag and id.
    pub fn parse(tag: &str, id: DbId) -> Result<Self, CoreError> {
        Self::new(tag.parse()?, id)
    }

    /// Build a reference from trusted parts (e.g. a stored row).
    pub fn from_parts(kind: EntityKind, id: DbId) -> Self {
        match kind {
            EntityKind::Project => EntityRef::Project(ProjectId(id)),
            EntityKind::Task => EntityRef::Task(TaskId(id)),
            EntityKind::User => EntityRef::User(UserId(id)),
            EntityKind::Team => EntityRef::Team(TeamId(id)),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Project(_) => EntityKind::Project,
            EntityRef::Task(_) => EntityKind::Task,
            EntityRef::User(_) => EntityKind::User,
            EntityRef::Team(_) => EntityKind::Team,
        }
    }

    /// The raw key, meaningful only together with [`EntityRef::kind`].
    pub fn id(&self) -> DbId {
        match *self {
            EntityRef::Project(id) => id.get(),
            EntityRef::Task(id) => id.get(),
            EntityRef::User(id) => id.get(),
            EntityRef::Team(id) => id.get(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// A stored record that can report which entity it is.
///
/// Implemented per record type so callers never assume a uniform primary
/// key field name.
pub trait Identified {
    fn entity_ref(&self) -> EntityRef;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
