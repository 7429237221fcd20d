//! Generic entity value shared by all aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Version;

/// Identity, version and timestamps shared by every aggregate.
///
/// Aggregates embed this value by composition rather than inheriting from a
/// base class: each aggregate struct holds an `Entity<Id>` field and exposes
/// the accessors it needs.
///
/// `created_at` is set once at construction and never changes; `updated_at`
/// advances on every mutation via [`Entity::touch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity<I> {
    id: I,
    version: Version,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<I: Copy> Entity<I> {
    /// Creates a new entity with the given identity at version 0.
    pub fn new(id: I) -> Self {
        let now = Utc::now();
        Self {
            id,
            version: Version::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs an entity from stored state.
    pub fn restore(
        id: I,
        version: Version,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            version,
            created_at,
            updated_at,
        }
    }

    /// Returns the entity identity.
    pub fn id(&self) -> I {
        self.id
    }

    /// Returns the current version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Sets the version, typically after a successful persist.
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Returns when the entity was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the entity was last mutated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Advances `updated_at` to now. Called by aggregates on every mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderId;

    #[test]
    fn new_entity_starts_at_version_zero() {
        let entity = Entity::new(OrderId::new());
        assert_eq!(entity.version(), Version::initial());
        assert_eq!(entity.created_at(), entity.updated_at());
    }

    #[test]
    fn touch_advances_updated_at_only() {
        let mut entity = Entity::new(OrderId::new());
        let created = entity.created_at();
        let updated = entity.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(2));
        entity.touch();

        assert_eq!(entity.created_at(), created);
        assert!(entity.updated_at() > updated);
    }

    #[test]
    fn restore_preserves_all_fields() {
        let id = OrderId::new();
        let now = Utc::now();
        let entity = Entity::restore(id, Version::new(7), now, now);

        assert_eq!(entity.id(), id);
        assert_eq!(entity.version(), Version::new(7));
    }
}
