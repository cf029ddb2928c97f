// Copyright 2025 Cowboy AI, LLC.

//! Typed identities and the aggregate root contract

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed entity ID using phantom types for type safety
///
/// The phantom type parameter keeps case, defendant and offence ids apart at
/// compile time even though all of them are UUIDs on the wire.
///
/// # Examples
///
/// ```rust
/// use prosecution_casefile::EntityId;
/// use prosecution_casefile::markers::{CaseMarker, DefendantMarker};
///
/// let case_id = EntityId::<CaseMarker>::new();
/// let defendant_id = EntityId::<DefendantMarker>::new();
///
/// // let _: EntityId<CaseMarker> = defendant_id; // does not compile
/// assert_ne!(case_id.as_uuid(), defendant_id.as_uuid());
/// ```
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }
}

// Manual impls so marker types don't need to implement these traits themselves.
impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.id)
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JsonSchema for EntityId<T> {
    fn schema_name() -> String {
        "EntityId".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        Uuid::json_schema(gen)
    }

    fn is_referenceable() -> bool {
        false
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

/// Marker trait for aggregate roots
///
/// All changes to defendants and offences of a case go through the case-file
/// root, which carries the version used for optimistic concurrency.
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version for optimistic concurrency
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);
}

// Marker types for entity IDs
/// Marker for prosecution case files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseMarker;

/// Marker for defendants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefendantMarker;

/// Marker for offences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffenceMarker;

/// Marker for group prosecutions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMarker;

/// Marker for command entities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandMarker;

/// Marker for query entities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryMarker;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_new() {
        let id1 = EntityId::<CaseMarker>::new();
        let id2 = EntityId::<CaseMarker>::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_uuid().is_nil());
    }

    #[test]
    fn test_entity_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = EntityId::<DefendantMarker>::from_uuid(uuid);

        assert_eq!(*id.as_uuid(), uuid);
        assert_eq!(Uuid::from(id), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_entity_id_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = EntityId::<OffenceMarker>::from_uuid(uuid);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));

        let back: EntityId<OffenceMarker> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_aggregate_root_version() {
        struct Dummy {
            id: EntityId<CaseMarker>,
            version: u64,
        }
        impl AggregateRoot for Dummy {
            type Id = EntityId<CaseMarker>;
            fn id(&self) -> Self::Id {
                self.id
            }
            fn version(&self) -> u64 {
                self.version
            }
            fn increment_version(&mut self) {
                self.version += 1;
            }
        }

        let mut d = Dummy {
            id: EntityId::new(),
            version: 0,
        };
        d.increment_version();
        d.increment_version();
        assert_eq!(d.version(), 2);
        assert!(!d.id().as_uuid().is_nil());
    }
}
