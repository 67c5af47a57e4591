//! Contributor entities and the directory listing that collects them.
//!
//! An [`Entity`] is one attributed contributor as served by the remote
//! directory. A [`DirectoryListing`] keeps entities in the order the remote
//! returned them and refuses duplicate identifiers, so the first occurrence of
//! a login always wins.

use std::fmt;

use indexmap::{IndexMap, map::Entry};
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

/// One contributor record.
///
/// Entities are immutable once fetched. `contributions` is carried only to
/// describe the upstream ordering; nothing in the pipeline re-sorts on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: String,
    avatar_url: Url,
    profile_url: Url,
    contributions: u64,
}

impl Entity {
    /// Creates a new entity.
    ///
    /// # Arguments
    ///
    /// * `id` - Opaque remote key (the contributor login).
    /// * `avatar_url` - Where the avatar raster can be downloaded.
    /// * `profile_url` - Click target for the gallery fragment.
    /// * `contributions` - Contribution weight reported by the remote.
    pub fn new(id: impl Into<String>, avatar_url: Url, profile_url: Url, contributions: u64) -> Self {
        Self {
            id: id.into(),
            avatar_url,
            profile_url,
            contributions,
        }
    }

    /// Returns the remote identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the avatar source locator.
    pub fn avatar_url(&self) -> &Url {
        &self.avatar_url
    }

    /// Returns the profile locator.
    pub fn profile_url(&self) -> &Url {
        &self.profile_url
    }

    /// Returns the contribution weight.
    pub fn contributions(&self) -> u64 {
        self.contributions
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} contributions)", self.id, self.contributions)
    }
}

/// Ordered collection of unique entities for one owner/collection pair.
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    entities: IndexMap<String, Entity>,
}

impl DirectoryListing {
    /// Creates an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entity, keeping source order.
    ///
    /// Returns `false` and leaves the listing untouched when an entity with
    /// the same identifier is already present.
    pub fn push(&mut self, entity: Entity) -> bool {
        match self.entities.entry(entity.id.clone()) {
            Entry::Occupied(_) => {
                debug!(id = entity.id(); "Ignoring duplicate entity");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(entity);
                true
            }
        }
    }

    /// Appends every entity of a page, returning how many were accepted.
    pub fn extend_page(&mut self, page: impl IntoIterator<Item = Entity>) -> usize {
        let mut accepted = 0;
        for entity in page {
            if self.push(entity) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Number of entities in the listing.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the listing holds no entity.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Looks up an entity by identifier.
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Iterates entities in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }
}

impl FromIterator<Entity> for DirectoryListing {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut listing = Self::new();
        listing.extend_page(iter);
        listing
    }
}

impl<'a> IntoIterator for &'a DirectoryListing {
    type Item = &'a Entity;
    type IntoIter = indexmap::map::Values<'a, String, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, contributions: u64) -> Entity {
        Entity::new(
            id,
            Url::parse(&format!("https://avatars.example.com/{id}")).unwrap(),
            Url::parse(&format!("https://example.com/{id}")).unwrap(),
            contributions,
        )
    }

    #[test]
    fn test_listing_preserves_source_order() {
        let listing: DirectoryListing = [entity("b", 1), entity("a", 9), entity("c", 5)]
            .into_iter()
            .collect();

        let ids: Vec<&str> = listing.iter().map(Entity::id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_listing_keeps_first_duplicate() {
        let mut listing = DirectoryListing::new();
        assert!(listing.push(entity("octocat", 10)));
        assert!(!listing.push(entity("octocat", 3)));

        assert_eq!(listing.len(), 1);
        assert_eq!(listing.get("octocat").map(Entity::contributions), Some(10));
    }

    #[test]
    fn test_extend_page_counts_accepted() {
        let mut listing = DirectoryListing::new();
        assert_eq!(listing.extend_page([entity("a", 3), entity("b", 2)]), 2);
        assert_eq!(listing.extend_page([entity("b", 2), entity("c", 1)]), 1);
        assert_eq!(listing.len(), 3);
    }

    #[test]
    fn test_empty_listing() {
        let listing = DirectoryListing::new();
        assert!(listing.is_empty());
        assert_eq!(listing.iter().count(), 0);
    }

    #[test]
    fn test_entity_display() {
        assert_eq!(entity("octocat", 42).to_string(), "octocat (42 contributions)");
    }
}
