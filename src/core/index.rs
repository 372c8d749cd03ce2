use crate::domain::model::{DerivedView, Entity};
use crate::utils::error::{CatalogError, KeyKind, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// An entity paired with its derived view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedEntity<'a> {
    pub entity: &'a Entity,
    pub view: &'a DerivedView,
}

/// Read-only lookup over one derivation pass, keyed by reference and by URL slug.
#[derive(Debug)]
pub struct EntityIndex {
    entities: Vec<Entity>,
    views: Vec<DerivedView>,
    by_reference: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

impl EntityIndex {
    /// `views[i]` must be the view derived from `entities[i]`.
    pub fn build(entities: Vec<Entity>, views: Vec<DerivedView>) -> Result<Self> {
        if entities.len() != views.len() {
            return Err(CatalogError::malformed(format!(
                "{} entities but {} derived views",
                entities.len(),
                views.len()
            )));
        }

        let mut by_reference = HashMap::with_capacity(entities.len());
        let mut by_slug = HashMap::with_capacity(entities.len());

        for (position, entity) in entities.iter().enumerate() {
            insert_unique(&mut by_reference, &entity.reference, position, KeyKind::Reference)?;
            insert_unique(&mut by_slug, &entity.url_slug, position, KeyKind::UrlSlug)?;
        }

        Ok(Self {
            entities,
            views,
            by_reference,
            by_slug,
        })
    }

    pub fn all_entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Views in dataset order.
    pub fn derived_views(&self) -> &[DerivedView] {
        &self.views
    }

    pub fn derived_by_reference(&self) -> HashMap<&str, &DerivedView> {
        self.by_reference
            .iter()
            .map(|(reference, &position)| (reference.as_str(), &self.views[position]))
            .collect()
    }

    pub fn by_reference(&self, reference: &str) -> Option<IndexedEntity<'_>> {
        self.by_reference
            .get(reference)
            .map(|&position| self.at(position))
    }

    /// `None` is the normal not-found outcome, not an error.
    pub fn find_by_url_slug(&self, slug: &str) -> Option<&Entity> {
        self.by_slug.get(slug).map(|&position| &self.entities[position])
    }

    pub fn view_by_url_slug(&self, slug: &str) -> Option<IndexedEntity<'_>> {
        self.by_slug.get(slug).map(|&position| self.at(position))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn at(&self, position: usize) -> IndexedEntity<'_> {
        IndexedEntity {
            entity: &self.entities[position],
            view: &self.views[position],
        }
    }
}

fn insert_unique(
    keys: &mut HashMap<String, usize>,
    key: &str,
    position: usize,
    kind: KeyKind,
) -> Result<()> {
    match keys.entry(key.to_string()) {
        Entry::Occupied(_) => Err(CatalogError::DuplicateKey {
            kind,
            key: key.to_string(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(position);
            Ok(())
        }
    }
}
