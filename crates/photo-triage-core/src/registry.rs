//! The canonical collection of scored photos.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Photo, PhotoId};
use crate::error::{Result, TriageError};

/// Owns every [`Photo`] in the session, keyed by identity.
///
/// Inserting and removing are crate-private: removal has to clear selection
/// and review state as well, which only [`Session`](crate::Session) can do.
/// Photos themselves are immutable, so there is no field-level mutator.
#[derive(Debug, Clone, Default)]
pub struct PhotoRegistry {
    photos: BTreeMap<PhotoId, Photo>,
}

impl PhotoRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Returns true if there are no photos.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Returns true if a photo with this identity exists.
    #[must_use]
    pub fn contains(&self, id: &PhotoId) -> bool {
        self.photos.contains_key(id)
    }

    /// Looks up a photo.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`] if the identity is absent.
    pub fn get(&self, id: &PhotoId) -> Result<&Photo> {
        self.photos
            .get(id)
            .ok_or_else(|| TriageError::NotFound(id.clone()))
    }

    /// Iterates over all photos in identity order.
    ///
    /// The iterator borrows the registry, so no insert can interleave with it.
    pub fn all(&self) -> impl Iterator<Item = &Photo> + '_ {
        self.photos.values()
    }

    pub(crate) fn ensure(&self, id: &PhotoId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TriageError::NotFound(id.clone()))
        }
    }

    pub(crate) fn insert(&mut self, photo: Photo) -> Result<()> {
        if self.photos.contains_key(photo.id()) {
            return Err(TriageError::DuplicateIdentity(photo.id().clone()));
        }
        debug!("Registering {} ({}, score {})", photo.id(), photo.name(), photo.score());
        self.photos.insert(photo.id().clone(), photo);
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: &PhotoId) -> Result<Photo> {
        let photo = self
            .photos
            .remove(id)
            .ok_or_else(|| TriageError::NotFound(id.clone()))?;
        debug!("Removed {id} from registry");
        Ok(photo)
    }
}
