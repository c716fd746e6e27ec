use crate::{
    db::{profiles::ProfileKind, FavoriteRepository, ProfileRepository},
    models::{Favorite, FavoriteWithProvider},
    Error, Result,
};

pub struct FavoriteService {
    favorites: FavoriteRepository,
    profiles: ProfileRepository,
}

impl FavoriteService {
    pub fn new(favorites: FavoriteRepository, profiles: ProfileRepository) -> Self {
        Self {
            favorites,
            profiles,
        }
    }

    pub async fn list(&self, patient_id: i32) -> Result<Vec<FavoriteWithProvider>> {
        self.favorites.list_for_patient(patient_id).await
    }

    pub async fn add(&self, patient_id: i32, provider_id: i32) -> Result<Favorite> {
        if self
            .profiles
            .user_id_for(ProfileKind::Provider, provider_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(format!("No provider found with id: {provider_id}")));
        }

        let favorite = self
            .favorites
            .create(patient_id, provider_id)
            .await?
            .ok_or_else(|| Error::Conflict("Provider is already in favorites".to_string()))?;

        tracing::debug!(patient_id, provider_id, "Favorite added");
        Ok(favorite)
    }

    /// Only the patient who created a favorite may remove it.
    pub async fn remove(&self, patient_id: i32, favorite_id: i32) -> Result<()> {
        let favorite = self
            .favorites
            .get(favorite_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No favorite found with id: {favorite_id}")))?;

        if favorite.patient_id != patient_id {
            return Err(Error::Forbidden(
                "Favorites can only be removed by their owner".to_string(),
            ));
        }

        if !self.favorites.delete(favorite_id).await? {
            return Err(Error::NotFound(format!("No favorite found with id: {favorite_id}")));
        }
        Ok(())
    }
}
