use crate::{
    models::{Favorite, FavoriteWithProvider},
    Error, Result,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_patient(&self, patient_id: i32) -> Result<Vec<FavoriteWithProvider>> {
        sqlx::query_as::<_, FavoriteWithProvider>(
            r#"
            SELECT f.favorite_id, f.provider_id, f.created_at,
                   u.name AS provider_name, pr.provider_type, u.email,
                   pr.bio, pr.contact_information
            FROM favorites f
            JOIN providers pr ON pr.provider_id = f.provider_id
            JOIN users u ON u.user_id = pr.user_id
            WHERE f.patient_id = $1
            ORDER BY f.created_at DESC, f.favorite_id DESC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    /// Adds a favorite. Returns `None` when the patient already favorited
    /// this provider.
    pub async fn create(&self, patient_id: i32, provider_id: i32) -> Result<Option<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (patient_id, provider_id)
            VALUES ($1, $2)
            ON CONFLICT (patient_id, provider_id) DO NOTHING
            RETURNING favorite_id, patient_id, provider_id, created_at
            "#,
        )
        .bind(patient_id)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    pub async fn get(&self, favorite_id: i32) -> Result<Option<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            r#"
            SELECT favorite_id, patient_id, provider_id, created_at
            FROM favorites
            WHERE favorite_id = $1
            "#,
        )
        .bind(favorite_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    pub async fn delete(&self, favorite_id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE favorite_id = $1")
            .bind(favorite_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
