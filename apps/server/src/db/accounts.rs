//! Identity records, role records and their owned sub-records

use crate::{
    models::{AuthUser, NewAddress, NewPhone, Role},
    Error, Result,
};
use sqlx::{PgConnection, PgPool, Row};

/// Stored login credentials for one identity record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub user_id: i32,
    pub email: String,
    pub password: String,
    #[sqlx(rename = "type")]
    pub account_type: String,
}

#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>> {
        sqlx::query_as::<_, Credentials>(
            r#"
            SELECT user_id, email, password, type
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    /// Loads the signed-in view of an identity record, including the role
    /// record's id and, for providers, the public profile fields.
    pub async fn load_auth_user(&self, user_id: i32) -> Result<AuthUser> {
        let row = sqlx::query(
            r#"
            SELECT u.user_id, u.name, u.email, u.type,
                   pa.patient_id,
                   pr.provider_id, pr.provider_type, pr.bio, pr.contact_information
            FROM users u
            LEFT JOIN patients pa ON pa.user_id = u.user_id
            LEFT JOIN providers pr ON pr.user_id = u.user_id
            WHERE u.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("No user found with id: {user_id}")))?;

        let role: Role = row.try_get::<String, _>("type")?.parse()?;
        let patient_id: Option<i32> = row.try_get("patient_id")?;
        let provider_id: Option<i32> = row.try_get("provider_id")?;

        let navigation_id = match role {
            Role::Patient => patient_id,
            Role::Provider => provider_id,
        }
        .ok_or_else(|| {
            Error::NotFound(format!("{} record not found for user {user_id}", role))
        })?;

        Ok(AuthUser {
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role,
            navigation_id,
            patient_id,
            provider_id,
            provider_type: row.try_get("provider_type")?,
            bio: row.try_get("bio")?,
            contact_information: row.try_get("contact_information")?,
        })
    }
}

pub async fn email_taken(
    conn: &mut PgConnection,
    email: &str,
    excluding_user: Option<i32>,
) -> Result<bool> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users
            WHERE LOWER(email) = LOWER($1)
              AND ($2::int IS NULL OR user_id <> $2)
        )
        "#,
    )
    .bind(email)
    .bind(excluding_user)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Database)
}

pub async fn insert_address(conn: &mut PgConnection, address: &NewAddress) -> Result<i32> {
    sqlx::query_scalar(
        r#"
        INSERT INTO addresses (street_address, apartment_number, city, state, postal_code)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING address_id
        "#,
    )
    .bind(&address.street_address)
    .bind(address.apartment_number.as_deref().filter(|s| !s.is_empty()))
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.postal_code)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Database)
}

pub async fn insert_phone(conn: &mut PgConnection, phone: &NewPhone) -> Result<i32> {
    sqlx::query_scalar(
        r#"
        INSERT INTO phone_numbers (country_code, area_code, phone_number, phone_type)
        VALUES ($1, $2, $3, $4)
        RETURNING phone_id
        "#,
    )
    .bind(&phone.country_code)
    .bind(&phone.area_code)
    .bind(&phone.phone_number)
    .bind(&phone.phone_type)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Database)
}

/// Fields of a new identity record.
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub address_id: i32,
    pub phone_id: i32,
}

pub async fn insert_user(conn: &mut PgConnection, user: NewUser<'_>) -> Result<i32> {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (name, email, password, type, address_id, phone_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING user_id
        "#,
    )
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.role.as_str())
    .bind(user.address_id)
    .bind(user.phone_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if crate::error::is_unique_violation(&e) {
            Error::Conflict(format!("Duplicate email: {}", user.email))
        } else {
            Error::Database(e)
        }
    })
}

pub async fn insert_patient(conn: &mut PgConnection, user_id: i32) -> Result<i32> {
    sqlx::query_scalar("INSERT INTO patients (user_id) VALUES ($1) RETURNING patient_id")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(Error::Database)
}

pub async fn insert_provider(
    conn: &mut PgConnection,
    user_id: i32,
    provider_type: &str,
    bio: Option<&str>,
    contact_information: Option<&str>,
) -> Result<i32> {
    sqlx::query_scalar(
        r#"
        INSERT INTO providers (user_id, provider_type, bio, contact_information)
        VALUES ($1, $2, $3, $4)
        RETURNING provider_id
        "#,
    )
    .bind(user_id)
    .bind(provider_type)
    .bind(bio)
    .bind(contact_information)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Database)
}

/// Deletes an identity record together with its owned address and phone.
///
/// Role records, favorites, contacts and associations go with it through
/// `ON DELETE CASCADE`. Returns `false` when the user does not exist.
pub async fn delete_account(conn: &mut PgConnection, user_id: i32) -> Result<bool> {
    let owned = sqlx::query(
        "DELETE FROM users WHERE user_id = $1 RETURNING address_id, phone_id",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::Database)?;

    let Some(owned) = owned else {
        return Ok(false);
    };

    if let Some(address_id) = owned.try_get::<Option<i32>, _>("address_id")? {
        sqlx::query("DELETE FROM addresses WHERE address_id = $1")
            .bind(address_id)
            .execute(&mut *conn)
            .await
            .map_err(Error::Database)?;
    }

    if let Some(phone_id) = owned.try_get::<Option<i32>, _>("phone_id")? {
        sqlx::query("DELETE FROM phone_numbers WHERE phone_id = $1")
            .bind(phone_id)
            .execute(&mut *conn)
            .await
            .map_err(Error::Database)?;
    }

    Ok(true)
}
