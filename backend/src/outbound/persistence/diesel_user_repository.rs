//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{ExternalId, ProviderProfile, User, UserId};

use super::diesel_basic_error_mapping::{map_basic_pool_error, map_unique_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_unique_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
        UserPersistenceError::conflict,
    )
}

/// Rebuild a user through the domain validators so corrupt rows surface as
/// query errors rather than invalid domain values.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        external_id,
        display_name,
        email,
        avatar_url,
    } = row;
    let profile = ProviderProfile::try_from_parts(external_id, email, display_name, avatar_url)
        .map_err(|err| UserPersistenceError::query(format!("stored user {id}: {err}")))?;
    Ok(User::new(UserId::from_uuid(id), profile))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let external_id: &str = external_id.as_ref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::external_id.eq(external_id))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            external_id: user.external_id().as_ref(),
            display_name: user.display_name().as_ref(),
            email: user.email().as_ref(),
            avatar_url: user.avatar_url().as_ref(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
