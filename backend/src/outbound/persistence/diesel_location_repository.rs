//! PostgreSQL-backed `LocationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LocationRepository, LocationRepositoryError};
use crate::domain::{Location, LocationId, UserId};

use super::diesel_error_mapping::{classify_diesel_error, pool_error_message};
use super::models::{LocationChanges, LocationRow, NewLocationRow, row_to_location};
use super::pool::{DbPool, PoolError};
use super::schema::locations;

/// Diesel-backed implementation of the [`LocationRepository`] port.
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LocationRepositoryError {
    LocationRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> LocationRepositoryError {
    classify_diesel_error(error).into_basic(
        LocationRepositoryError::query,
        LocationRepositoryError::connection,
    )
}

fn convert(row: LocationRow) -> Result<Location, LocationRepositoryError> {
    row_to_location(row).map_err(LocationRepositoryError::query)
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn find_by_id(
        &self,
        id: &LocationId,
    ) -> Result<Option<Location>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LocationRow> = locations::table
            .filter(locations::id.eq(id.as_uuid()))
            .select(LocationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(convert).transpose()
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Location>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LocationRow> = locations::table
            .filter(locations::user_id.eq(owner.as_uuid()))
            .order_by(locations::created_at.desc())
            .select(LocationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(convert).collect()
    }

    async fn create(&self, location: &Location) -> Result<(), LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(locations::table)
            .values(&NewLocationRow::from(location))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, location: &Location) -> Result<(), LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated =
            diesel::update(locations::table.filter(locations::id.eq(location.id.as_uuid())))
                .set(&LocationChanges::from(location))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(LocationRepositoryError::query(
                "location not found for update",
            ));
        }
        Ok(())
    }

    async fn delete(&self, id: &LocationId) -> Result<bool, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(locations::table.filter(locations::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
