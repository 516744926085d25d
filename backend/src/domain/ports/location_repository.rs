//! Port for location persistence.

use async_trait::async_trait;

use crate::domain::{Location, LocationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by location repository adapters.
    pub enum LocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "location repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "location repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_by_id(&self, id: &LocationId)
    -> Result<Option<Location>, LocationRepositoryError>;

    /// List an owner's locations, newest first.
    async fn list_for_owner(&self, owner: &UserId)
    -> Result<Vec<Location>, LocationRepositoryError>;

    async fn create(&self, location: &Location) -> Result<(), LocationRepositoryError>;

    async fn update(&self, location: &Location) -> Result<(), LocationRepositoryError>;

    /// Delete a location; games keep their row with the reference cleared.
    async fn delete(&self, id: &LocationId) -> Result<bool, LocationRepositoryError>;
}

/// Fixture implementation holding no locations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLocationRepository;

#[async_trait]
impl LocationRepository for FixtureLocationRepository {
    async fn find_by_id(
        &self,
        _id: &LocationId,
    ) -> Result<Option<Location>, LocationRepositoryError> {
        Ok(None)
    }

    async fn list_for_owner(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<Location>, LocationRepositoryError> {
        Ok(Vec::new())
    }

    async fn create(&self, _location: &Location) -> Result<(), LocationRepositoryError> {
        Ok(())
    }

    async fn update(&self, _location: &Location) -> Result<(), LocationRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &LocationId) -> Result<bool, LocationRepositoryError> {
        Ok(false)
    }
}
