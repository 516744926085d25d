//! Driving port for reading locations.

use async_trait::async_trait;

use crate::domain::{Error, Location, LocationId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationQuery: Send + Sync {
    async fn list(&self, actor: UserId) -> Result<Vec<Location>, Error>;

    async fn get(&self, actor: UserId, location_id: LocationId) -> Result<Location, Error>;
}
