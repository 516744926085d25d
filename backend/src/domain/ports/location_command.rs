//! Driving port for location writes.

use async_trait::async_trait;

use crate::domain::{Error, Location, LocationDraft, LocationId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationCommand: Send + Sync {
    async fn create(&self, actor: UserId, draft: LocationDraft) -> Result<Location, Error>;

    /// Replace a location's details. Only the owner may do this.
    async fn update(
        &self,
        actor: UserId,
        location_id: LocationId,
        draft: LocationDraft,
    ) -> Result<Location, Error>;

    async fn delete(&self, actor: UserId, location_id: LocationId) -> Result<(), Error>;
}
