//! Location domain service implementing the location driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    LocationCommand, LocationQuery, LocationRepository, LocationRepositoryError,
};
use crate::domain::{Error, Location, LocationDraft, LocationId, UserId};

/// Location service implementing [`LocationCommand`] and [`LocationQuery`].
#[derive(Clone)]
pub struct LocationService<R> {
    location_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> LocationService<R> {
    pub fn new(location_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            location_repo,
            clock,
        }
    }
}

pub(crate) fn map_location_repository_error(error: LocationRepositoryError) -> Error {
    match error {
        LocationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("location repository unavailable: {message}"))
        }
        LocationRepositoryError::Query { message } => {
            Error::internal(format!("location repository error: {message}"))
        }
    }
}

impl<R> LocationService<R>
where
    R: LocationRepository,
{
    async fn owned_location(
        &self,
        actor: &UserId,
        location_id: &LocationId,
    ) -> Result<Location, Error> {
        let location = self
            .location_repo
            .find_by_id(location_id)
            .await
            .map_err(map_location_repository_error)?
            .ok_or_else(|| Error::not_found(format!("location {location_id} not found")))?;

        if !location.is_owned_by(actor) {
            warn!(%actor, %location_id, "location access refused for non-owner");
            return Err(Error::forbidden(
                "only the location owner may access this location",
            ));
        }
        Ok(location)
    }
}

#[async_trait]
impl<R> LocationCommand for LocationService<R>
where
    R: LocationRepository,
{
    async fn create(&self, actor: UserId, draft: LocationDraft) -> Result<Location, Error> {
        let location =
            Location::from_draft(LocationId::random(), actor, draft, self.clock.utc());
        self.location_repo
            .create(&location)
            .await
            .map_err(map_location_repository_error)?;

        info!(location_id = %location.id, owner = %actor, "location created");
        Ok(location)
    }

    async fn update(
        &self,
        actor: UserId,
        location_id: LocationId,
        draft: LocationDraft,
    ) -> Result<Location, Error> {
        let mut location = self.owned_location(&actor, &location_id).await?;
        location.revise(draft, self.clock.utc());
        self.location_repo
            .update(&location)
            .await
            .map_err(map_location_repository_error)?;

        info!(%location_id, "location updated");
        Ok(location)
    }

    async fn delete(&self, actor: UserId, location_id: LocationId) -> Result<(), Error> {
        self.owned_location(&actor, &location_id).await?;
        let removed = self
            .location_repo
            .delete(&location_id)
            .await
            .map_err(map_location_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("location {location_id} not found")));
        }

        info!(%location_id, "location deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> LocationQuery for LocationService<R>
where
    R: LocationRepository,
{
    async fn list(&self, actor: UserId) -> Result<Vec<Location>, Error> {
        self.location_repo
            .list_for_owner(&actor)
            .await
            .map_err(map_location_repository_error)
    }

    async fn get(&self, actor: UserId, location_id: LocationId) -> Result<Location, Error> {
        self.owned_location(&actor, &location_id).await
    }
}
