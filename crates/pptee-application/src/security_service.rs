//! Security overview service.

use std::sync::Arc;

use pptee_core::capability::{CapabilityRepository, CapabilityTarget};
use pptee_core::error::Result;
use pptee_core::security::{SecurityOverview, TeeStatus};
use pptee_core::session::SessionRepository;

#[derive(Clone)]
pub struct SecurityService {
    session_repository: Arc<dyn SessionRepository>,
    capability_repository: Arc<dyn CapabilityRepository>,
}

impl SecurityService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        capability_repository: Arc<dyn CapabilityRepository>,
    ) -> Self {
        Self {
            session_repository,
            capability_repository,
        }
    }

    pub async fn overview(&self) -> Result<SecurityOverview> {
        let session = self.session_repository.load().await?;
        session.require_authenticated()?;

        let device = CapabilityTarget::Device;
        let cloud = CapabilityTarget::Cloud;
        Ok(SecurityOverview::new(
            TeeStatus::derive(device, &session, self.capability_repository.get(device).await?),
            TeeStatus::derive(cloud, &session, self.capability_repository.get(cloud).await?),
        ))
    }
}
