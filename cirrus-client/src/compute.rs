//! Compute operation endpoints

use cirrus_core::domain::operation::{Operation, OperationRef, OperationScope};
use reqwest::Url;
use tracing::debug;

use crate::error::Result;
use crate::{GoogleClient, endpoint_url, handle_response, require};

impl GoogleClient {
    // =============================================================================
    // Operations
    // =============================================================================

    /// Get a global operation
    ///
    /// # Arguments
    /// * `project` - Project the operation belongs to
    /// * `name` - Operation name
    pub async fn get_global_operation(&self, project: &str, name: &str) -> Result<Operation> {
        require(project, "project")?;
        require(name, "operation name")?;

        let url = endpoint_url(
            &self.endpoints.compute,
            &["projects", project, "global", "operations", name],
        )?;
        self.fetch_operation(url).await
    }

    /// Get a regional operation
    ///
    /// # Arguments
    /// * `project` - Project the operation belongs to
    /// * `region` - Region the operation runs in
    /// * `name` - Operation name
    pub async fn get_region_operation(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<Operation> {
        require(project, "project")?;
        require(region, "region")?;
        require(name, "operation name")?;

        let url = endpoint_url(
            &self.endpoints.compute,
            &["projects", project, "regions", region, "operations", name],
        )?;
        self.fetch_operation(url).await
    }

    /// Get a zonal operation
    ///
    /// # Arguments
    /// * `project` - Project the operation belongs to
    /// * `zone` - Zone the operation runs in
    /// * `name` - Operation name
    pub async fn get_zone_operation(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<Operation> {
        require(project, "project")?;
        require(zone, "zone")?;
        require(name, "operation name")?;

        let url = endpoint_url(
            &self.endpoints.compute,
            &["projects", project, "zones", zone, "operations", name],
        )?;
        self.fetch_operation(url).await
    }

    /// Get an operation from the endpoint matching its scope
    pub async fn get_operation(&self, op: &OperationRef) -> Result<Operation> {
        match &op.scope {
            OperationScope::Global => self.get_global_operation(&op.project, &op.name).await,
            OperationScope::Region(region) => {
                self.get_region_operation(&op.project, region, &op.name)
                    .await
            }
            OperationScope::Zone(zone) => {
                self.get_zone_operation(&op.project, zone, &op.name).await
            }
        }
    }

    async fn fetch_operation(&self, url: Url) -> Result<Operation> {
        debug!("GET {}", url);
        let response = self.authorize(self.client.get(url)).send().await?;

        handle_response(response).await
    }
}
