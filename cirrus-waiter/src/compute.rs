//! Compute operation waits
//!
//! Binds the generic poller to the compute operations API. The scope of an
//! operation picks the status endpoint once, when the lookup is built; the
//! resulting lookup only carries the pre-filled call.

use async_trait::async_trait;
use cirrus_client::GoogleClient;
use cirrus_core::domain::operation::{Operation, OperationRef, OperationScope};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::PollConfig;
use crate::error::{LookupError, Result};
use crate::lookup::{OperationLookup, lookup_fn};
use crate::poller::OperationPoller;

/// Timeout used by callers that do not choose their own
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(4 * 60);

/// Lookup of one compute operation, bound to the endpoint of its scope
pub struct ComputeOperationLookup {
    op: OperationRef,
    fetch: Box<dyn OperationLookup>,
}

impl ComputeOperationLookup {
    /// Creates a lookup for `op`
    ///
    /// The status endpoint is chosen here, from the scope; each lookup then
    /// only replays the pre-filled call.
    pub fn new(client: &GoogleClient, op: OperationRef) -> Self {
        let fetch = bind(client.clone(), &op);
        Self { op, fetch }
    }

    pub fn operation(&self) -> &OperationRef {
        &self.op
    }
}

#[async_trait]
impl OperationLookup for ComputeOperationLookup {
    async fn lookup(&self) -> std::result::Result<Operation, LookupError> {
        self.fetch.lookup().await
    }

    fn describe(&self) -> String {
        self.fetch.describe()
    }
}

fn bind(client: GoogleClient, op: &OperationRef) -> Box<dyn OperationLookup> {
    let project = op.project.clone();
    let name = op.name.clone();
    let label = op.to_string();

    match op.scope.clone() {
        OperationScope::Global => Box::new(lookup_fn(move || {
            let (client, project, name) = (client.clone(), project.clone(), name.clone());
            async move {
                client
                    .get_global_operation(&project, &name)
                    .await
                    .map_err(LookupError::from)
            }
        })
        .named(label)),
        OperationScope::Region(region) => Box::new(lookup_fn(move || {
            let (client, project, region, name) =
                (client.clone(), project.clone(), region.clone(), name.clone());
            async move {
                client
                    .get_region_operation(&project, &region, &name)
                    .await
                    .map_err(LookupError::from)
            }
        })
        .named(label)),
        OperationScope::Zone(zone) => Box::new(lookup_fn(move || {
            let (client, project, zone, name) =
                (client.clone(), project.clone(), zone.clone(), name.clone());
            async move {
                client
                    .get_zone_operation(&project, &zone, &name)
                    .await
                    .map_err(LookupError::from)
            }
        })
        .named(label)),
    }
}

/// Waits for a compute operation with an explicit configuration
///
/// # Arguments
/// * `client` - Client used for the status lookups
/// * `op` - Operation to wait for
/// * `activity` - What is being waited for, e.g. "network to create"
/// * `config` - Timing of the wait
/// * `cancel` - Optional token that aborts the wait
pub async fn wait_for_operation(
    client: &GoogleClient,
    op: &OperationRef,
    activity: &str,
    config: PollConfig,
    cancel: Option<CancellationToken>,
) -> Result<Operation> {
    let lookup = ComputeOperationLookup::new(client, op.clone());
    let mut poller = OperationPoller::new(lookup, activity, config);
    if let Some(token) = cancel {
        poller = poller.with_cancellation(token);
    }
    poller.wait().await
}

/// Waits for a global operation returned by a mutating call
pub async fn wait_global(
    client: &GoogleClient,
    project: &str,
    op: &Operation,
    activity: &str,
    timeout: Duration,
) -> Result<Operation> {
    let op_ref = OperationRef::global(project, op.name.clone());
    wait_for_operation(client, &op_ref, activity, PollConfig::compute(timeout), None).await
}

/// Waits for a regional operation returned by a mutating call
pub async fn wait_region(
    client: &GoogleClient,
    project: &str,
    region: &str,
    op: &Operation,
    activity: &str,
    timeout: Duration,
) -> Result<Operation> {
    let op_ref = OperationRef::region(project, region, op.name.clone());
    wait_for_operation(client, &op_ref, activity, PollConfig::compute(timeout), None).await
}

/// Waits for a zonal operation returned by a mutating call
pub async fn wait_zone(
    client: &GoogleClient,
    project: &str,
    zone: &str,
    op: &Operation,
    activity: &str,
    timeout: Duration,
) -> Result<Operation> {
    let op_ref = OperationRef::zone(project, zone, op.name.clone());
    wait_for_operation(client, &op_ref, activity, PollConfig::compute(timeout), None).await
}
