use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{CheckState, CommandKind, Datastore, HostSystem, ObjectKind, Resource, Thresholds};
use crate::ports::ManagementSession;

use super::selector::{self, Selection};
use super::CheckError;

/// Outcome of one check run
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub command: CommandKind,
    pub object_kind: ObjectKind,
    pub state: CheckState,
    pub thresholds: Thresholds,
    pub selected: Resource,
    pub resources: Vec<Resource>,
}

/// Main application service: enumerate, select, compute and classify
pub struct CheckService {
    session: Arc<dyn ManagementSession>,
}

impl CheckService {
    pub fn new(session: Arc<dyn ManagementSession>) -> Self {
        Self { session }
    }

    /// Run the check and release the session afterwards, whatever the result
    pub async fn run(&self, config: &Config) -> Result<CheckReport, CheckError> {
        let result = self.evaluate(config).await;

        if let Err(e) = self.session.logout().await {
            warn!("Failed to log out of {}: {}", config.endpoint, e);
        }

        result
    }

    async fn evaluate(&self, config: &Config) -> Result<CheckReport, CheckError> {
        let kind = config.command.object_kind();
        let properties: &[&str] = match kind {
            ObjectKind::HostSystem => &HostSystem::PROPERTIES,
            ObjectKind::Datastore => &Datastore::PROPERTIES,
        };

        let objects = self.session.enumerate(kind, properties).await?;
        info!("Retrieved {} {} objects", objects.len(), kind);
        for object in &objects {
            info!("  {} {}", object.reference, object.get("name").unwrap_or("<unnamed>"));
        }

        let Selection { selected, resources } = match config.command {
            CommandKind::Vmfs => {
                selector::select_datastore(&objects, config.datastore.as_deref().unwrap_or_default())?
            }
            command => selector::select_host(&objects, command, config.host_system.as_deref())?,
        };

        let state = config.thresholds.classify(selected.free_percent());
        info!(
            "{} {}: total {} free {} ({}%) -> {}",
            kind,
            selected.name,
            selected.total,
            selected.free,
            selected.free_percent_display(),
            state
        );

        Ok(CheckReport {
            command: config.command,
            object_kind: kind,
            state,
            thresholds: config.thresholds,
            selected,
            resources,
        })
    }
}
