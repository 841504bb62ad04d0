// src/application/table_provisioner.rs
use crate::application::NoteRepository;
use crate::domain::DomainError;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// What ensure_table had to do to get the table ready
#[derive(Debug, Clone, PartialEq)]
pub struct Provisioning {
    pub created: bool,
    /// Status reported by the create call, only set when the table was created
    pub creation_status: Option<String>,
    /// Status after provisioning finished
    pub status: String,
}

pub struct TableProvisioner<R: NoteRepository> {
    repository: R,
}

impl<R: NoteRepository> TableProvisioner<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Create the table unless it already exists, then wait for it to become usable
    #[instrument(level = "debug", skip(self))]
    pub async fn ensure_table(
        &self,
        table: &str,
        max_wait: Duration,
    ) -> Result<Provisioning, DomainError> {
        let mut creation_status = None;

        if !self.repository.table_exists(table).await? {
            info!(table, "Table does not exist, creating it");
            let status = self.repository.create_table(table).await?;
            debug!(table, %status, "Create call returned");
            self.repository.wait_for_table(table, max_wait).await?;
            creation_status = Some(status);
        }

        let status = self.repository.table_status(table).await?;
        Ok(Provisioning {
            created: creation_status.is_some(),
            creation_status,
            status,
        })
    }

    pub async fn drop_table(&self, table: &str) -> Result<(), DomainError> {
        info!(table, "Deleting table");
        self.repository.delete_table(table).await
    }
}
