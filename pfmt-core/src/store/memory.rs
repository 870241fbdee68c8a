//! In-memory project store for tests and small deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::{ProjectFilter, ProjectStore};
use crate::types::{Project, ProjectUpdate};

/// Project store backed by a shared in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryProjectStore {
    records: Arc<RwLock<HashMap<Uuid, Project>>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn get_all(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let records = self.records.read().await;
        let mut matching: Vec<Project> = records
            .values()
            .filter(|project| filter.matches(project))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matching)
    }

    async fn create(&self, project: Project) -> Result<Project> {
        let mut records = self.records.write().await;
        records.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Project> {
        let mut records = self.records.write().await;
        let project = records.get_mut(&id).ok_or(Error::NotFound(id))?;
        update.apply(project);
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        if records.remove(&id).is_none() {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }
}
