//! Workstation Repository

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{Workstation, WorkstationCreate, WorkstationUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "workstation";

#[derive(Clone)]
pub struct WorkstationRepository {
    base: BaseRepository,
}

impl WorkstationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active workstations
    pub async fn find_all(&self) -> RepoResult<Vec<Workstation>> {
        let stations: Vec<Workstation> = self
            .base
            .db()
            .query("SELECT * FROM workstation WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(stations)
    }

    /// Find workstation by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Workstation>> {
        let station: Option<Workstation> =
            self.base.db().select((TABLE, record_key(id))).await?;
        Ok(station)
    }

    /// Find workstation by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Workstation>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM workstation WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let stations: Vec<Workstation> = result.take(0)?;
        Ok(stations.into_iter().next())
    }

    /// Create a new workstation
    pub async fn create(&self, data: WorkstationCreate) -> RepoResult<Workstation> {
        // Check duplicate name
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Workstation '{}' already exists",
                data.name
            )));
        }

        let station = Workstation {
            id: None,
            name: data.name,
            max_capacity: data.max_capacity,
            description: data.description,
            is_active: true,
        };

        let created: Option<Workstation> = self.base.db().create(TABLE).content(station).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create workstation".to_string()))
    }

    /// Update a workstation
    pub async fn update(&self, id: &str, data: WorkstationUpdate) -> RepoResult<Workstation> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Workstation {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Workstation '{}' already exists",
                new_name
            )));
        }

        let updated: Option<Workstation> = self
            .base
            .db()
            .update((TABLE, record_key(id)))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Workstation {} not found", id)))
    }

    /// Soft delete a workstation
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result: Option<Workstation> = self
            .base
            .db()
            .update((TABLE, record_key(id)))
            .merge(WorkstationUpdate {
                name: None,
                max_capacity: None,
                description: None,
                is_active: Some(false),
            })
            .await?;
        Ok(result.is_some())
    }
}
