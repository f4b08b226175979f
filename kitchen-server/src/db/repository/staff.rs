//! Staff Repository
//!
//! Broadcast eligibility queries: only active, on-duty staff receive
//! notification fan-out.

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{StaffCreate, StaffMember};
use shared::Department;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "staff";

#[derive(Clone)]
pub struct StaffRepository {
    base: BaseRepository,
}

impl StaffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a staff record
    pub async fn create(&self, data: StaffCreate) -> RepoResult<StaffMember> {
        let member = StaffMember {
            id: None,
            name: data.name,
            department: data.department,
            on_duty: data.on_duty,
            is_active: true,
        };
        let created: Option<StaffMember> = self.base.db().create(TABLE).content(member).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create staff member".to_string()))
    }

    /// Find staff member by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<StaffMember>> {
        let member: Option<StaffMember> =
            self.base.db().select((TABLE, record_key(id))).await?;
        Ok(member)
    }

    /// All active staff currently on duty
    pub async fn find_on_duty(&self) -> RepoResult<Vec<StaffMember>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM staff WHERE is_active = true AND on_duty = true ORDER BY name",
            )
            .await?;
        Ok(result.take(0)?)
    }

    /// Active, on-duty staff in one department
    pub async fn find_on_duty_by_department(
        &self,
        department: Department,
    ) -> RepoResult<Vec<StaffMember>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM staff WHERE is_active = true AND on_duty = true \
                 AND department = $department ORDER BY name",
            )
            .bind(("department", department))
            .await?;
        Ok(result.take(0)?)
    }

    /// Toggle the on-duty flag (clock in / clock out)
    pub async fn set_on_duty(&self, id: &str, on_duty: bool) -> RepoResult<StaffMember> {
        let mut member = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Staff {} not found", id)))?;
        member.on_duty = on_duty;
        let mut content = member.clone();
        content.id = None;
        let updated: Option<StaffMember> = self
            .base
            .db()
            .update((TABLE, record_key(id)))
            .content(content)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Staff {} not found", id)))
    }
}
