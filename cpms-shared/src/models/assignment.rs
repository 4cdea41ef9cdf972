/// Assignment management for the two member join tables
///
/// Projects and tasks share an identical assignment protocol over their
/// respective join tables (`project_members`, `task_members`): the only
/// mutation is **replace-all**, which swaps a parent's complete member set
/// for a newly supplied one. [`ParentKind`] selects the table so both
/// variants run through one implementation.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     member_id UUID NOT NULL REFERENCES members(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// -- task_members is identical with task_id in place of project_id
/// ```
///
/// Join rows have no identity beyond the pair, and the pair carries no
/// uniqueness constraint: callers submitting duplicate member ids get
/// duplicate rows back.
///
/// # Atomicity
///
/// [`Assignment::replace_for_parent`] runs the delete and the batch insert
/// inside one transaction. If any submitted member id does not exist, the
/// insert's foreign key check fails and the delete rolls back, leaving the
/// parent's prior assignment set intact.
///
/// # Example
///
/// ```no_run
/// use cpms_shared::models::assignment::{Assignment, ParentKind};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid, m1: Uuid, m2: Uuid) -> Result<(), sqlx::Error> {
/// // Assign two members, replacing whatever was there before
/// let views = Assignment::replace_for_parent(
///     &pool, ParentKind::Project, project_id, &[m1, m2],
/// ).await?;
/// assert_eq!(views.len(), 2);
///
/// // Unassign everyone
/// let views = Assignment::replace_for_parent(
///     &pool, ParentKind::Project, project_id, &[],
/// ).await?;
/// assert!(views.is_empty());
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::PgPool;
use uuid::Uuid;

use super::member::MemberRole;

/// Which join table an assignment operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    /// The `project_members` table
    Project,

    /// The `task_members` table
    Task,
}

impl ParentKind {
    /// Join table name
    pub fn table(&self) -> &'static str {
        match self {
            ParentKind::Project => "project_members",
            ParentKind::Task => "task_members",
        }
    }

    /// Name of the parent foreign key column, also used as the JSON key of
    /// the serialized view
    pub fn parent_column(&self) -> &'static str {
        match self {
            ParentKind::Project => "project_id",
            ParentKind::Task => "task_id",
        }
    }
}

/// Member details embedded in an assignment view
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberSummary {
    /// Member ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Team role
    pub role: MemberRole,
}

/// Denormalized assignment view: one join row with its member details
///
/// Serializes as `{"project_id": ..., "member": {...}}` or
/// `{"task_id": ..., "member": {...}}` depending on the parent kind, so the
/// two API variants keep their distinct wire shapes.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Which join table the row came from
    pub kind: ParentKind,

    /// Parent (project or task) ID
    pub parent_id: Uuid,

    /// Assigned member
    pub member: MemberSummary,
}

impl Serialize for Assignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.kind.parent_column(), &self.parent_id)?;
        map.serialize_entry("member", &self.member)?;
        map.end()
    }
}

/// Row shape shared by the two list queries
#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    parent_id: Uuid,
    member_id: Uuid,
    name: String,
    email: String,
    role: MemberRole,
}

impl AssignmentRow {
    fn into_assignment(self, kind: ParentKind) -> Assignment {
        Assignment {
            kind,
            parent_id: self.parent_id,
            member: MemberSummary {
                id: self.member_id,
                name: self.name,
                email: self.email,
                role: self.role,
            },
        }
    }
}

impl Assignment {
    /// Lists every assignment of the given kind, joined with member details
    ///
    /// Ordered by join-row creation time, newest first. Used to build a
    /// global parent→members map in one request instead of one per parent.
    pub async fn list_all(pool: &PgPool, kind: ParentKind) -> Result<Vec<Self>, sqlx::Error> {
        // Table and column names come from ParentKind, never from input.
        let query = format!(
            r#"
            SELECT jt.{parent} AS parent_id, m.id AS member_id, m.name, m.email, m.role
            FROM {table} jt
            JOIN members m ON m.id = jt.member_id
            ORDER BY jt.created_at DESC
            "#,
            parent = kind.parent_column(),
            table = kind.table(),
        );

        let rows = sqlx::query_as::<_, AssignmentRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_assignment(kind))
            .collect())
    }

    /// Lists the assignments of one parent, joined with member details
    ///
    /// A parent with no assignments and a nonexistent parent both yield an
    /// empty list; the store does not distinguish them at this layer.
    pub async fn list_for_parent(
        pool: &PgPool,
        kind: ParentKind,
        parent_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT jt.{parent} AS parent_id, m.id AS member_id, m.name, m.email, m.role
            FROM {table} jt
            JOIN members m ON m.id = jt.member_id
            WHERE jt.{parent} = $1
            ORDER BY jt.created_at DESC
            "#,
            parent = kind.parent_column(),
            table = kind.table(),
        );

        let rows = sqlx::query_as::<_, AssignmentRow>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_assignment(kind))
            .collect())
    }

    /// Replaces a parent's complete assignment set
    ///
    /// `member_ids` is the full desired membership: duplicates produce
    /// duplicate rows, and an empty slice means "unassign all". The whole
    /// operation is one transaction:
    ///
    /// 1. delete every existing join row for the parent;
    /// 2. if `member_ids` is empty, commit and return an empty list;
    /// 3. otherwise insert the batch in a single statement (all rows share
    ///    one creation timestamp) and return the denormalized views in
    ///    submission order.
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if any member id (or the parent)
    /// does not exist; the transaction rolls back and the prior assignment
    /// set is kept.
    pub async fn replace_for_parent(
        pool: &PgPool,
        kind: ParentKind,
        parent_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let delete = format!(
            "DELETE FROM {table} WHERE {parent} = $1",
            table = kind.table(),
            parent = kind.parent_column(),
        );
        sqlx::query(&delete)
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;

        if member_ids.is_empty() {
            tx.commit().await?;
            return Ok(Vec::new());
        }

        // UNNEST keeps duplicates; a single statement gives every row the
        // same created_at.
        let insert = format!(
            "INSERT INTO {table} ({parent}, member_id) SELECT $1, m FROM UNNEST($2::uuid[]) AS m",
            table = kind.table(),
            parent = kind.parent_column(),
        );
        sqlx::query(&insert)
            .bind(parent_id)
            .bind(member_ids)
            .execute(&mut *tx)
            .await?;

        let members = sqlx::query_as::<_, MemberSummary>(
            "SELECT id, name, email, role FROM members WHERE id = ANY($1)",
        )
        .bind(member_ids)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        // The insert's foreign keys guarantee every id resolved; rebuild in
        // submission order so duplicates are preserved.
        let by_id: HashMap<Uuid, MemberSummary> =
            members.into_iter().map(|m| (m.id, m)).collect();

        member_ids
            .iter()
            .map(|id| {
                let member = by_id.get(id).cloned().ok_or(sqlx::Error::RowNotFound)?;
                Ok(Assignment {
                    kind,
                    parent_id,
                    member,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_kind_tables() {
        assert_eq!(ParentKind::Project.table(), "project_members");
        assert_eq!(ParentKind::Project.parent_column(), "project_id");
        assert_eq!(ParentKind::Task.table(), "task_members");
        assert_eq!(ParentKind::Task.parent_column(), "task_id");
    }

    #[test]
    fn test_assignment_serializes_with_kind_specific_key() {
        let member = MemberSummary {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: MemberRole::Lead,
        };

        let project_view = Assignment {
            kind: ParentKind::Project,
            parent_id: Uuid::new_v4(),
            member: member.clone(),
        };
        let json = serde_json::to_value(&project_view).unwrap();
        assert!(json.get("project_id").is_some());
        assert!(json.get("task_id").is_none());
        assert_eq!(json["member"]["role"], "lead");

        let task_view = Assignment {
            kind: ParentKind::Task,
            parent_id: Uuid::new_v4(),
            member,
        };
        let json = serde_json::to_value(&task_view).unwrap();
        assert!(json.get("task_id").is_some());
        assert!(json.get("project_id").is_none());
    }

    // Database behavior (replace-all, duplicates, rollback) is covered in
    // tests/assignment_tests.rs
}
