/// Member model and database operations
///
/// Members are the people assignable to projects and tasks. They are not
/// login accounts; see [`crate::models::user`] for those.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('member', 'lead', 'admin');
///
/// CREATE TABLE members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     email TEXT NOT NULL,
///     role member_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Team role of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Regular team member
    Member,

    /// Project lead
    Lead,

    /// Administrator
    Admin,
}

/// Member model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    /// Unique member ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Team role
    pub role: MemberRole,

    /// When the member was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new member
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMember {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    /// Contact email
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    /// Team role (defaults to Member)
    #[serde(default = "default_role")]
    pub role: MemberRole,
}

fn default_role() -> MemberRole {
    MemberRole::Member
}

/// Input for partially updating a member
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMember {
    /// New display name
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    /// New contact email
    #[validate(email(message = "Valid email is required"))]
    pub email: Option<String>,

    /// New team role
    pub role: Option<MemberRole>,
}

impl UpdateMember {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none()
    }
}

impl Member {
    /// Creates a new member
    pub async fn create(pool: &PgPool, data: CreateMember) -> Result<Self, sqlx::Error> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, role)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, role, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Lists all members, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, email, role, created_at
            FROM members
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Partially updates a member
    ///
    /// # Returns
    ///
    /// The updated member, or `None` if no member has this id
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateMember,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE members SET");
        let mut clauses: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            clauses.push(format!(" name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            clauses.push(format!(" email = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            clauses.push(format!(" role = ${}", bind_count));
        }

        query.push_str(&clauses.join(","));
        query.push_str(" WHERE id = $1 RETURNING id, name, email, role, created_at");

        let mut q = sqlx::query_as::<_, Member>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }

        let member = q.fetch_optional(pool).await?;

        Ok(member)
    }

    /// Deletes a member and returns the deleted snapshot
    ///
    /// Join rows referencing the member are removed by the store's
    /// ON DELETE CASCADE constraints.
    ///
    /// # Returns
    ///
    /// The deleted member, or `None` if no member has this id
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            DELETE FROM members
            WHERE id = $1
            RETURNING id, name, email, role, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_rejects_unknown() {
        let role: MemberRole = serde_json::from_str("\"lead\"").unwrap();
        assert_eq!(role, MemberRole::Lead);
        assert!(serde_json::from_str::<MemberRole>("\"owner\"").is_err());
    }

    #[test]
    fn test_create_member_default_role() {
        assert_eq!(default_role(), MemberRole::Member);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateMember::default().is_empty());

        let update = UpdateMember {
            role: Some(MemberRole::Lead),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
