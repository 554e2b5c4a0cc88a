use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Catalog entry referenced by workout line items.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Exercise>> {
    sqlx::query_as::<_, Exercise>(
        r#"
        SELECT id, name, description, category, created_at, updated_at
        FROM exercises
        ORDER BY name ASC, id ASC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<Exercise>> {
    sqlx::query_as::<_, Exercise>(
        r#"
        SELECT id, name, description, category, created_at, updated_at
        FROM exercises
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create(
    db: &PgPool,
    name: &str,
    description: &str,
    category: &str,
) -> sqlx::Result<Exercise> {
    let now = OffsetDateTime::now_utc();
    sqlx::query_as::<_, Exercise>(
        r#"
        INSERT INTO exercises (name, description, category, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, name, description, category, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(category)
    .bind(now)
    .fetch_one(db)
    .await
}
