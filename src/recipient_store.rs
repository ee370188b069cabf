use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Recipient, Role};

/// Read access to the users that notifications can be sent to.
#[async_trait]
pub trait RecipientStore: Send + Sync {
    /// Full snapshot, ordered by id.
    async fn get_all(&self) -> Result<Vec<Recipient>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Recipient>, StoreError>;
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("couldn't query the users table, sqlx error {0}")]
    Query(#[from] sqlx::Error),
    #[error("user {id} has an invalid row, {reason}")]
    InvalidRow { id: i64, reason: String },
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
}

impl TryFrom<UserRow> for Recipient {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::try_from(row.role.as_str())
            .map_err(|reason| StoreError::InvalidRow { id: row.id, reason })?;
        Ok(Recipient {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
        })
    }
}

pub struct PgRecipientStore {
    pool: PgPool,
}

impl PgRecipientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientStore for PgRecipientStore {
    #[tracing::instrument(name = "Loading every user from the database", skip(self))]
    async fn get_all(&self) -> Result<Vec<Recipient>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
    SELECT id::BIGINT AS id, name, email, role FROM users ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Recipient::try_from).collect()
    }

    #[tracing::instrument(name = "Loading a user by id from the database", skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Recipient>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
    SELECT id::BIGINT AS id, name, email, role FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Recipient::try_from).transpose()
    }
}

/// A fixed snapshot held in memory.
///
/// Lets callers of [`crate::startup::Application::build_with_store`] run the
/// service without Postgres. The API tests rely on it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecipientStore {
    recipients: Vec<Recipient>,
}

impl InMemoryRecipientStore {
    pub fn new(mut recipients: Vec<Recipient>) -> Self {
        recipients.sort_by_key(|r| r.id);
        recipients.dedup_by_key(|r| r.id);
        Self { recipients }
    }
}

#[async_trait]
impl RecipientStore for InMemoryRecipientStore {
    async fn get_all(&self) -> Result<Vec<Recipient>, StoreError> {
        Ok(self.recipients.clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Recipient>, StoreError> {
        Ok(self.recipients.iter().find(|r| r.id == id).cloned())
    }
}
