use chrono::{DateTime, Utc};
use intramail_types::Email;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("storage failure: {0}")]
pub struct StorageError(#[from] sqlx::Error);

/// Row to insert. `sent_at` falls back to the store's clock when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub sent_at: Option<DateTime<Utc>>,
}

pub trait EmailStore: Clone + Send + Sync + 'static {
    fn insert(&self, email: NewEmail) -> impl Future<Output = Result<Email, StorageError>> + Send;

    /// Every email, in insertion order.
    fn select_all(&self) -> impl Future<Output = Result<Vec<Email>, StorageError>> + Send;

    /// Exact, case-sensitive match on `recipient`, newest `sent_at` first,
    /// ties broken by descending id.
    fn select_by_recipient(
        &self,
        recipient: &str,
    ) -> impl Future<Output = Result<Vec<Email>, StorageError>> + Send;

    fn select_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Email>, StorageError>> + Send;
}

#[derive(Debug, sqlx::FromRow)]
struct EmailRow {
    id: i64,
    sender: String,
    recipient: String,
    subject: String,
    body: String,
    sent_at: DateTime<Utc>,
}

impl From<EmailRow> for Email {
    fn from(row: EmailRow) -> Self {
        Self {
            id: row.id,
            sender: row.sender,
            recipient: row.recipient,
            subject: row.subject,
            body: row.body,
            sent_at: row.sent_at,
        }
    }
}

#[derive(Clone)]
pub struct PgEmailStore {
    db: sqlx::Pool<sqlx::Postgres>,
}

impl PgEmailStore {
    pub fn new(db: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self { db }
    }
}

impl EmailStore for PgEmailStore {
    async fn insert(&self, email: NewEmail) -> Result<Email, StorageError> {
        let row = sqlx::query_as::<_, EmailRow>(
            r#"
            INSERT INTO emails (sender, recipient, subject, body, sent_at)
            VALUES ($1, $2, $3, $4, COALESCE($5, now()))
            RETURNING id, sender, recipient, subject, body, sent_at
            "#,
        )
        .bind(email.sender)
        .bind(email.recipient)
        .bind(email.subject)
        .bind(email.body)
        .bind(email.sent_at)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn select_all(&self) -> Result<Vec<Email>, StorageError> {
        let rows = sqlx::query_as::<_, EmailRow>(
            r#"
            SELECT id, sender, recipient, subject, body, sent_at
            FROM emails
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Email::from).collect())
    }

    async fn select_by_recipient(&self, recipient: &str) -> Result<Vec<Email>, StorageError> {
        let rows = sqlx::query_as::<_, EmailRow>(
            r#"
            SELECT id, sender, recipient, subject, body, sent_at
            FROM emails
            WHERE recipient = $1
            ORDER BY sent_at DESC, id DESC
            "#,
        )
        .bind(recipient)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Email::from).collect())
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<Email>, StorageError> {
        let row = sqlx::query_as::<_, EmailRow>(
            r#"
            SELECT id, sender, recipient, subject, body, sent_at
            FROM emails
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Email::from))
    }
}
