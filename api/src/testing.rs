//! In-process `EmailStore` doubles for unit tests.

use crate::store::{EmailStore, NewEmail, StorageError};
use chrono::Utc;
use intramail_types::Email;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MemoryEmailStore {
    emails: Arc<Mutex<Vec<Email>>>,
    calls: Arc<AtomicUsize>,
}

impl MemoryEmailStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations invoked so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl EmailStore for MemoryEmailStore {
    async fn insert(&self, email: NewEmail) -> Result<Email, StorageError> {
        self.touch();
        let mut emails = self.emails.lock().unwrap();
        let email = Email {
            id: emails.len() as i64 + 1,
            sender: email.sender,
            recipient: email.recipient,
            subject: email.subject,
            body: email.body,
            sent_at: email.sent_at.unwrap_or_else(Utc::now),
        };
        emails.push(email.clone());
        Ok(email)
    }

    async fn select_all(&self) -> Result<Vec<Email>, StorageError> {
        self.touch();
        Ok(self.emails.lock().unwrap().clone())
    }

    async fn select_by_recipient(&self, recipient: &str) -> Result<Vec<Email>, StorageError> {
        self.touch();
        let mut matching: Vec<Email> = self
            .emails
            .lock()
            .unwrap()
            .iter()
            .filter(|email| email.recipient == recipient)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<Email>, StorageError> {
        self.touch();
        Ok(self
            .emails
            .lock()
            .unwrap()
            .iter()
            .find(|email| email.id == id)
            .cloned())
    }
}

/// Store whose every operation fails as if the pool were gone.
#[derive(Clone, Default)]
pub struct FailingEmailStore;

impl EmailStore for FailingEmailStore {
    async fn insert(&self, _email: NewEmail) -> Result<Email, StorageError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn select_all(&self) -> Result<Vec<Email>, StorageError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn select_by_recipient(&self, _recipient: &str) -> Result<Vec<Email>, StorageError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn select_by_id(&self, _id: i64) -> Result<Option<Email>, StorageError> {
        Err(sqlx::Error::PoolClosed.into())
    }
}
