//! Procedure implementations: validate the input, then make at most one store call.

use crate::store::{EmailStore, NewEmail, StorageError};
use intramail_types::{
    CreateEmailInput, Email, GetEmailByIdInput, GetEmailsByRecipientInput, Health,
    ValidationError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub fn healthcheck() -> Health {
    Health::ok()
}

pub async fn create_email<S: EmailStore>(
    store: &S,
    input: CreateEmailInput,
) -> Result<Email, RpcError> {
    input.validate()?;

    let email = store
        .insert(NewEmail {
            sender: input.sender,
            recipient: input.recipient,
            subject: input.subject,
            body: input.body,
            sent_at: None,
        })
        .await?;

    tracing::debug!(id = email.id, "email created");
    Ok(email)
}

pub async fn get_all_emails<S: EmailStore>(store: &S) -> Result<Vec<Email>, RpcError> {
    Ok(store.select_all().await?)
}

pub async fn get_emails_by_recipient<S: EmailStore>(
    store: &S,
    input: GetEmailsByRecipientInput,
) -> Result<Vec<Email>, RpcError> {
    input.validate()?;
    Ok(store.select_by_recipient(&input.recipient).await?)
}

/// An unknown id is `Ok(None)`, not an error.
pub async fn get_email_by_id<S: EmailStore>(
    store: &S,
    input: GetEmailByIdInput,
) -> Result<Option<Email>, RpcError> {
    input.validate()?;
    Ok(store.select_by_id(input.id).await?)
}
