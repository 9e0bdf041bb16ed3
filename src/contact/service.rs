use tracing::info;

use crate::db::{DbOperations, NewMessage};
use crate::error::AppError;
use crate::messages;
use crate::session::Session;
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    fn validate(&self) -> Result<()> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::ValidationError(messages::FIELDS_REQUIRED.into()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct ContactService {
    db: DbOperations,
}

impl ContactService {
    pub fn new(db: DbOperations) -> Self {
        Self { db }
    }

    /// Stores the message tagged with the submitting user's id.
    pub async fn submit(&self, session: &Session, form: &ContactForm) -> Result<i64> {
        form.validate()?;

        let id = self
            .db
            .insert_message(&NewMessage {
                user_id: session.user_id,
                name: form.name.trim(),
                email: form.email.trim(),
                subject: form.subject.trim(),
                message: &form.message,
            })
            .await?;

        info!("Stored contact message {} from user {}", id, session.username);
        Ok(id)
    }
}
