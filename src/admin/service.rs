use serde::{Deserialize, Serialize};

use crate::admin::pagination::{PageRequest, Paginated};
use crate::auth::authorize_admin;
use crate::db::{DbOperations, MessageWithAuthor, UserSummary};
use crate::session::Session;
use crate::Result;

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub users: Paginated<UserSummary>,
    pub messages: Paginated<MessageWithAuthor>,
}

#[derive(Clone)]
pub struct AdminService {
    db: DbOperations,
}

impl AdminService {
    pub fn new(db: DbOperations) -> Self {
        Self { db }
    }

    /// Both blocks are paginated independently, newest first. Nothing is
    /// queried unless the session passes the admin policy.
    pub async fn dashboard(
        &self,
        session: &Session,
        users_page: PageRequest,
        messages_page: PageRequest,
    ) -> Result<AdminDashboard> {
        authorize_admin(session)?;

        let total_users = self.db.count_users().await?;
        let users = self
            .db
            .list_users(users_page.limit(), users_page.offset())
            .await?;

        let total_messages = self.db.count_messages().await?;
        let messages = self
            .db
            .list_messages(messages_page.limit(), messages_page.offset())
            .await?;

        Ok(AdminDashboard {
            users: Paginated::new(users, total_users, users_page),
            messages: Paginated::new(messages, total_messages, messages_page),
        })
    }
}
