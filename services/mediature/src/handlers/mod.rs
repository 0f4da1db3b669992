pub mod agent;
pub mod invitation;
pub mod user;

use serde::Serialize;

use crate::domain::types::UserSummary;

/// Public-safe user subset embedded in denormalized responses.
#[derive(Serialize)]
pub struct UserSummaryResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            email: user.email,
            firstname: user.firstname,
            lastname: user.lastname,
        }
    }
}
