use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAccessRepository, DbAgentRepository, DbAuthorityRepository, DbInvitationRepository,
    DbLiveChatRepository, DbUserRepository,
};
use crate::usecase::access::AccessControl;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub front_base_url: String,
}

impl AppState {
    pub fn access_control(&self) -> AccessControl<DbAccessRepository> {
        AccessControl {
            repo: DbAccessRepository {
                db: self.db.clone(),
            },
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn authority_repo(&self) -> DbAuthorityRepository {
        DbAuthorityRepository {
            db: self.db.clone(),
        }
    }

    pub fn agent_repo(&self) -> DbAgentRepository {
        DbAgentRepository {
            db: self.db.clone(),
        }
    }

    pub fn invitation_repo(&self) -> DbInvitationRepository {
        DbInvitationRepository {
            db: self.db.clone(),
        }
    }

    pub fn live_chat_repo(&self) -> DbLiveChatRepository {
        DbLiveChatRepository {
            db: self.db.clone(),
        }
    }
}
