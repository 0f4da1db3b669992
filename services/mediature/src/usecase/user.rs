use uuid::Uuid;

use crate::domain::repository::{
    AccessRepository, AgentRepository, LiveChatRepository, UserRepository,
};
use crate::domain::types::{InterfaceSession, LiveChatSettings, SessionAuthority, User};
use crate::error::MediatureServiceError;
use crate::usecase::access::AccessControl;

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, MediatureServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(MediatureServiceError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub firstname: String,
    pub lastname: String,
    pub profile_picture: Option<String>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, MediatureServiceError> {
        self.users
            .update_profile(
                user_id,
                &input.firstname,
                &input.lastname,
                input.profile_picture.as_deref(),
            )
            .await?
            .ok_or(MediatureServiceError::UserNotFound)
    }
}

// ── GetInterfaceSession ──────────────────────────────────────────────────────

pub struct GetInterfaceSessionUseCase<X, U, G>
where
    X: AccessRepository,
    U: UserRepository,
    G: AgentRepository,
{
    pub access: AccessControl<X>,
    pub users: U,
    pub agents: G,
}

impl<X, U, G> GetInterfaceSessionUseCase<X, U, G>
where
    X: AccessRepository,
    U: UserRepository,
    G: AgentRepository,
{
    /// Never fails on an unknown caller: a valid gateway identity without a
    /// user row gets the empty session.
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<InterfaceSession, MediatureServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Ok(InterfaceSession::empty());
        }

        let memberships = self.agents.list_for_user(user_id).await?;
        let agent_of = memberships
            .into_iter()
            .map(|(agent, authority)| SessionAuthority {
                id: authority.id,
                name: authority.name,
                slug: authority.slug,
                logo_attachment_id: authority.logo_attachment_id,
                is_main_agent: authority.main_agent_id == Some(agent.id),
            })
            .collect();
        let is_admin = self.access.is_admin(user_id).await?;

        Ok(InterfaceSession { agent_of, is_admin })
    }
}

// ── GetLiveChatSettings ──────────────────────────────────────────────────────

pub struct GetLiveChatSettingsUseCase<U, L>
where
    U: UserRepository,
    L: LiveChatRepository,
{
    pub users: U,
    pub live_chat: L,
}

impl<U, L> GetLiveChatSettingsUseCase<U, L>
where
    U: UserRepository,
    L: LiveChatRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<LiveChatSettings, MediatureServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(MediatureServiceError::UserNotFound);
        }
        self.live_chat.get_or_init(user_id).await
    }
}
