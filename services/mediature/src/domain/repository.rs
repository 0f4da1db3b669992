#![allow(async_fn_in_trait)]

use uuid::Uuid;

use mediature_domain::invitation::InvitationStatus;

use crate::domain::types::{
    Agent, AgentDetail, AgentListing, Authority, Invitation, InvitationDetail, InvitationListing,
    LiveChatSettings, OutboxEvent, User,
};
use crate::error::MediatureServiceError;

/// Read-only relationship lookups backing the capability checks.
pub trait AccessRepository: Send + Sync {
    async fn is_admin(&self, user_id: Uuid) -> Result<bool, MediatureServiceError>;

    /// Of `authority_ids`, the subset whose main agent belongs to `user_id`.
    /// One batched query; the caller takes set-difference.
    async fn main_agent_authority_ids(
        &self,
        user_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, MediatureServiceError>;

    /// Of `authority_ids`, the subset where `user_id` holds an agent row.
    async fn member_authority_ids(
        &self,
        user_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, MediatureServiceError>;
}

/// Repository for user profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MediatureServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MediatureServiceError>;

    /// Update profile fields. Returns the updated user, or `None` when the
    /// row is gone.
    async fn update_profile(
        &self,
        id: Uuid,
        firstname: &str,
        lastname: &str,
        profile_picture: Option<&str>,
    ) -> Result<Option<User>, MediatureServiceError>;
}

/// Repository for authorities.
pub trait AuthorityRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Authority>, MediatureServiceError>;
}

/// Repository for agent memberships and their case bookkeeping.
pub trait AgentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AgentDetail>, MediatureServiceError>;

    async fn exists(
        &self,
        user_id: Uuid,
        authority_id: Uuid,
    ) -> Result<bool, MediatureServiceError>;

    /// Insert the agent, optionally pointing its authority's main agent at
    /// it, and record the outbox event — one transaction.
    async fn create_with_outbox(
        &self,
        agent: &Agent,
        grant_main_agent: bool,
        event: &OutboxEvent,
    ) -> Result<(), MediatureServiceError>;

    /// Unassign every case referencing the agent, delete the agent row, and
    /// record the outbox event — one transaction.
    async fn remove_with_outbox(
        &self,
        agent_id: Uuid,
        event: &OutboxEvent,
    ) -> Result<(), MediatureServiceError>;

    /// Point the authority's main agent at `agent_id`, re-verifying inside
    /// the transaction that the agent still belongs to the authority.
    /// Returns `false` when the membership check fails (e.g. a concurrent
    /// removal won).
    async fn set_main_agent(
        &self,
        authority_id: Uuid,
        agent_id: Uuid,
    ) -> Result<bool, MediatureServiceError>;

    /// Agents of the given authorities with their users, main-agent flags,
    /// and assigned-case close dates.
    async fn list_with_cases(
        &self,
        authority_ids: &[Uuid],
    ) -> Result<Vec<AgentListing>, MediatureServiceError>;

    /// All memberships of one user, joined with their authorities.
    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Agent, Authority)>, MediatureServiceError>;
}

/// Repository for the invitation lifecycle.
pub trait InvitationRepository: Send + Sync {
    async fn find_detail_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<InvitationDetail>, MediatureServiceError>;

    async fn find_by_token(
        &self,
        token: Uuid,
    ) -> Result<Option<InvitationListing>, MediatureServiceError>;

    /// Conditional insert removing the check-then-act race: inside one
    /// transaction, verifies no PENDING agent-invitation exists for
    /// (authority, invitee email), then inserts the invitation, its agent
    /// sub-record, and the outbox event. Returns `false` (no write) when a
    /// pending duplicate exists.
    async fn create_agent_invitation_if_absent(
        &self,
        invitation: &Invitation,
        authority_id: Uuid,
        grant_main_agent: bool,
        event: &OutboxEvent,
    ) -> Result<bool, MediatureServiceError>;

    /// PENDING→CANCELED compare-and-swap (`UPDATE … WHERE status = PENDING`).
    /// Returns `false` when the invitation was no longer pending.
    async fn cancel_if_pending(&self, id: Uuid) -> Result<bool, MediatureServiceError>;

    async fn list_agent_invitations(
        &self,
        authority_ids: &[Uuid],
        status: Option<InvitationStatus>,
    ) -> Result<Vec<InvitationListing>, MediatureServiceError>;
}

/// Repository for live-chat session tokens.
pub trait LiveChatRepository: Send + Sync {
    /// Read the user's settings, creating them on first read. Concurrent
    /// initializers converge on a single token (insert-if-absent, re-read).
    async fn get_or_init(&self, user_id: Uuid)
    -> Result<LiveChatSettings, MediatureServiceError>;
}
