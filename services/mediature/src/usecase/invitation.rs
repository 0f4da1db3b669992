use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use mediature_domain::invitation::InvitationStatus;

use crate::domain::repository::{
    AccessRepository, AgentRepository, AuthorityRepository, InvitationRepository, UserRepository,
};
use crate::domain::types::{
    Agent, Invitation, InvitationListing, InvitationScope, OutboxEvent,
};
use crate::error::MediatureServiceError;
use crate::usecase::access::AccessControl;
use crate::usecase::agent::insert_agent;

/// Sign-up URL embedded in invitation emails.
pub fn sign_up_link(front_base_url: &str, token: Uuid) -> String {
    format!(
        "{}/auth/sign-up?token={}",
        front_base_url.trim_end_matches('/'),
        token
    )
}

// ── InviteAgent ──────────────────────────────────────────────────────────────

pub struct InviteAgentInput {
    pub authority_id: Uuid,
    pub invitee_email: String,
    pub invitee_firstname: Option<String>,
    pub invitee_lastname: Option<String>,
    pub grant_main_agent: bool,
}

/// Inviting a known email short-circuits into a direct add; only unknown
/// emails produce an invitation row.
#[derive(Debug)]
pub enum InviteAgentOutcome {
    AddedDirectly(Agent),
    Invited(Invitation),
}

pub struct InviteAgentUseCase<X, U, T, G, I>
where
    X: AccessRepository,
    U: UserRepository,
    T: AuthorityRepository,
    G: AgentRepository,
    I: InvitationRepository,
{
    pub access: AccessControl<X>,
    pub users: U,
    pub authorities: T,
    pub agents: G,
    pub invitations: I,
    pub front_base_url: String,
}

impl<X, U, T, G, I> InviteAgentUseCase<X, U, T, G, I>
where
    X: AccessRepository,
    U: UserRepository,
    T: AuthorityRepository,
    G: AgentRepository,
    I: InvitationRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        input: InviteAgentInput,
    ) -> Result<InviteAgentOutcome, MediatureServiceError> {
        self.access
            .require_admin_or_main_agent(actor_id, &[input.authority_id])
            .await?;

        if let Some(user) = self.users.find_by_email(&input.invitee_email).await? {
            let agent = insert_agent(
                &self.authorities,
                &self.agents,
                &user,
                input.authority_id,
                input.grant_main_agent,
            )
            .await?;
            return Ok(InviteAgentOutcome::AddedDirectly(agent));
        }

        let issuer = self
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or(MediatureServiceError::UserNotFound)?;
        let authority = self
            .authorities
            .find_by_id(input.authority_id)
            .await?
            .ok_or(MediatureServiceError::AuthorityNotFound)?;

        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::new_v4(),
            issuer_id: issuer.id,
            invitee_email: input.invitee_email,
            invitee_firstname: input.invitee_firstname,
            invitee_lastname: input.invitee_lastname,
            token: Uuid::new_v4(),
            status: InvitationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "agent_invited".to_owned(),
            payload: json!({
                "recipient": invitation.invitee_email,
                "firstname": invitation.invitee_firstname,
                "issuer_name": format!("{} {}", issuer.firstname, issuer.lastname),
                "authority_name": authority.name,
                "sign_up_url": sign_up_link(&self.front_base_url, invitation.token),
            }),
            idempotency_key: format!("agent_invited:{}", invitation.id),
        };

        let created = self
            .invitations
            .create_agent_invitation_if_absent(
                &invitation,
                authority.id,
                input.grant_main_agent,
                &event,
            )
            .await?;
        if !created {
            return Err(MediatureServiceError::InvitationAlreadyPending);
        }
        Ok(InviteAgentOutcome::Invited(invitation))
    }
}

// ── CancelInvitation ─────────────────────────────────────────────────────────

pub struct CancelInvitationUseCase<X, I>
where
    X: AccessRepository,
    I: InvitationRepository,
{
    pub access: AccessControl<X>,
    pub invitations: I,
}

impl<X, I> CancelInvitationUseCase<X, I>
where
    X: AccessRepository,
    I: InvitationRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        invitation_id: Uuid,
    ) -> Result<(), MediatureServiceError> {
        let detail = self
            .invitations
            .find_detail_by_id(invitation_id)
            .await?
            .ok_or(MediatureServiceError::InvitationNotFound)?;

        // State is checked before authorization on purpose: a stale cancel is
        // a conflict for every caller, authorized or not.
        if !detail
            .invitation
            .status
            .can_transition_to(InvitationStatus::Canceled)
        {
            return Err(MediatureServiceError::InvitationNotPending);
        }

        match detail.scope {
            InvitationScope::Agent { authority_id, .. } => {
                self.access
                    .require_admin_or_main_agent(actor_id, &[authority_id])
                    .await?;
            }
            InvitationScope::Admin => {
                self.access.require_admin(actor_id).await?;
            }
        }

        let canceled = self.invitations.cancel_if_pending(invitation_id).await?;
        if !canceled {
            return Err(MediatureServiceError::InvitationNotPending);
        }
        Ok(())
    }
}

// ── ListAgentInvitations ─────────────────────────────────────────────────────

pub struct ListAgentInvitationsUseCase<X, I>
where
    X: AccessRepository,
    I: InvitationRepository,
{
    pub access: AccessControl<X>,
    pub invitations: I,
}

impl<X, I> ListAgentInvitationsUseCase<X, I>
where
    X: AccessRepository,
    I: InvitationRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        authority_ids: &[Uuid],
        status: Option<InvitationStatus>,
    ) -> Result<Vec<InvitationListing>, MediatureServiceError> {
        self.access
            .require_admin_or_member(actor_id, authority_ids)
            .await?;

        self.invitations
            .list_agent_invitations(authority_ids, status)
            .await
    }
}

// ── GetPublicInvitation ──────────────────────────────────────────────────────

/// Token-authenticated lookup backing the sign-up page. No identity header:
/// possession of the token is the credential.
pub struct GetPublicInvitationUseCase<I: InvitationRepository> {
    pub invitations: I,
}

impl<I: InvitationRepository> GetPublicInvitationUseCase<I> {
    pub async fn execute(
        &self,
        token: Uuid,
    ) -> Result<InvitationListing, MediatureServiceError> {
        let listing = self
            .invitations
            .find_by_token(token)
            .await?
            .ok_or(MediatureServiceError::InvitationNotFound)?;

        if !listing.invitation.status.is_pending() {
            return Err(MediatureServiceError::InvitationNotPending);
        }
        Ok(listing)
    }
}
