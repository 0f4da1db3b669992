use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{
    AccessRepository, AgentRepository, AuthorityRepository, UserRepository,
};
use crate::domain::types::{
    Agent, AgentDetail, AgentListing, Authority, OutboxEvent, User, partition_case_counts,
};
use crate::error::MediatureServiceError;
use crate::usecase::access::AccessControl;

// ── AddAgent ─────────────────────────────────────────────────────────────────

pub struct AddAgentInput {
    pub authority_id: Uuid,
    pub user_id: Uuid,
    pub grant_main_agent: bool,
}

pub struct AddAgentUseCase<X, U, T, G>
where
    X: AccessRepository,
    U: UserRepository,
    T: AuthorityRepository,
    G: AgentRepository,
{
    pub access: AccessControl<X>,
    pub users: U,
    pub authorities: T,
    pub agents: G,
}

impl<X, U, T, G> AddAgentUseCase<X, U, T, G>
where
    X: AccessRepository,
    U: UserRepository,
    T: AuthorityRepository,
    G: AgentRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        input: AddAgentInput,
    ) -> Result<Agent, MediatureServiceError> {
        self.access
            .require_admin_or_main_agent(actor_id, &[input.authority_id])
            .await?;

        let user = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or(MediatureServiceError::UserNotFound)?;

        insert_agent(
            &self.authorities,
            &self.agents,
            &user,
            input.authority_id,
            input.grant_main_agent,
        )
        .await
    }
}

/// Shared direct-add path: used by AddAgent and by InviteAgent when the
/// invitee already has an account.
pub(crate) async fn insert_agent<T, G>(
    authorities: &T,
    agents: &G,
    user: &User,
    authority_id: Uuid,
    grant_main_agent: bool,
) -> Result<Agent, MediatureServiceError>
where
    T: AuthorityRepository,
    G: AgentRepository,
{
    let authority = authorities
        .find_by_id(authority_id)
        .await?
        .ok_or(MediatureServiceError::AuthorityNotFound)?;

    if agents.exists(user.id, authority.id).await? {
        return Err(MediatureServiceError::AgentAlreadyExists);
    }

    let agent = Agent {
        id: Uuid::new_v4(),
        user_id: user.id,
        authority_id: authority.id,
        created_at: Utc::now(),
    };
    let event = agent_added_event(&agent, user, &authority);
    agents
        .create_with_outbox(&agent, grant_main_agent, &event)
        .await?;
    Ok(agent)
}

fn agent_added_event(agent: &Agent, user: &User, authority: &Authority) -> OutboxEvent {
    OutboxEvent {
        id: Uuid::new_v4(),
        kind: "agent_added".to_owned(),
        payload: json!({
            "recipient": user.email,
            "firstname": user.firstname,
            "authority_name": authority.name,
        }),
        idempotency_key: format!("agent_added:{}", agent.id),
    }
}

// ── RemoveAgent ──────────────────────────────────────────────────────────────

pub struct RemoveAgentInput {
    pub authority_id: Uuid,
    pub agent_id: Uuid,
}

pub struct RemoveAgentUseCase<X, T, G>
where
    X: AccessRepository,
    T: AuthorityRepository,
    G: AgentRepository,
{
    pub access: AccessControl<X>,
    pub authorities: T,
    pub agents: G,
}

impl<X, T, G> RemoveAgentUseCase<X, T, G>
where
    X: AccessRepository,
    T: AuthorityRepository,
    G: AgentRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        input: RemoveAgentInput,
    ) -> Result<(), MediatureServiceError> {
        self.access
            .require_admin_or_main_agent(actor_id, &[input.authority_id])
            .await?;

        let detail = self
            .agents
            .find_by_id(input.agent_id)
            .await?
            .ok_or(MediatureServiceError::AgentNotFound)?;
        if detail.agent.authority_id != input.authority_id {
            return Err(MediatureServiceError::AgentOutsideAuthority);
        }

        let authority = self
            .authorities
            .find_by_id(input.authority_id)
            .await?
            .ok_or(MediatureServiceError::AuthorityNotFound)?;

        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "agent_removed".to_owned(),
            payload: json!({
                "recipient": detail.user.email,
                "firstname": detail.user.firstname,
                "authority_name": authority.name,
            }),
            idempotency_key: format!("agent_removed:{}", detail.agent.id),
        };

        // Unassign cases, delete the row, record the email — one transaction.
        self.agents
            .remove_with_outbox(detail.agent.id, &event)
            .await
    }
}

// ── GrantMainAgent ───────────────────────────────────────────────────────────

pub struct GrantMainAgentInput {
    pub authority_id: Uuid,
    pub agent_id: Uuid,
}

pub struct GrantMainAgentUseCase<X, G>
where
    X: AccessRepository,
    G: AgentRepository,
{
    pub access: AccessControl<X>,
    pub agents: G,
}

impl<X, G> GrantMainAgentUseCase<X, G>
where
    X: AccessRepository,
    G: AgentRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        input: GrantMainAgentInput,
    ) -> Result<(), MediatureServiceError> {
        self.access
            .require_admin_or_main_agent(actor_id, &[input.authority_id])
            .await?;

        let detail = self
            .agents
            .find_by_id(input.agent_id)
            .await?
            .ok_or(MediatureServiceError::AgentNotFound)?;
        if detail.agent.authority_id != input.authority_id {
            return Err(MediatureServiceError::AgentOutsideAuthority);
        }

        // Membership is re-verified inside the update transaction; a lost
        // race with a concurrent removal surfaces as not-found.
        let updated = self
            .agents
            .set_main_agent(input.authority_id, input.agent_id)
            .await?;
        if !updated {
            return Err(MediatureServiceError::AgentNotFound);
        }
        Ok(())
    }
}

// ── GetAgent ─────────────────────────────────────────────────────────────────

pub struct GetAgentUseCase<X, G>
where
    X: AccessRepository,
    G: AgentRepository,
{
    pub access: AccessControl<X>,
    pub agents: G,
}

impl<X, G> GetAgentUseCase<X, G>
where
    X: AccessRepository,
    G: AgentRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        agent_id: Uuid,
    ) -> Result<AgentDetail, MediatureServiceError> {
        let detail = self
            .agents
            .find_by_id(agent_id)
            .await?
            .ok_or(MediatureServiceError::AgentNotFound)?;

        self.access
            .require_admin_or_member(actor_id, &[detail.agent.authority_id])
            .await?;
        Ok(detail)
    }
}

// ── ListAgents ───────────────────────────────────────────────────────────────

/// Denormalized list entry: agent, user, main-agent flag, case tallies.
#[derive(Debug)]
pub struct AgentWrapper {
    pub agent: Agent,
    pub user: crate::domain::types::UserSummary,
    pub is_main_agent: bool,
    pub open_cases: u32,
    pub close_cases: u32,
}

pub struct ListAgentsUseCase<X, G>
where
    X: AccessRepository,
    G: AgentRepository,
{
    pub access: AccessControl<X>,
    pub agents: G,
}

impl<X, G> ListAgentsUseCase<X, G>
where
    X: AccessRepository,
    G: AgentRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<Vec<AgentWrapper>, MediatureServiceError> {
        self.access
            .require_admin_or_member(actor_id, authority_ids)
            .await?;

        let listings = self.agents.list_with_cases(authority_ids).await?;
        Ok(listings.into_iter().map(wrap_listing).collect())
    }
}

fn wrap_listing(listing: AgentListing) -> AgentWrapper {
    let counts = partition_case_counts(&listing.case_closed_dates);
    AgentWrapper {
        agent: listing.agent,
        user: listing.user,
        is_main_agent: listing.is_main_agent,
        open_cases: counts.open,
        close_cases: counts.closed,
    }
}
