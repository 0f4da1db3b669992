use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mediature_core::identity::Identity;

use crate::domain::types::{Agent, AgentDetail};
use crate::error::MediatureServiceError;
use crate::handlers::UserSummaryResponse;
use crate::state::AppState;
use crate::usecase::agent::{
    AddAgentInput, AddAgentUseCase, AgentWrapper, GetAgentUseCase, GrantMainAgentInput,
    GrantMainAgentUseCase, ListAgentsUseCase, RemoveAgentInput, RemoveAgentUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AgentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub authority_id: Uuid,
    #[serde(serialize_with = "mediature_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Agent> for AgentResponse {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            user_id: agent.user_id,
            authority_id: agent.authority_id,
            created_at: agent.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct AgentDetailResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub authority_id: Uuid,
    #[serde(serialize_with = "mediature_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub user: UserSummaryResponse,
}

impl From<AgentDetail> for AgentDetailResponse {
    fn from(detail: AgentDetail) -> Self {
        Self {
            id: detail.agent.id,
            user_id: detail.agent.user_id,
            authority_id: detail.agent.authority_id,
            created_at: detail.agent.created_at,
            user: detail.user.into(),
        }
    }
}

#[derive(Serialize)]
pub struct AgentListItemResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub authority_id: Uuid,
    #[serde(serialize_with = "mediature_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub user: UserSummaryResponse,
    pub is_main_agent: bool,
    pub open_cases: u32,
    pub close_cases: u32,
}

impl From<AgentWrapper> for AgentListItemResponse {
    fn from(wrapper: AgentWrapper) -> Self {
        Self {
            id: wrapper.agent.id,
            user_id: wrapper.agent.user_id,
            authority_id: wrapper.agent.authority_id,
            created_at: wrapper.agent.created_at,
            user: wrapper.user.into(),
            is_main_agent: wrapper.is_main_agent,
            open_cases: wrapper.open_cases,
            close_cases: wrapper.close_cases,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct AgentListQuery {
    #[serde(default)]
    pub authority_ids: Vec<Uuid>,
}

/// Parse `authority-ids[]=…` repetitions. At least one id is required.
pub(crate) fn parse_authority_ids(
    raw_query: Option<&str>,
) -> Result<Vec<Uuid>, MediatureServiceError> {
    let query: AgentListQuery = raw_query
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| MediatureServiceError::InvalidQuery)?
        .unwrap_or_default();
    if query.authority_ids.is_empty() {
        return Err(MediatureServiceError::InvalidQuery);
    }
    Ok(query.authority_ids)
}

// ── POST /authorities/{authority_id}/agents ──────────────────────────────────

#[derive(Deserialize)]
pub struct AddAgentRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub grant_main_agent: bool,
}

pub async fn add_agent(
    identity: Identity,
    State(state): State<AppState>,
    Path(authority_id): Path<Uuid>,
    Json(body): Json<AddAgentRequest>,
) -> Result<(StatusCode, Json<AgentResponse>), MediatureServiceError> {
    let usecase = AddAgentUseCase {
        access: state.access_control(),
        users: state.user_repo(),
        authorities: state.authority_repo(),
        agents: state.agent_repo(),
    };
    let agent = usecase
        .execute(
            identity.user_id,
            AddAgentInput {
                authority_id,
                user_id: body.user_id,
                grant_main_agent: body.grant_main_agent,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(agent.into())))
}

// ── DELETE /authorities/{authority_id}/agents/{agent_id} ─────────────────────

pub async fn remove_agent(
    identity: Identity,
    State(state): State<AppState>,
    Path((authority_id, agent_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, MediatureServiceError> {
    let usecase = RemoveAgentUseCase {
        access: state.access_control(),
        authorities: state.authority_repo(),
        agents: state.agent_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            RemoveAgentInput {
                authority_id,
                agent_id,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /authorities/{authority_id}/main-agent ───────────────────────────────

#[derive(Deserialize)]
pub struct GrantMainAgentRequest {
    pub agent_id: Uuid,
}

pub async fn grant_main_agent(
    identity: Identity,
    State(state): State<AppState>,
    Path(authority_id): Path<Uuid>,
    Json(body): Json<GrantMainAgentRequest>,
) -> Result<StatusCode, MediatureServiceError> {
    let usecase = GrantMainAgentUseCase {
        access: state.access_control(),
        agents: state.agent_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            GrantMainAgentInput {
                authority_id,
                agent_id: body.agent_id,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /agents/{agent_id} ───────────────────────────────────────────────────

pub async fn get_agent(
    identity: Identity,
    State(state): State<AppState>,
    Path(agent_id): Path<Uuid>,
) -> Result<Json<AgentDetailResponse>, MediatureServiceError> {
    let usecase = GetAgentUseCase {
        access: state.access_control(),
        agents: state.agent_repo(),
    };
    let detail = usecase.execute(identity.user_id, agent_id).await?;
    Ok(Json(detail.into()))
}

// ── GET /agents?authority-ids[]= ─────────────────────────────────────────────

pub async fn list_agents(
    identity: Identity,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<AgentListItemResponse>>, MediatureServiceError> {
    let authority_ids = parse_authority_ids(raw_query.as_deref())?;
    let usecase = ListAgentsUseCase {
        access: state.access_control(),
        agents: state.agent_repo(),
    };
    let agents = usecase.execute(identity.user_id, &authority_ids).await?;
    Ok(Json(agents.into_iter().map(Into::into).collect()))
}
