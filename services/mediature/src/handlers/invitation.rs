use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mediature_core::identity::Identity;
use mediature_domain::invitation::InvitationStatus;

use crate::domain::types::{Invitation, InvitationListing};
use crate::error::MediatureServiceError;
use crate::handlers::UserSummaryResponse;
use crate::handlers::agent::{AgentResponse, parse_authority_ids};
use crate::state::AppState;
use crate::usecase::invitation::{
    CancelInvitationUseCase, GetPublicInvitationUseCase, InviteAgentInput, InviteAgentOutcome,
    InviteAgentUseCase, ListAgentInvitationsUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Invitation as shown to issuers. The token never appears in responses;
/// it only travels inside the emailed sign-up link.
#[derive(Serialize)]
pub struct InvitationResponse {
    pub id: Uuid,
    pub invitee_email: String,
    pub invitee_firstname: Option<String>,
    pub invitee_lastname: Option<String>,
    pub status: InvitationStatus,
    #[serde(serialize_with = "mediature_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "mediature_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Invitation> for InvitationResponse {
    fn from(invitation: Invitation) -> Self {
        Self {
            id: invitation.id,
            invitee_email: invitation.invitee_email,
            invitee_firstname: invitation.invitee_firstname,
            invitee_lastname: invitation.invitee_lastname,
            status: invitation.status,
            created_at: invitation.created_at,
            updated_at: invitation.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct InvitationListingResponse {
    #[serde(flatten)]
    pub invitation: InvitationResponse,
    pub issuer: UserSummaryResponse,
}

impl From<InvitationListing> for InvitationListingResponse {
    fn from(listing: InvitationListing) -> Self {
        Self {
            invitation: listing.invitation.into(),
            issuer: listing.issuer.into(),
        }
    }
}

/// Inviting a known email adds the agent directly; the variant tells the
/// frontend which flow happened.
#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InviteAgentResponse {
    Added { agent: AgentResponse },
    Invited { invitation: InvitationResponse },
}

// ── POST /authorities/{authority_id}/agents/invitations ─────────────────────

#[derive(Deserialize)]
pub struct InviteAgentRequest {
    pub invitee_email: String,
    pub invitee_firstname: Option<String>,
    pub invitee_lastname: Option<String>,
    #[serde(default)]
    pub grant_main_agent: bool,
}

pub async fn invite_agent(
    identity: Identity,
    State(state): State<AppState>,
    Path(authority_id): Path<Uuid>,
    Json(body): Json<InviteAgentRequest>,
) -> Result<(StatusCode, Json<InviteAgentResponse>), MediatureServiceError> {
    let usecase = InviteAgentUseCase {
        access: state.access_control(),
        users: state.user_repo(),
        authorities: state.authority_repo(),
        agents: state.agent_repo(),
        invitations: state.invitation_repo(),
        front_base_url: state.front_base_url.clone(),
    };
    let outcome = usecase
        .execute(
            identity.user_id,
            InviteAgentInput {
                authority_id,
                invitee_email: body.invitee_email,
                invitee_firstname: body.invitee_firstname,
                invitee_lastname: body.invitee_lastname,
                grant_main_agent: body.grant_main_agent,
            },
        )
        .await?;
    let response = match outcome {
        InviteAgentOutcome::AddedDirectly(agent) => InviteAgentResponse::Added {
            agent: agent.into(),
        },
        InviteAgentOutcome::Invited(invitation) => InviteAgentResponse::Invited {
            invitation: invitation.into(),
        },
    };
    Ok((StatusCode::CREATED, Json(response)))
}

// ── GET /agents/invitations?authority-ids[]=&status= ────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct InvitationListQuery {
    status: Option<String>,
}

pub async fn list_agent_invitations(
    identity: Identity,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<InvitationListingResponse>>, MediatureServiceError> {
    let authority_ids = parse_authority_ids(raw_query.as_deref())?;
    let query: InvitationListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| MediatureServiceError::InvalidQuery)?
        .unwrap_or_default();
    let status = query
        .status
        .as_deref()
        .map(|s| InvitationStatus::from_str_value(s).ok_or(MediatureServiceError::InvalidQuery))
        .transpose()?;

    let usecase = ListAgentInvitationsUseCase {
        access: state.access_control(),
        invitations: state.invitation_repo(),
    };
    let listings = usecase
        .execute(identity.user_id, &authority_ids, status)
        .await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

// ── DELETE /invitations/{invitation_id} ──────────────────────────────────────

pub async fn cancel_invitation(
    identity: Identity,
    State(state): State<AppState>,
    Path(invitation_id): Path<Uuid>,
) -> Result<StatusCode, MediatureServiceError> {
    let usecase = CancelInvitationUseCase {
        access: state.access_control(),
        invitations: state.invitation_repo(),
    };
    usecase.execute(identity.user_id, invitation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /invitations/public/{token} ──────────────────────────────────────────

/// Public-facing view for the sign-up page: invitee names plus who invited
/// them. No identity header; the token itself is the credential.
#[derive(Serialize)]
pub struct PublicInvitationResponse {
    pub invitee_email: String,
    pub invitee_firstname: Option<String>,
    pub invitee_lastname: Option<String>,
    pub issuer_firstname: String,
    pub issuer_lastname: String,
}

pub async fn get_public_invitation(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<PublicInvitationResponse>, MediatureServiceError> {
    let usecase = GetPublicInvitationUseCase {
        invitations: state.invitation_repo(),
    };
    let listing = usecase.execute(token).await?;
    Ok(Json(PublicInvitationResponse {
        invitee_email: listing.invitation.invitee_email,
        invitee_firstname: listing.invitation.invitee_firstname,
        invitee_lastname: listing.invitation.invitee_lastname,
        issuer_firstname: listing.issuer.firstname,
        issuer_lastname: listing.issuer.lastname,
    }))
}
