use chrono::{DateTime, Utc};
use uuid::Uuid;

use mediature_domain::invitation::InvitationStatus;

/// Platform user. Credentials never cross this service's boundary.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
        }
    }
}

/// Public-safe subset of a user, embedded in denormalized views.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

/// Tenant organization owning cases and agents.
#[derive(Debug, Clone)]
pub struct Authority {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub kind: String,
    pub logo_attachment_id: Option<Uuid>,
    pub main_agent_id: Option<Uuid>,
}

/// Staff membership of one user in one authority.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub authority_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Agent joined with its user, for single-agent reads.
#[derive(Debug, Clone)]
pub struct AgentDetail {
    pub agent: Agent,
    pub user: UserSummary,
}

/// Agent row with everything the list view denormalizes: user, main-agent
/// flag, and the `closed_at` of every assigned case.
#[derive(Debug, Clone)]
pub struct AgentListing {
    pub agent: Agent,
    pub user: UserSummary,
    pub is_main_agent: bool,
    pub case_closed_dates: Vec<Option<DateTime<Utc>>>,
}

/// Open/closed tallies of an agent's assigned cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseCounts {
    pub open: u32,
    pub closed: u32,
}

/// Partition assigned cases on whether `closed_at` is set.
pub fn partition_case_counts(closed_dates: &[Option<DateTime<Utc>>]) -> CaseCounts {
    let closed = closed_dates.iter().filter(|d| d.is_some()).count() as u32;
    CaseCounts {
        open: closed_dates.len() as u32 - closed,
        closed,
    }
}

/// Token-bearing invitation to join the platform.
#[derive(Debug, Clone)]
pub struct Invitation {
    pub id: Uuid,
    pub issuer_id: Uuid,
    pub invitee_email: String,
    pub invitee_firstname: Option<String>,
    pub invitee_lastname: Option<String>,
    pub token: Uuid,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What an invitation grants on acceptance.
#[derive(Debug, Clone)]
pub enum InvitationScope {
    Agent {
        authority_id: Uuid,
        grant_main_agent: bool,
    },
    Admin,
}

/// Invitation with its kind sub-record, for the cancellation path.
#[derive(Debug, Clone)]
pub struct InvitationDetail {
    pub invitation: Invitation,
    pub scope: InvitationScope,
}

/// Invitation with its issuer, for list and public-facing views.
#[derive(Debug, Clone)]
pub struct InvitationListing {
    pub invitation: Invitation,
    pub issuer: UserSummary,
}

/// Per-user live-chat session token.
#[derive(Debug, Clone)]
pub struct LiveChatSettings {
    pub user_id: Uuid,
    pub session_token: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One authority membership as shown in the interface session.
#[derive(Debug, Clone)]
pub struct SessionAuthority {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo_attachment_id: Option<Uuid>,
    pub is_main_agent: bool,
}

/// Everything the frontend needs to draw the authenticated shell.
#[derive(Debug, Clone)]
pub struct InterfaceSession {
    pub agent_of: Vec<SessionAuthority>,
    pub is_admin: bool,
}

impl InterfaceSession {
    /// Session for a caller without a user row: no memberships, no admin.
    pub fn empty() -> Self {
        Self {
            agent_of: Vec::new(),
            is_admin: false,
        }
    }
}

/// Outbox event persisted in the same transaction as the mutation it
/// announces; drained by the external mail worker.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}
