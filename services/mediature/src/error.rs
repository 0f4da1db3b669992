use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

/// Médiature service error variants.
///
/// Every failure carries a stable machine-readable kind so callers branch on
/// `kind` instead of parsing prose. Authorization failures additionally carry
/// the authority ids the caller lacked rights on.
#[derive(Debug, thiserror::Error)]
pub enum MediatureServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("agent not found")]
    AgentNotFound,
    #[error("authority not found")]
    AuthorityNotFound,
    #[error("invitation not found")]
    InvitationNotFound,
    #[error("admin rights required")]
    AdminRequired,
    #[error("main agent or admin rights required")]
    NotMainAgent { authority_ids: Vec<Uuid> },
    #[error("agent membership of the authority required")]
    NotAuthorityAgent { authority_ids: Vec<Uuid> },
    #[error("user is already an agent of the authority")]
    AgentAlreadyExists,
    #[error("a pending invitation already exists for this email and authority")]
    InvitationAlreadyPending,
    #[error("invitation is no longer pending")]
    InvitationNotPending,
    #[error("agent does not belong to the authority")]
    AgentOutsideAuthority,
    #[error("invalid query parameters")]
    InvalidQuery,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MediatureServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AgentNotFound => "AGENT_NOT_FOUND",
            Self::AuthorityNotFound => "AUTHORITY_NOT_FOUND",
            Self::InvitationNotFound => "INVITATION_NOT_FOUND",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::NotMainAgent { .. } => "NOT_MAIN_AGENT",
            Self::NotAuthorityAgent { .. } => "NOT_AUTHORITY_AGENT",
            Self::AgentAlreadyExists => "AGENT_ALREADY_EXISTS",
            Self::InvitationAlreadyPending => "INVITATION_ALREADY_PENDING",
            Self::InvitationNotPending => "INVITATION_NOT_PENDING",
            Self::AgentOutsideAuthority => "AGENT_OUTSIDE_AUTHORITY",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for MediatureServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::AgentNotFound
            | Self::AuthorityNotFound
            | Self::InvitationNotFound => StatusCode::NOT_FOUND,
            Self::AdminRequired | Self::NotMainAgent { .. } | Self::NotAuthorityAgent { .. } => {
                StatusCode::FORBIDDEN
            }
            Self::AgentAlreadyExists
            | Self::InvitationAlreadyPending
            | Self::InvitationNotPending
            | Self::AgentOutsideAuthority => StatusCode::CONFLICT,
            Self::InvalidQuery => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status
        // for all requests. Internal errors need the anyhow chain logged so the
        // root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::NotMainAgent { authority_ids } | Self::NotAuthorityAgent { authority_ids } =
            &self
        {
            body["context"] = serde_json::json!({ "authority_ids": authority_ids });
        }
        (status, axum::Json(body)).into_response()
    }
}
