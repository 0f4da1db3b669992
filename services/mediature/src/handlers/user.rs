use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mediature_core::identity::Identity;

use crate::domain::types::{InterfaceSession, LiveChatSettings, User};
use crate::error::MediatureServiceError;
use crate::state::AppState;
use crate::usecase::user::{
    GetInterfaceSessionUseCase, GetLiveChatSettingsUseCase, GetProfileUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Fallback avatar rendered when no profile picture is set. Initials and
/// color are derived server-side so every client shows the same avatar.
#[derive(Serialize)]
pub struct AvatarResponse {
    pub initials: String,
    pub color: String,
}

impl AvatarResponse {
    fn for_name(firstname: &str, lastname: &str) -> Self {
        let full_name = format!("{firstname} {lastname}");
        Self {
            initials: mediature_domain::avatar::extract_initials(&full_name),
            color: mediature_domain::avatar::name_to_color(&full_name),
        }
    }
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub profile_picture: Option<String>,
    pub avatar: AvatarResponse,
    #[serde(serialize_with = "mediature_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "mediature_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            avatar: AvatarResponse::for_name(&user.firstname, &user.lastname),
            email: user.email,
            firstname: user.firstname,
            lastname: user.lastname,
            profile_picture: user.profile_picture,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct SessionAuthorityResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo_attachment_id: Option<Uuid>,
    pub is_main_agent: bool,
}

#[derive(Serialize)]
pub struct InterfaceSessionResponse {
    pub agent_of: Vec<SessionAuthorityResponse>,
    pub is_admin: bool,
}

impl From<InterfaceSession> for InterfaceSessionResponse {
    fn from(session: InterfaceSession) -> Self {
        Self {
            agent_of: session
                .agent_of
                .into_iter()
                .map(|a| SessionAuthorityResponse {
                    id: a.id,
                    name: a.name,
                    slug: a.slug,
                    logo_attachment_id: a.logo_attachment_id,
                    is_main_agent: a.is_main_agent,
                })
                .collect(),
            is_admin: session.is_admin,
        }
    }
}

#[derive(Serialize)]
pub struct LiveChatSettingsResponse {
    pub user_id: Uuid,
    pub session_token: Uuid,
}

impl From<LiveChatSettings> for LiveChatSettingsResponse {
    fn from(settings: LiveChatSettings) -> Self {
        Self {
            user_id: settings.user_id,
            session_token: settings.session_token,
        }
    }
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_profile(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, MediatureServiceError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub firstname: String,
    pub lastname: String,
    pub profile_picture: Option<String>,
}

pub async fn update_profile(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, MediatureServiceError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                firstname: body.firstname,
                lastname: body.lastname,
                profile_picture: body.profile_picture,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── GET /users/@me/session ───────────────────────────────────────────────────

pub async fn get_interface_session(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<InterfaceSessionResponse>, MediatureServiceError> {
    let usecase = GetInterfaceSessionUseCase {
        access: state.access_control(),
        users: state.user_repo(),
        agents: state.agent_repo(),
    };
    let session = usecase.execute(identity.user_id).await?;
    Ok(Json(session.into()))
}

// ── GET /users/@me/live-chat ─────────────────────────────────────────────────

pub async fn get_live_chat_settings(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<LiveChatSettingsResponse>, MediatureServiceError> {
    let usecase = GetLiveChatSettingsUseCase {
        users: state.user_repo(),
        live_chat: state.live_chat_repo(),
    };
    let settings = usecase.execute(identity.user_id).await?;
    Ok(Json(settings.into()))
}
