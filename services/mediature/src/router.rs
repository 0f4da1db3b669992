use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use mediature_core::health::{healthz, readyz};
use mediature_core::middleware::request_id_layer;

use crate::handlers::{
    agent::{add_agent, get_agent, grant_main_agent, list_agents, remove_agent},
    invitation::{
        cancel_invitation, get_public_invitation, invite_agent, list_agent_invitations,
    },
    user::{get_interface_session, get_live_chat_settings, get_profile, update_profile},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Authority staffing
        .route("/authorities/{authority_id}/agents", post(add_agent))
        .route(
            "/authorities/{authority_id}/agents/invitations",
            post(invite_agent),
        )
        .route(
            "/authorities/{authority_id}/agents/{agent_id}",
            delete(remove_agent),
        )
        .route(
            "/authorities/{authority_id}/main-agent",
            put(grant_main_agent),
        )
        // Agents
        .route("/agents", get(list_agents))
        .route("/agents/invitations", get(list_agent_invitations))
        .route("/agents/{agent_id}", get(get_agent))
        // Invitations
        .route("/invitations/{invitation_id}", delete(cancel_invitation))
        .route("/invitations/public/{token}", get(get_public_invitation))
        // Profile, session, live chat
        .route("/users/@me", get(get_profile))
        .route("/users/@me", patch(update_profile))
        .route("/users/@me/session", get(get_interface_session))
        .route("/users/@me/live-chat", get(get_live_chat_settings))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
