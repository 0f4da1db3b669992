//! sea-orm entities for the Médiature service database.

pub mod admin_invitations;
pub mod admins;
pub mod agent_invitations;
pub mod agents;
pub mod authorities;
pub mod cases;
pub mod invitations;
pub mod live_chat_settings;
pub mod outbox_events;
pub mod users;
