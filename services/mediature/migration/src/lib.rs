use sea_orm_migration::prelude::*;

mod m20260401_000001_create_users;
mod m20260401_000002_create_admins;
mod m20260401_000003_create_authorities;
mod m20260401_000004_create_agents;
mod m20260401_000005_create_cases;
mod m20260401_000006_create_invitations;
mod m20260401_000007_create_agent_invitations;
mod m20260401_000008_create_admin_invitations;
mod m20260401_000009_create_live_chat_settings;
mod m20260401_000010_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_users::Migration),
            Box::new(m20260401_000002_create_admins::Migration),
            Box::new(m20260401_000003_create_authorities::Migration),
            Box::new(m20260401_000004_create_agents::Migration),
            Box::new(m20260401_000005_create_cases::Migration),
            Box::new(m20260401_000006_create_invitations::Migration),
            Box::new(m20260401_000007_create_agent_invitations::Migration),
            Box::new(m20260401_000008_create_admin_invitations::Migration),
            Box::new(m20260401_000009_create_live_chat_settings::Migration),
            Box::new(m20260401_000010_create_outbox_events::Migration),
        ]
    }
}
