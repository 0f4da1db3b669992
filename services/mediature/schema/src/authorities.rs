use sea_orm::entity::prelude::*;

/// Tenant organization (e.g. a municipality) owning cases and agents.
///
/// `main_agent_id`, when set, must reference an agent of this authority;
/// the grant path re-verifies membership inside its transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authorities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub kind: String,
    pub logo_attachment_id: Option<Uuid>,
    pub main_agent_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::agents::Entity")]
    Agents,
    #[sea_orm(has_many = "super::cases::Entity")]
    Cases,
    #[sea_orm(has_many = "super::agent_invitations::Entity")]
    AgentInvitations,
}

impl Related<super::agents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agents.def()
    }
}

impl Related<super::cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cases.def()
    }
}

impl Related<super::agent_invitations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AgentInvitations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
