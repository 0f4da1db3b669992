use sea_orm::entity::prelude::*;

/// Token-bearing invitation to join the platform.
///
/// `status` stores an `InvitationStatus` string (`PENDING`, `CANCELED`,
/// `ACCEPTED`). The kind of invitation (agent vs. admin) lives in the
/// 1:0..1 sub-records.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub issuer_id: Uuid,
    pub invitee_email: String,
    pub invitee_firstname: Option<String>,
    pub invitee_lastname: Option<String>,
    #[sea_orm(unique)]
    pub token: Uuid,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::IssuerId",
        to = "super::users::Column::Id"
    )]
    Issuer,
    #[sea_orm(has_one = "super::agent_invitations::Entity")]
    AgentInvitation,
    #[sea_orm(has_one = "super::admin_invitations::Entity")]
    AdminInvitation,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issuer.def()
    }
}

impl Related<super::agent_invitations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AgentInvitation.def()
    }
}

impl Related<super::admin_invitations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminInvitation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
