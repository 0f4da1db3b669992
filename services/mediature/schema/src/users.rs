use sea_orm::entity::prelude::*;

/// Platform user. Credentials live in the external auth layer; this table
/// never stores or exposes a password hash.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub profile_picture: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::admins::Entity")]
    Admin,
    #[sea_orm(has_many = "super::agents::Entity")]
    Agents,
    #[sea_orm(has_many = "super::invitations::Entity")]
    IssuedInvitations,
    #[sea_orm(has_one = "super::live_chat_settings::Entity")]
    LiveChatSettings,
}

impl Related<super::admins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::agents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agents.def()
    }
}

impl Related<super::invitations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IssuedInvitations.def()
    }
}

impl Related<super::live_chat_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LiveChatSettings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
