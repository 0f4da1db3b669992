use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AgentInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgentInvitations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AgentInvitations::InvitationId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AgentInvitations::AuthorityId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentInvitations::GrantMainAgent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AgentInvitations::Table, AgentInvitations::InvitationId)
                            .to(Invitations::Table, Invitations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AgentInvitations::Table, AgentInvitations::AuthorityId)
                            .to(Authorities::Table, Authorities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Pending-invitation lookups filter on authority_id.
        manager
            .create_index(
                Index::create()
                    .table(AgentInvitations::Table)
                    .col(AgentInvitations::AuthorityId)
                    .name("idx_agent_invitations_authority_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AgentInvitations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AgentInvitations {
    Table,
    Id,
    InvitationId,
    AuthorityId,
    GrantMainAgent,
}

#[derive(Iden)]
enum Invitations {
    Table,
    Id,
}

#[derive(Iden)]
enum Authorities {
    Table,
    Id,
}
