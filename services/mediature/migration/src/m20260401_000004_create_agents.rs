use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Agents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Agents::UserId).uuid().not_null())
                    .col(ColumnDef::new(Agents::AuthorityId).uuid().not_null())
                    .col(
                        ColumnDef::new(Agents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Agents::Table, Agents::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Agents::Table, Agents::AuthorityId)
                            .to(Authorities::Table, Authorities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership per (user, authority).
        manager
            .create_index(
                Index::create()
                    .table(Agents::Table)
                    .col(Agents::UserId)
                    .col(Agents::AuthorityId)
                    .unique()
                    .name("idx_agents_user_id_authority_id")
                    .to_owned(),
            )
            .await?;

        // Deferred foreign key: authorities.main_agent_id → agents.id.
        // SET NULL keeps the authority when its main agent row is deleted.
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_authorities_main_agent_id")
                    .from(Authorities::Table, Authorities::MainAgentId)
                    .to(Agents::Table, Agents::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name("fk_authorities_main_agent_id")
                    .table(Authorities::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Agents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Agents {
    Table,
    Id,
    UserId,
    AuthorityId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Authorities {
    Table,
    Id,
    MainAgentId,
}
