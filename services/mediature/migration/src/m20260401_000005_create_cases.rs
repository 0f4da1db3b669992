use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cases::AuthorityId).uuid().not_null())
                    .col(ColumnDef::new(Cases::AgentId).uuid())
                    .col(ColumnDef::new(Cases::ClosedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Cases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Cases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Cases::Table, Cases::AuthorityId)
                            .to(Authorities::Table, Authorities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Cases::Table, Cases::AgentId)
                            .to(Agents::Table, Agents::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Case-count aggregation and bulk unassignment filter on agent_id.
        manager
            .create_index(
                Index::create()
                    .table(Cases::Table)
                    .col(Cases::AgentId)
                    .name("idx_cases_agent_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cases::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Cases {
    Table,
    Id,
    AuthorityId,
    AgentId,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Authorities {
    Table,
    Id,
}

#[derive(Iden)]
enum Agents {
    Table,
    Id,
}
