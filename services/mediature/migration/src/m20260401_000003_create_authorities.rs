use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // main_agent_id gets its foreign key in the agents migration, after
        // the agents table exists (the two tables reference each other).
        manager
            .create_table(
                Table::create()
                    .table(Authorities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Authorities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Authorities::Name).string().not_null())
                    .col(
                        ColumnDef::new(Authorities::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Authorities::Kind).string().not_null())
                    .col(ColumnDef::new(Authorities::LogoAttachmentId).uuid())
                    .col(ColumnDef::new(Authorities::MainAgentId).uuid())
                    .col(
                        ColumnDef::new(Authorities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Authorities::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Authorities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Authorities {
    Table,
    Id,
    Name,
    Slug,
    Kind,
    LogoAttachmentId,
    MainAgentId,
    CreatedAt,
    UpdatedAt,
}
