use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LiveChatSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LiveChatSettings::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LiveChatSettings::SessionToken)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LiveChatSettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LiveChatSettings::Table, LiveChatSettings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LiveChatSettings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LiveChatSettings {
    Table,
    UserId,
    SessionToken,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
