use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invitations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invitations::IssuerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Invitations::InviteeEmail)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invitations::InviteeFirstname).string())
                    .col(ColumnDef::new(Invitations::InviteeLastname).string())
                    .col(
                        ColumnDef::new(Invitations::Token)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Invitations::Status).string().not_null())
                    .col(
                        ColumnDef::new(Invitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Invitations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invitations::Table, Invitations::IssuerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Duplicate-invite guard filters on (invitee_email, status).
        manager
            .create_index(
                Index::create()
                    .table(Invitations::Table)
                    .col(Invitations::InviteeEmail)
                    .col(Invitations::Status)
                    .name("idx_invitations_invitee_email_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invitations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Invitations {
    Table,
    Id,
    IssuerId,
    InviteeEmail,
    InviteeFirstname,
    InviteeLastname,
    Token,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
