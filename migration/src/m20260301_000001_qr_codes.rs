use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 qr_codes 表
        manager
            .create_table(
                Table::create()
                    .table(QrCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QrCodes::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QrCodes::ShortCode)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(QrCodes::OwnerId).string().not_null())
                    .col(ColumnDef::new(QrCodes::Name).string().not_null())
                    .col(
                        ColumnDef::new(QrCodes::ContentType)
                            .string_len(16)
                            .not_null()
                            .default("url"),
                    )
                    .col(
                        ColumnDef::new(QrCodes::DestinationContent)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QrCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(QrCodes::ScanCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(QrCodes::LastScannedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(QrCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QrCodes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 仪表盘按 owner 列表查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qr_codes_owner_created")
                    .table(QrCodes::Table)
                    .col(QrCodes::OwnerId)
                    .col(QrCodes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_qr_codes_owner_created")
                    .table(QrCodes::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(QrCodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum QrCodes {
    #[sea_orm(iden = "qr_codes")]
    Table,
    Id,
    ShortCode,
    OwnerId,
    Name,
    ContentType,
    DestinationContent,
    IsActive,
    ScanCount,
    LastScannedAt,
    CreatedAt,
    UpdatedAt,
}
