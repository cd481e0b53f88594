//! 扫码日志表迁移
//!
//! scan_events 只追加不修改，父记录删除时级联删除。

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_qr_codes::QrCodes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScanEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScanEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScanEvents::ShortLinkId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScanEvents::ScannedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScanEvents::UserAgent).text().null())
                    .col(ColumnDef::new(ScanEvents::IpAddress).string_len(45).null())
                    .col(ColumnDef::new(ScanEvents::Country).string_len(2).null())
                    .col(ColumnDef::new(ScanEvents::City).string_len(100).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scan_events_short_link")
                            .from(ScanEvents::Table, ScanEvents::ShortLinkId)
                            .to(QrCodes::Table, QrCodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 单码时间序列查询 + 今日扫码统计
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scan_events_link_time")
                    .table(ScanEvents::Table)
                    .col(ScanEvents::ShortLinkId)
                    .col(ScanEvents::ScannedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scan_events_link_time")
                    .table(ScanEvents::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScanEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScanEvents {
    #[sea_orm(iden = "scan_events")]
    Table,
    Id,
    ShortLinkId,
    ScannedAt,
    UserAgent,
    IpAddress,
    Country,
    City,
}
