//! Dynamic QR code record, addressed publicly by `short_code`

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "qr_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub short_code: String,
    pub owner_id: String,
    pub name: String,
    /// url / text / email / phone / wifi / contact
    pub content_type: String,
    #[sea_orm(column_type = "Text")]
    pub destination_content: String,
    pub is_active: bool,
    pub scan_count: i64,
    pub last_scanned_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
