pub mod scan_event;
pub mod short_link;

pub use scan_event::Entity as ScanEventEntity;
pub use short_link::Entity as ShortLinkEntity;
