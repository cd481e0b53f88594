//! Service layer for business logic
//!
//! HTTP 与 CLI 共用的业务逻辑。

pub mod geoip;
mod link_service;

pub use geoip::{GeoInfo, GeoIpLookup, GeoIpProvider};
pub use link_service::*;
