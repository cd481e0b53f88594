//! GeoIP 查询
//!
//! 只支持本地 MaxMind GeoLite2-City 数据库，未配置时不做地理解析。

mod maxmind;
mod provider;

pub use maxmind::MaxMindProvider;
pub use provider::{GeoInfo, GeoIpLookup, GeoIpProvider};
