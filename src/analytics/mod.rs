pub mod recorder;
pub mod sink;

pub use recorder::ScanRecorder;
pub use sink::{LogSink, ScanSink};

/// 单次扫码附带的请求信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanMetadata {
    /// User-Agent header
    pub user_agent: Option<String>,
    /// 客户端 IP 地址
    pub ip_address: Option<String>,
    /// 国家代码 (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    pub city: Option<String>,
}

impl ScanMetadata {
    pub fn new(user_agent: Option<String>, ip_address: Option<String>) -> Self {
        Self {
            user_agent,
            ip_address,
            country: None,
            city: None,
        }
    }

    pub fn with_geo(mut self, country: Option<String>, city: Option<String>) -> Self {
        self.country = country;
        self.city = city;
        self
    }
}
