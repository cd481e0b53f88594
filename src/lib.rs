//! qrlinker - dynamic QR codes backed by editable short links
//!
//! 二维码里只编码 `/r/{code}` 短链接，目标内容可以随时修改。
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: `resolve` / `token` / `config` commands
//!
//! # Architecture
//! - `content`: content types and payload formatting (url, wifi, vCard...)
//! - `storage`: SeaORM persistence for short links and scan events
//! - `resolver`: short code -> redirect / display decision
//! - `presentation`: redirect countdown state machine and HTML pages
//! - `analytics`: detached scan recording
//! - `services`: owner-scoped management and GeoIP
//! - `api`: HTTP services and middleware
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging

pub mod analytics;
pub mod api;
pub mod config;
pub mod content;
pub mod errors;
pub mod presentation;
pub mod resolver;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
