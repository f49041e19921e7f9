pub mod config;
pub mod logging;

pub mod checksum;
pub mod emoji;
pub mod fetch;
pub mod metadata;
pub mod retry;
pub mod scheduler;
pub mod session_log;
pub mod storage;
pub mod url_model;
