use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;

/// 数据目录，数据库文件存放在这里
pub static CONFIG_DIR: Lazy<PathBuf> = Lazy::new(|| {
    dirs::config_dir()
        .expect("无法获取配置目录")
        .join("tango-note")
});

/// 进程级配置，启动时从环境变量读取一次
#[derive(Clone)]
pub struct Config {
    /// OpenAI API 凭证
    pub openai_api_key: String,
    /// 会话 Cookie 签名密钥
    pub app_secret_key: String,
    /// 使用的对话模型
    pub openai_model: String,
    /// API 地址，便于指向兼容网关
    pub openai_base_url: String,
    /// HTTP 监听地址
    pub bind_address: String,
    /// 日志级别
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").context("未设置 OPENAI_API_KEY")?,
            app_secret_key: std::env::var("APP_SECRET_KEY").context("未设置 APP_SECRET_KEY")?,
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            bind_address: std::env::var("TANGO_NOTE_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            log_level: std::env::var("TANGO_NOTE_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
