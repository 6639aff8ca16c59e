//! 浏览器会话作用域的对话状态
//!
//! 每个浏览器会话持有一份发送给模型的消息历史，首条固定为系统指令。
//! 会话通过签名 Cookie 中的 id 定位，存储在进程内的 SessionStore 中。

use std::collections::HashMap;

use cookie::Cookie;
use serde::Serialize;
use tokio::sync::Mutex;

/// 固定的系统指令，会话初始化时写入首条消息
pub const SYSTEM_INSTRUCTION: &str =
    "あなたは、子供向けにシンプルにわかりやすく教える英語の先生です。日常会話で使えるフランクな英語を教えてください。";

/// 会话 Cookie 名称
pub const SESSION_COOKIE: &str = "tango_session";

/// 消息角色
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// 对话中的一条消息
#[derive(Clone, Debug, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// 一个浏览器会话的消息历史，只追加不修改
#[derive(Clone, Debug, Default)]
pub struct ConversationSession {
    turns: Vec<ConversationTurn>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空历史并写入系统指令，开始新一轮翻译前必须调用
    pub fn initialize(&mut self) {
        self.turns.clear();
        self.turns.push(ConversationTurn {
            role: Role::System,
            content: SYSTEM_INSTRUCTION.to_string(),
        });
    }

    /// 追加一条消息，调用方自行保证已经 initialize 过
    pub fn append(&mut self, role: Role, content: String) {
        self.turns.push(ConversationTurn { role, content });
    }

    /// 按顺序返回全部消息，原样作为模型的会话输入
    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// 是否已有助手回复（即已完成过一次翻译）
    pub fn has_assistant_turn(&self) -> bool {
        self.turns.iter().any(|turn| turn.role == Role::Assistant)
    }
}

/// 进程内会话存储，按会话 id 索引
///
/// 锁只在读写映射时持有，模型调用期间不持锁：处理流程是
/// 取出克隆 → 调模型 → 写回，依赖宿主框架同一会话同时只有一个请求在处理
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, ConversationSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出会话的当前快照，不存在则返回空会话
    pub async fn load(&self, session_id: &str) -> ConversationSession {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// 写回会话
    pub async fn save(&self, session_id: &str, session: ConversationSession) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session_id.to_string(), session);
    }
}

/// 生成新的会话 id
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn sign_session_id(secret: &str, session_id: &str) -> String {
    format!("{:x}", md5::compute(format!("{}:{}", secret, session_id)))
}

/// 构建 Set-Cookie 的值，格式为 `<id>.<签名>`
pub fn build_session_cookie(session_id: &str, secret: &str) -> String {
    let value = format!("{}.{}", session_id, sign_session_id(secret, session_id));
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .build()
        .to_string()
}

/// 从 Cookie 头中解析并校验会话 id，签名不符视为无效
pub fn parse_session_cookie(cookie_header: &str, secret: &str) -> Option<String> {
    for cookie in Cookie::split_parse(cookie_header).flatten() {
        if cookie.name() != SESSION_COOKIE {
            continue;
        }
        let (session_id, signature) = cookie.value().split_once('.')?;
        if signature == sign_session_id(secret, session_id) {
            return Some(session_id.to_string());
        }
        return None;
    }
    None
}
