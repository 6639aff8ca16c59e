//! 翻译与单词分割流程
//!
//! 翻译：重置会话 → 组装提问 → 调模型 → 记录回复 → Markdown 转 HTML。
//! 单词分割：在同一会话上追加固定指令，让模型参考刚才的翻译结果，
//! 回复按「英単語|日本語の意味|発音記号」逐行解析，格式不符的行直接丢弃。

use anyhow::Result;
use pulldown_cmark::{html, Parser};
use serde::Serialize;
use tracing::debug;

use crate::openai::OpenAiClient;
use crate::session::{ConversationSession, Role};

/// 单词分割的固定指令，要求严格的三段竖线格式
const TOKENIZATION_QUESTION: &str = "直前の翻訳結果を単語分割してください。以下のルールに厳密に従ってください:\n\
    1. 1行に1単語ずつ出力する。\n\
    2. 各行は「英単語|日本語の意味|発音記号」の形式にする。\n\
    3. この形式以外の余計なテキスト（例えば「はい、承知しました」などの返事や説明）は一切含めないでください。";

/// 从模型回复中解析出的一个单词条目
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedWordEntry {
    pub english: String,
    pub japanese: String,
    pub pronunciation: String,
}

fn build_translation_question(user_input: &str) -> String {
    format!("「{}」を英語に翻訳してください。", user_input)
}

/// 重置会话并写入翻译提问，返回前的历史即为发给模型的输入
pub fn stage_translation(session: &mut ConversationSession, user_input: &str) {
    session.initialize();
    session.append(Role::User, build_translation_question(user_input));
}

/// 在现有会话上追加单词分割指令，不重置历史
pub fn stage_tokenization(session: &mut ConversationSession) {
    session.append(Role::User, TOKENIZATION_QUESTION.to_string());
}

/// 翻译用户输入，返回渲染成 HTML 的译文
pub async fn translate(client: &OpenAiClient, session: &mut ConversationSession, user_input: &str) -> Result<String> {
    stage_translation(session, user_input);

    let answer = client.chat_completion(session.history()).await?;
    session.append(Role::Assistant, answer.clone());

    Ok(markdown_to_html(&answer))
}

/// 对会话中上一条翻译结果做单词分割
pub async fn tokenize(client: &OpenAiClient, session: &mut ConversationSession) -> Result<Vec<ParsedWordEntry>> {
    stage_tokenization(session);

    let raw = client.chat_completion(session.history()).await?;
    session.append(Role::Assistant, raw.clone());

    let entries = parse_word_entries(&raw);
    debug!("单词分割完成: {} 行回复，解析出 {} 个条目", raw.lines().count(), entries.len());
    Ok(entries)
}

/// 逐行解析模型回复，只保留恰好三段的行，各段去除首尾空白
///
/// 模型不一定严格遵守格式，不符合的行按噪音丢弃，不算错误
pub fn parse_word_entries(raw: &str) -> Vec<ParsedWordEntry> {
    raw.trim()
        .split('\n')
        .filter_map(|line| {
            let parts: Vec<&str> = line.trim().split('|').collect();
            match parts.as_slice() {
                [english, japanese, pronunciation] => Some(ParsedWordEntry {
                    english: english.trim().to_string(),
                    japanese: japanese.trim().to_string(),
                    pronunciation: pronunciation.trim().to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// 模型的翻译回复按 Markdown 排版，转成 HTML 后嵌入页面
fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SYSTEM_INSTRUCTION;

    #[test]
    fn test_translation_question_embeds_input_verbatim() {
        let question = build_translation_question("猫がいます");
        assert_eq!(question, "「猫がいます」を英語に翻訳してください。");
    }

    #[test]
    fn test_history_shape_before_tokenization_call() {
        let mut session = ConversationSession::new();

        stage_translation(&mut session, "犬が好きです");
        session.append(Role::Assistant, "I like dogs.".to_string());
        stage_tokenization(&mut session);

        let history = session.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, Role::System);
        assert_eq!(history[0].content, SYSTEM_INSTRUCTION);
        assert_eq!(history[1].role, Role::User);
        assert!(history[1].content.contains("犬が好きです"));
        assert_eq!(history[2].role, Role::Assistant);
        assert_eq!(history[2].content, "I like dogs.");
        assert_eq!(history[3].role, Role::User);
        assert_eq!(history[3].content, TOKENIZATION_QUESTION);
    }

    #[test]
    fn test_stage_translation_discards_previous_exchange() {
        let mut session = ConversationSession::new();
        stage_translation(&mut session, "一回目");
        session.append(Role::Assistant, "first".to_string());

        // 新一轮翻译不能泄漏上一轮的上下文
        stage_translation(&mut session, "二回目");
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert!(history[1].content.contains("二回目"));
        assert!(!history.iter().any(|turn| turn.content.contains("一回目")));
    }

    #[test]
    fn test_parse_drops_malformed_lines() {
        let raw = "cat|猫|/kæt/\ninvalidline\ndog|犬|/dɒɡ/";
        let entries = parse_word_entries(raw);
        assert_eq!(
            entries,
            vec![
                ParsedWordEntry {
                    english: "cat".to_string(),
                    japanese: "猫".to_string(),
                    pronunciation: "/kæt/".to_string(),
                },
                ParsedWordEntry {
                    english: "dog".to_string(),
                    japanese: "犬".to_string(),
                    pronunciation: "/dɒɡ/".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_is_whitespace_tolerant() {
        assert_eq!(parse_word_entries(" cat | 猫 | /kæt/ "), parse_word_entries("cat|猫|/kæt/"));
    }

    #[test]
    fn test_parse_requires_exactly_three_fields() {
        // 两段或四段的行都按噪音丢弃
        let raw = "one|two\na|b|c|d\nempty\n\ncat|猫|/kæt/";
        let entries = parse_word_entries(raw);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].english, "cat");
    }

    #[test]
    fn test_parse_keeps_input_order() {
        let raw = "b|い|/b/\na|あ|/a/";
        let entries = parse_word_entries(raw);
        assert_eq!(entries[0].english, "b");
        assert_eq!(entries[1].english, "a");
    }

    #[test]
    fn test_markdown_to_html_renders_emphasis() {
        let html = markdown_to_html("**I like dogs.**");
        assert!(html.contains("<strong>I like dogs.</strong>"));
    }
}
