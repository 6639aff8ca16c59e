use serde::Deserialize;

/// POST /translate 的表单
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub user_input: String,
}

/// POST /add_word 的表单
#[derive(Debug, Deserialize)]
pub struct AddWordRequest {
    pub english: String,
    pub japanese: String,
    pub pronunciation: String,
}
