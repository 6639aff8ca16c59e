use std::sync::Arc;

use axum::extract::{Extension, Form, Path};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use handlebars::Handlebars;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::info;

use crate::api::error::InnerApiError;
use crate::api::request::{AddWordRequest, TranslateRequest};
use crate::api::wrapper::ApiError;
use crate::config::Config;
use crate::openai::OpenAiClient;
use crate::session::{build_session_cookie, new_session_id, parse_session_cookie, SessionStore};
use crate::{translator, word_store};

/// 从 Cookie 头中解析出已签名的会话 id
fn resolve_session_id(headers: &HeaderMap, secret: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| parse_session_cookie(value, secret))
}

pub async fn index(Extension(engine): Extension<Arc<Handlebars<'static>>>) -> Result<Html<String>, ApiError> {
    Ok(Html(engine.render("index", &json!({}))?))
}

pub async fn translate(
    Extension(store): Extension<Arc<SessionStore>>,
    Extension(client): Extension<Arc<OpenAiClient>>,
    Extension(engine): Extension<Arc<Handlebars<'static>>>,
    Extension(config): Extension<Arc<Config>>,
    headers: HeaderMap,
    Form(request): Form<TranslateRequest>,
) -> Result<Response, ApiError> {
    // 没有有效会话 Cookie 时发新的，翻译本身会重置会话内容
    let (session_id, set_cookie) = match resolve_session_id(&headers, &config.app_secret_key) {
        Some(session_id) => (session_id, None),
        None => {
            let session_id = new_session_id();
            let cookie = build_session_cookie(&session_id, &config.app_secret_key);
            (session_id, Some(cookie))
        }
    };

    let mut session = store.load(&session_id).await;
    let translation_result = translator::translate(&client, &mut session, &request.user_input).await?;
    store.save(&session_id, session).await;

    let body = engine.render("translation_result", &json!({ "translation_result": translation_result }))?;

    let mut response = Html(body).into_response();
    if let Some(cookie) = set_cookie {
        response.headers_mut().insert(SET_COOKIE, cookie.parse()?);
    }
    Ok(response)
}

pub async fn tokenize(
    Extension(store): Extension<Arc<SessionStore>>,
    Extension(client): Extension<Arc<OpenAiClient>>,
    Extension(engine): Extension<Arc<Handlebars<'static>>>,
    Extension(config): Extension<Arc<Config>>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let session_id = resolve_session_id(&headers, &config.app_secret_key)
        .ok_or_else(|| InnerApiError::BadRequest("当前会话没有翻译结果，请先进行翻译".to_string()))?;

    // 单词分割依赖会话里已有的翻译回合，没有就直接拒绝，不再请求模型
    let mut session = store.load(&session_id).await;
    if !session.has_assistant_turn() {
        return Err(InnerApiError::BadRequest("当前会话没有翻译结果，请先进行翻译".to_string()).into());
    }

    let words = translator::tokenize(&client, &mut session).await?;
    store.save(&session_id, session).await;

    Ok(Html(engine.render("tokenization_result", &json!({ "words": words }))?))
}

pub async fn word_list(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(engine): Extension<Arc<Handlebars<'static>>>,
) -> Result<Html<String>, ApiError> {
    let words = word_store::list_words(db.as_ref()).await?;
    Ok(Html(engine.render("word_list", &json!({ "words": words }))?))
}

pub async fn add_word(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Form(request): Form<AddWordRequest>,
) -> Result<Redirect, ApiError> {
    let word = word_store::add_word(db.as_ref(), &request.english, &request.japanese, &request.pronunciation).await?;
    info!("新增单词: {} ({})", word.english, word.japanese);
    Ok(Redirect::to("/word_list"))
}

pub async fn delete_word(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    if !word_store::delete_word(db.as_ref(), id).await? {
        return Err(InnerApiError::NotFound(id).into());
    }
    info!("已删除单词: id={}", id);
    Ok(Redirect::to("/word_list"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_resolve_session_id_accepts_signed_cookie() {
        let session_id = new_session_id();
        let set_cookie = build_session_cookie(&session_id, "secret");
        let pair = set_cookie.split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&pair).unwrap());

        assert_eq!(resolve_session_id(&headers, "secret"), Some(session_id));
    }

    #[test]
    fn test_resolve_session_id_rejects_forged_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("tango_session=abc.bad"));
        assert_eq!(resolve_session_id(&headers, "secret"), None);
    }

    #[test]
    fn test_resolve_session_id_without_cookie_header() {
        assert_eq!(resolve_session_id(&HeaderMap::new(), "secret"), None);
    }
}
