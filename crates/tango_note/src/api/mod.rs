pub mod error;
pub mod handler;
pub mod request;
pub mod template;
pub mod wrapper;

use axum::routing::{get, post};
use axum::Router;

pub fn router() -> Router {
    Router::new()
        .route("/", get(handler::index))
        .route("/translate", post(handler::translate))
        .route("/tokenize", post(handler::tokenize))
        .route("/word_list", get(handler::word_list))
        .route("/add_word", post(handler::add_word))
        .route("/delete_word/{id}", get(handler::delete_word))
}
