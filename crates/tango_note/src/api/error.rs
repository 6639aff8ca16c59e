use thiserror::Error;

#[derive(Error, Debug)]
pub enum InnerApiError {
    #[error("word not found: {0}")]
    NotFound(i32),
    #[error("{0}")]
    BadRequest(String),
}
