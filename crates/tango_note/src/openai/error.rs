use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("request failed, status code: {0}, message: {1}")]
    RequestFailed(u16, String),
    #[error("completion has no choices")]
    EmptyCompletion,
    #[error("completion message has no content")]
    EmptyContent,
}
