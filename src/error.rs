use thiserror::Error;

/// Errors returned by [`EvntalyClient`](crate::EvntalyClient) operations.
///
/// Every failure is surfaced to the caller; the only outcomes reported as
/// success without a request being sent are the two documented `track`
/// short-circuits (tracking disabled, quota exhausted).
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid client configuration (bad base URL or credential string).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The request could not be sent or the connection failed.
    #[error("transport failure: {0}")]
    Transport(Box<ureq::Transport>),

    /// The API answered with a non-200 status.
    #[error("request failed with status code {0}")]
    Status(u16),

    /// The payload could not be encoded as JSON.
    #[error("failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body could not be read or was not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] std::io::Error),

    /// The response parsed but did not carry the expected field.
    #[error("unexpected API response format: missing `{0}` field")]
    UnexpectedFormat(&'static str),
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Error::Status(code),
            ureq::Error::Transport(transport) => Error::Transport(Box::new(transport)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_code() {
        let err = Error::Status(503);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn format_error_names_field() {
        let err = Error::UnexpectedFormat("limitReached");
        assert!(err.to_string().contains("limitReached"));
    }
}
