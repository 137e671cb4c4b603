//! Errors raised by data sources.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("{service} response malformed: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },
    #[error("{service} rejected the request ({status}): {message}")]
    Rejected {
        service: &'static str,
        status: String,
        message: String,
    },
    #[error("{0} credential is not configured")]
    MissingCredential(&'static str),
}

impl SourceError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Http { service, source }
    }

    pub(crate) fn malformed(service: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            service,
            message: message.into(),
        }
    }
}

/// Turn a non-success response into [`SourceError::Status`].
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, SourceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Status {
        service,
        status,
        body,
    })
}
