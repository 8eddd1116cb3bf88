use thiserror::Error;

/// Failure of a single fetch issued by a [`Paginator`](crate::pagination::Paginator).
///
/// Both variants leave the controller state untouched apart from the page number
/// that was requested.
#[derive(Debug, Error)]
pub enum PaginateError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to extract {what} from response")]
    Transform {
        what: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl PaginateError {
    pub fn transport(url: &str, source: anyhow::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub fn transform(what: &'static str, source: anyhow::Error) -> Self {
        Self::Transform { what, source }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

pub type Result<T> = std::result::Result<T, PaginateError>;

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to decode errors
pub fn decode_context(url: &str) -> String {
    format!("Failed to decode response body from: {}", url)
}

/// Add context to query parameter errors
pub fn param_context(raw: &str) -> String {
    format!("Invalid query parameter '{}', expected key=value", raw)
}
