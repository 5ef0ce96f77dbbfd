use thiserror::Error;

/// Failures surfaced by menu construction, rendering, and delivery.
#[derive(Debug, Error)]
pub enum MenuError {
    /// The menu was built with unusable options.
    #[error("invalid menu configuration: {0}")]
    InvalidConfiguration(String),

    /// A page number outside `1..=total_pages` was requested.
    #[error("page {page} is out of range (1-{total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    /// The caller-supplied page formatter failed.
    #[error("page formatter failed for page {page}")]
    FormatterFailure {
        page: usize,
        #[source]
        source: anyhow::Error,
    },

    /// Sending or editing the menu message failed.
    #[error("failed to deliver menu page {page}")]
    ChannelDeliveryFailure {
        page: usize,
        #[source]
        source: anyhow::Error,
    },

    /// A custom timeout handler failed.
    #[error("menu timeout handler failed")]
    TimeoutHandlerFailure(#[source] anyhow::Error),
}

pub type MenuResult<T> = Result<T, MenuError>;
