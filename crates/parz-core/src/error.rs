use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParzError {
    #[error("source I/O error: {0}")]
    SourceIo(#[source] std::io::Error),
    #[error("sink I/O error: {0}")]
    SinkIo(#[source] std::io::Error),
    #[error("truncated frame: {0}")]
    TruncatedFrame(&'static str),
    #[error("codec context allocation failed: {0}")]
    CodecInit(String),
    #[error("compression failed: {0}")]
    Compress(String),
    #[error("corrupt payload: {0}")]
    BadData(String),
    #[error("worker pool unavailable: {0}")]
    PoolUnavailable(&'static str),
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ParzError>,
    },
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ParzError {
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
