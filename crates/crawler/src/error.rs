// ABOUTME: Error types for the crawl layer: spider configuration, fetching and output writing.
// ABOUTME: ConfigError is fatal at spider construction; CrawlError and SinkError are logged per page or batch.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid spider arguments. Raised while building a spider, before any
/// request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown spider: {0}")]
    UnknownSpider(String),

    #[error("malformed argument {0:?}: expected key=value")]
    MalformedArgument(String),

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("{given} requires {missing}")]
    IncompleteRange {
        given: &'static str,
        missing: &'static str,
    },

    #[error("season range {from}..{to} is empty")]
    EmptyRange { from: i32, to: i32 },
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.into(),
            reason,
        }
    }
}

/// Categories of per-request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Status,
    Client,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Status => "unexpected status",
            ErrorCode::Client => "client error",
        };
        write!(f, "{}", s)
    }
}

/// A failed request, or an engine that could not be set up.
#[derive(Debug, Error)]
pub struct CrawlError {
    pub code: ErrorCode,
    pub url: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crawl {}: {}", self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl CrawlError {
    pub fn invalid_url(url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            url: url.into(),
            source,
        }
    }

    pub fn fetch(url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Fetch,
            url: url.into(),
            source,
        }
    }

    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            code: ErrorCode::Status,
            url: url.into(),
            source: Some(anyhow::anyhow!("HTTP status {}", status)),
        }
    }

    pub fn client(source: anyhow::Error) -> Self {
        Self {
            code: ErrorCode::Client,
            url: String::new(),
            source: Some(source),
        }
    }

    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    pub fn is_status(&self) -> bool {
        self.code == ErrorCode::Status
    }
}

/// A batch that could not be written.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error writing csv to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("error writing json to {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("tabular batch for {0} carries no schema")]
    MissingSchema(PathBuf),
}

impl SinkError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SinkError::Io { path, .. }
            | SinkError::Csv { path, .. }
            | SinkError::Json { path, .. }
            | SinkError::MissingSchema(path) => path,
        }
    }
}
