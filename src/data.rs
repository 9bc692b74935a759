use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CACHE_CONTROL, USER_AGENT};
use reqwest::StatusCode;
use thiserror::Error;

use crate::links::LinkDescriptor;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the link list comes from. Every `load` reads the backing
/// resource fresh; sources never cache between calls.
pub trait LinkSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Vec<LinkDescriptor>, LoadError>;
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{location} answered with status {status}")]
    Status { location: String, status: StatusCode },
    #[error("parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl LinkSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<LinkDescriptor>, LoadError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            location: self.path.display().to_string(),
            source,
        })
    }
}

pub struct HttpSource {
    http: HttpClient,
    url: String,
    user_agent: String,
}

impl HttpSource {
    pub fn new(url: String, user_agent: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("build links HTTP client")?;
        Ok(HttpSource {
            http,
            url,
            user_agent,
        })
    }
}

impl LinkSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Vec<LinkDescriptor>, LoadError> {
        let response = self
            .http
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .map_err(|source| LoadError::Http {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                location: self.url.clone(),
                status,
            });
        }

        let raw = response.text().map_err(|source| LoadError::Http {
            url: self.url.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            location: self.url.clone(),
            source,
        })
    }
}

/// Serves a fixed descriptor list; used by tests and demo setups.
#[derive(Default, Clone)]
pub struct MockSource {
    pub descriptors: Vec<LinkDescriptor>,
}

impl MockSource {
    pub fn new(descriptors: Vec<LinkDescriptor>) -> Self {
        MockSource { descriptors }
    }
}

impl LinkSource for MockSource {
    fn describe(&self) -> String {
        "built-in sample links".to_string()
    }

    fn load(&self) -> Result<Vec<LinkDescriptor>, LoadError> {
        Ok(self.descriptors.clone())
    }
}
