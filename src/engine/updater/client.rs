//! Update Server Client
//!
//! Posts the manifest to the update server and parses the list of files it
//! wants replaced. Network access goes through [`Transport`] so runs can be
//! driven without a live server.

use super::error::{Result, UpdaterError};
use super::locator::ComponentKind;
use super::manifest::Manifest;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// The two network operations the updater performs
pub trait Transport {
    /// POST url-encoded `fields` and return the response body
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> std::result::Result<String, TransportError>;

    /// GET `url` as a byte stream
    fn open(&self, url: &str) -> std::result::Result<Box<dyn Read>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> std::result::Result<String, TransportError> {
        (**self).post_form(url, fields)
    }

    fn open(&self, url: &str) -> std::result::Result<Box<dyn Read>, TransportError> {
        (**self).open(url)
    }
}

/// Blocking HTTP transport with reqwest's default timeouts
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> std::result::Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("shoebill-updater/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> std::result::Result<String, TransportError> {
        let response = self.client.post(url).form(fields).send()?;
        let response = check_status(url, response)?;
        Ok(response.text()?)
    }

    fn open(&self, url: &str) -> std::result::Result<Box<dyn Read>, TransportError> {
        let response = self.client.get(url).send()?;
        Ok(Box::new(check_status(url, response)?))
    }
}

fn check_status(
    url: &str,
    response: reqwest::blocking::Response,
) -> std::result::Result<reqwest::blocking::Response, TransportError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        })
    }
}

/// Component kind named by the server, kept even when it is not one we know
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DescriptorKind {
    Known(ComponentKind),
    Unrecognized(String),
}

impl From<String> for DescriptorKind {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(kind) => DescriptorKind::Known(kind),
            Err(_) => DescriptorKind::Unrecognized(value),
        }
    }
}

impl From<DescriptorKind> for String {
    fn from(kind: DescriptorKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Known(kind) => write!(f, "{}", kind),
            DescriptorKind::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// One file the server wants fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    #[serde(rename = "Filetype")]
    pub kind: DescriptorKind,
    /// Stale file to remove first, relative to the server root
    #[serde(rename = "Oldfile")]
    pub old_file: String,
    #[serde(rename = "Filedownload")]
    pub download_url: String,
    #[serde(rename = "Filename")]
    pub filename: String,
}

/// Parse a reply body; anything but an array of complete records is an error
pub fn parse_reply(body: &str) -> Result<Vec<UpdateDescriptor>> {
    serde_json::from_str(body)
        .map_err(|e| UpdaterError::UpdateCheckFailed(format!("malformed reply: {}", e)))
}

pub struct UpdateClient<'a, T: Transport> {
    transport: &'a T,
    url: &'a str,
}

impl<'a, T: Transport> UpdateClient<'a, T> {
    pub fn new(transport: &'a T, url: &'a str) -> Self {
        Self { transport, url }
    }

    /// Submit the manifest and return what the server offers.
    ///
    /// An empty list means everything is current. No retry is attempted.
    pub fn fetch_updates(&self, manifest: &Manifest) -> Result<Vec<UpdateDescriptor>> {
        let json = manifest
            .to_json()
            .map_err(|e| UpdaterError::UpdateCheckFailed(e.to_string()))?;

        info!("Checking {} files against {}", manifest.len(), self.url);
        debug!("Manifest: {}", json);

        let body = self
            .transport
            .post_form(self.url, &[("json", json.as_str())])
            .map_err(|e| {
                UpdaterError::UpdateCheckFailed(format!(
                    "request to {} could not be sent: {}",
                    self.url, e
                ))
            })?;

        let descriptors = parse_reply(&body)?;
        info!("Server offered {} updates", descriptors.len());
        Ok(descriptors)
    }
}
