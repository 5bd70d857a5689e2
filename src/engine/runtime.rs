/*!
 * Runtime artifact loading.
 *
 * Artifacts are either fetched over HTTP relative to a base URL or read from
 * disk. The kind of runtime build is decided from the payload's leading bytes,
 * never from the file name.
 */

use bytes::Bytes;
use log::debug;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::{Host, Url};

use crate::errors::BootstrapError;

/// Leading bytes of a compiled portable binary module (`\0asm`)
pub const MODULE_MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];

/// Kind of runtime build contained in an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// A compiled binary module
    CompiledModule,
    /// Source text for the portable interpreted build
    InterpretedSource,
}

impl RuntimeKind {
    /// Detect the runtime kind from the payload's first four bytes
    pub fn detect(payload: &[u8]) -> Self {
        if payload.len() >= MODULE_MAGIC.len() && payload[..MODULE_MAGIC.len()] == MODULE_MAGIC {
            Self::CompiledModule
        } else {
            Self::InterpretedSource
        }
    }
}

/// Where runtime artifacts are loaded from
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// Fetch over HTTP, relative to a base URL
    Http {
        /// Base URL; relative artifact paths are joined onto it
        base: Url,
        /// Client used for every fetch
        client: Client,
    },
    /// Read from a directory on disk
    Directory(PathBuf),
}

impl ArtifactSource {
    /// HTTP source rooted at `base`
    pub fn http(base: &str) -> Result<Self, BootstrapError> {
        // A base without a trailing slash would drop its last path segment on join
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&normalized)
            .map_err(|e| BootstrapError::InvalidLocation(format!("{}: {}", base, e)))?;

        let mut builder = Client::builder().timeout(Duration::from_secs(60));
        // A local dev server is reached directly, never through a system proxy
        if is_loopback(&base) {
            builder = builder.no_proxy();
        }
        let client = builder.build().unwrap_or_default();
        Ok(Self::Http { base, client })
    }

    /// Disk source rooted at `dir`
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self::Directory(dir.into())
    }

    /// Resolve a relative artifact path to a displayable location
    pub fn resolve(&self, path: &str) -> Result<String, BootstrapError> {
        match self {
            Self::Http { base, .. } => base
                .join(path)
                .map(|url| url.to_string())
                .map_err(|e| BootstrapError::InvalidLocation(format!("{}: {}", path, e))),
            Self::Directory(dir) => Ok(dir.join(path).to_string_lossy().to_string()),
        }
    }

    /// Load the artifact at `path`
    pub async fn fetch(&self, path: &str) -> Result<Bytes, BootstrapError> {
        let location = self.resolve(path)?;
        debug!("Fetching runtime artifact {}", location);

        match self {
            Self::Http { client, .. } => {
                let response = client.get(&location).send().await.map_err(|e| {
                    BootstrapError::LoadFailed {
                        location: location.clone(),
                        message: e.to_string(),
                    }
                })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(BootstrapError::FetchFailed {
                        url: location,
                        status: status.as_u16(),
                    });
                }

                response.bytes().await.map_err(|e| BootstrapError::LoadFailed {
                    location,
                    message: e.to_string(),
                })
            }
            Self::Directory(_) => tokio::fs::read(&location)
                .await
                .map(Bytes::from)
                .map_err(|e| BootstrapError::LoadFailed {
                    location,
                    message: e.to_string(),
                }),
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
