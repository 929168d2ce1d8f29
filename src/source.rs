//! Droptable - Table sources
//!
//! Fetches the raw bytes of a drop table from a local file (memory-mapped),
//! stdin, or an `http(s)://` URL, then decodes them as UTF-8 explicitly.
//!
//! Loading is one async fetch-decode-parse step. There is no timeout: a
//! fetch that never completes leaves the caller waiting.

use std::borrow::Cow;
use std::fs::File;
use std::path::PathBuf;

use bytes::Bytes;
use memmap2::Mmap;
use reqwest::Client;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info};

use crate::data::Dataset;
use crate::error::LoadError;
use crate::parser::{parse_with, HeaderSpec};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
    Stdin,
}

impl Source {
    /// Interpret a command-line argument: `-` is stdin, `http(s)://` is a
    /// URL, anything else a file path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else if arg.starts_with("http://") || arg.starts_with("https://") {
            Source::Url(arg.to_string())
        } else {
            Source::File(PathBuf::from(arg))
        }
    }

    /// Short name for titles and messages
    pub fn display_name(&self) -> String {
        match self {
            Source::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Source::Url(url) => url.clone(),
            Source::Stdin => "<stdin>".to_string(),
        }
    }
}

/// Raw table bytes, either mapped from disk or held in memory
pub enum RawTable {
    Mmap(Mmap),
    Buffer(Bytes),
}

impl RawTable {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawTable::Mmap(m) => m.as_ref(),
            RawTable::Buffer(b) => b.as_ref(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read the raw bytes of a source.
pub async fn fetch(source: &Source) -> Result<RawTable, LoadError> {
    match source {
        Source::File(path) => {
            let io_err = |cause: std::io::Error| LoadError::Io {
                source_name: path.display().to_string(),
                cause,
            };
            let file = File::open(path).map_err(io_err)?;
            if file.metadata().map_err(io_err)?.len() == 0 {
                return Ok(RawTable::Buffer(Bytes::new()));
            }
            // The map is read once and dropped before the file could change
            let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
            Ok(RawTable::Mmap(mmap))
        }
        Source::Stdin => read_all(tokio::io::stdin(), &source.display_name())
            .await
            .map(RawTable::Buffer),
        Source::Url(url) => fetch_url(url).await.map(RawTable::Buffer),
    }
}

async fn read_all<R: AsyncRead + Unpin>(
    mut reader: R,
    source_name: &str,
) -> Result<Bytes, LoadError> {
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .await
        .map_err(|cause| LoadError::Io {
            source_name: source_name.to_string(),
            cause,
        })?;
    Ok(Bytes::from(buffer))
}

async fn fetch_url(url: &str) -> Result<Bytes, LoadError> {
    let client = Client::builder()
        .user_agent(concat!("droptable/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|cause| LoadError::Http {
            url: url.to_string(),
            cause,
        })?;
    get_bytes(&client, url).await
}

async fn get_bytes(client: &Client, url: &str) -> Result<Bytes, LoadError> {
    let http_err = |cause: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        cause,
    };

    debug!("GET {}", url);
    let resp = client.get(url).send().await.map_err(http_err)?;
    if !resp.status().is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    resp.bytes().await.map_err(http_err)
}

/// Decode table bytes as UTF-8.
///
/// A leading byte-order mark is dropped and malformed sequences become
/// U+FFFD instead of failing the load.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

/// Fetch, decode and parse a source into a dataset.
pub async fn load_dataset(source: &Source, spec: &HeaderSpec) -> Result<Dataset, LoadError> {
    info!("Loading {}", source.display_name());
    let raw = fetch(source).await?;
    let text = decode(raw.as_bytes());
    let dataset = parse_with(&text, spec)?;
    info!(
        "Loaded {} rows, {} locations ({} bytes) from {}",
        dataset.len(),
        dataset.location_count(),
        raw.len(),
        source.display_name()
    );
    Ok(dataset)
}
