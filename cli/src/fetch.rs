//! Logo fetching over HTTP(S) with a local-file fallback.

use docpdf::assets::{content_type_for, AssetFetcher, FetchedAsset, FileFetcher};
use docpdf::{Error, Result};

/// Fetches `http://` and `https://` locations with reqwest, anything else
/// from the filesystem.
pub struct HttpFetcher {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
    files: FileFetcher,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("docpdf/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self {
            runtime,
            client,
            files: FileFetcher::new(),
        })
    }

    fn is_remote(location: &str) -> bool {
        location.starts_with("http://") || location.starts_with("https://")
    }

    async fn download(&self, url: &str) -> std::result::Result<FetchedAsset, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .or_else(|| content_type_for(url).map(str::to_string));
        let bytes = response.bytes().await?;
        Ok(FetchedAsset {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, location: &str) -> Result<FetchedAsset> {
        if !Self::is_remote(location) {
            return self.files.fetch(location);
        }
        log::debug!("Downloading {}", location);
        self.runtime
            .block_on(self.download(location))
            .map_err(|e| Error::Other(format!("download failed: {}", e)))
    }
}
