//! External assets: logo fetching and font directory listing.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::detect::extension;
use crate::error::{Error, Result};
use crate::pdf::LogoImage;

/// Raw bytes of a fetched asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAsset {
    pub bytes: Vec<u8>,
    /// MIME type, when the source reports one
    pub content_type: Option<String>,
}

/// Source of logo images and similar assets.
pub trait AssetFetcher: Send + Sync {
    /// Fetch the asset at `location`.
    fn fetch(&self, location: &str) -> Result<FetchedAsset>;
}

/// Reads assets from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl AssetFetcher for FileFetcher {
    fn fetch(&self, location: &str) -> Result<FetchedAsset> {
        let path = self.resolve(location);
        let bytes = std::fs::read(&path)?;
        Ok(FetchedAsset {
            bytes,
            content_type: content_type_for(location).map(str::to_string),
        })
    }
}

/// MIME type implied by a file name's extension.
pub fn content_type_for(name: &str) -> Option<&'static str> {
    match extension(name).as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Fetch and decode a logo. Any failure yields `None`.
pub fn load_logo(fetcher: &dyn AssetFetcher, location: &str) -> Option<LogoImage> {
    match fetcher.fetch(location) {
        Ok(asset) => {
            let logo = LogoImage::from_bytes(&asset.bytes, asset.content_type.as_deref());
            if logo.is_none() {
                log::warn!("Logo at {} could not be decoded, continuing without it", location);
            }
            logo
        }
        Err(e) => {
            log::warn!("Logo at {} unavailable ({}), continuing without it", location, e);
            None
        }
    }
}

/// A font file found in a font directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFile {
    pub name: String,
    pub path: PathBuf,
}

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// List `.ttf` and `.otf` files in `dir`, sorted by name.
///
/// A missing directory is an empty listing.
pub fn list_font_files(dir: impl AsRef<Path>) -> Result<Vec<FontFile>> {
    let dir = dir.as_ref();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::Io(e)),
    };

    let mut fonts = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if FONT_EXTENSIONS.contains(&extension(&name).as_str()) {
            fonts.push(FontFile {
                name,
                path: entry.path(),
            });
        } else {
            log::debug!("Skipping non-font file {}", name);
        }
    }
    fonts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(fonts)
}
