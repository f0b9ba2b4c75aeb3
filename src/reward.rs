use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;
use webbrowser::Browser;

use crate::character::Kanji;

/// Shown whenever a character has no reward picture of its own.
pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1528127269322-539801943592?w=400";

/// Picture shown in the overlay after a character is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardImage {
    Asset(PathBuf),
    Fallback(String),
}

impl RewardImage {
    /// Path or URL handed to the system viewer.
    pub fn location(&self) -> String {
        match self {
            RewardImage::Asset(path) => path.display().to_string(),
            RewardImage::Fallback(url) => url.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RewardImage::Fallback(_))
    }

    /// Open in the default browser/viewer. Returns false when none is available.
    pub fn open(&self) -> bool {
        if !Browser::is_available() {
            return false;
        }
        match webbrowser::open(&self.location()) {
            Ok(()) => true,
            Err(e) => {
                debug!("could not open reward image: {e}");
                false
            }
        }
    }
}

impl fmt::Display for RewardImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location())
    }
}

/// Resolves per-character reward pictures under `<root>/kanji/<c>.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardAssets {
    root: PathBuf,
    fallback: String,
}

impl RewardAssets {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            fallback: FALLBACK_IMAGE.to_string(),
        }
    }

    pub fn with_fallback(mut self, fallback: &str) -> Self {
        self.fallback = fallback.to_string();
        self
    }

    pub fn asset_path(&self, kanji: Kanji) -> PathBuf {
        self.root.join("kanji").join(format!("{kanji}.jpg"))
    }

    /// The character's own picture if it exists, otherwise the fallback.
    pub fn image_for(&self, kanji: Kanji) -> RewardImage {
        let path = self.asset_path(kanji);
        if path.is_file() {
            RewardImage::Asset(path)
        } else {
            RewardImage::Fallback(self.fallback.clone())
        }
    }
}

impl Default for RewardAssets {
    fn default() -> Self {
        Self::new("assets")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn existing_asset_is_used() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("kanji")).unwrap();
        std::fs::write(dir.path().join("kanji").join("山.jpg"), b"jpg").unwrap();

        let assets = RewardAssets::new(dir.path());
        let image = assets.image_for(Kanji::new('山').unwrap());

        assert_eq!(image, RewardImage::Asset(dir.path().join("kanji").join("山.jpg")));
        assert!(!image.is_fallback());
    }

    #[test]
    fn missing_asset_falls_back() {
        let dir = tempdir().unwrap();
        let assets = RewardAssets::new(dir.path());

        let image = assets.image_for(Kanji::new('川').unwrap());
        assert_eq!(image, RewardImage::Fallback(FALLBACK_IMAGE.to_string()));
        assert_eq!(image.location(), FALLBACK_IMAGE);
    }

    #[test]
    fn custom_fallback() {
        let dir = tempdir().unwrap();
        let assets = RewardAssets::new(dir.path()).with_fallback("file:///tmp/ok.png");
        assert_eq!(
            assets.image_for(Kanji::new('川').unwrap()).location(),
            "file:///tmp/ok.png"
        );
    }
}
