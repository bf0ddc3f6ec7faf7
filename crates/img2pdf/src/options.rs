use crate::types::{AssembleError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How imported files are decoded into page images.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImportOptions {
    /// Scale factor applied when rasterizing PDF pages (1.0 = native size).
    pub zoom: f32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl ImportOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.zoom > 0.0) {
            return Err(AssembleError::Config(format!(
                "zoom must be positive, got {}",
                self.zoom
            )));
        }
        Ok(())
    }
}

/// How the output PDF is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExportOptions {
    /// JPEG quality for embedded page images (1-100).
    pub quality: u8,
    /// Compress object streams in the assembled document.
    pub optimize: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            optimize: true,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 || self.quality > 100 {
            return Err(AssembleError::Config(format!(
                "quality must be in 1..=100, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| AssembleError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AssembleError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
