//! Photo naming and persistence
//!
//! Captured stills arrive as base64 (usually a `data:image/jpeg;base64,`
//! URL) and are written to `<photos_dir>/<matricula>_<name>.jpg`. The bytes
//! are stored as received, without re-encoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

/// URL prefix under which the photos directory is served
pub const PUBLIC_PHOTOS_PREFIX: &str = "/photos";

/// Where a photo ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedPhoto {
    /// Server-relative URL, e.g. `/photos/1001_Ana Souza.jpg`
    pub path: String,
    pub filename: String,
}

/// File name for a student's photo
///
/// Both parts are used verbatim (no trimming, no case folding).
pub fn photo_filename(matricula: &str, name: &str) -> String {
    format!("{}_{}.jpg", matricula, name)
}

/// Public URL for a stored photo file name
pub fn public_path(filename: &str) -> String {
    format!("{}/{}", PUBLIC_PHOTOS_PREFIX, filename)
}

/// Reject identity values that would escape the photos directory
pub fn validate_identity(matricula: &str, name: &str) -> Result<()> {
    for (field, value) in [("matricula", matricula), ("name", name)] {
        if value.contains(['/', '\\', '\0']) {
            return Err(Error::InvalidIdentity(format!(
                "{} contains a path separator: {:?}",
                field, value
            )));
        }
    }
    Ok(())
}

/// Strip an optional `data:image/<subtype>;base64,` header
///
/// Anything else is returned unchanged and treated as bare base64.
pub fn strip_data_url_header(image: &str) -> &str {
    let Some(rest) = image.strip_prefix("data:image/") else {
        return image;
    };
    let Some((subtype, payload)) = rest.split_once(";base64,") else {
        return image;
    };
    let is_word = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_word {
        payload
    } else {
        image
    }
}

/// Decode a captured image into raw bytes
///
/// ASCII whitespace (line-wrapped base64) is ignored.
pub fn decode_image(image: &str) -> Result<Vec<u8>> {
    let payload: String = strip_data_url_header(image)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(Error::InvalidInput("image payload is empty".to_string()));
    }
    Ok(STANDARD.decode(payload)?)
}

/// Writes photos into a single directory
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Decode `image` and write it as `<matricula>_<name>.jpg`
    ///
    /// Creates the directory if needed and overwrites an existing file of
    /// the same name. Concurrent saves for the same student race; the last
    /// write wins.
    pub async fn save(&self, matricula: &str, name: &str, image: &str) -> Result<SavedPhoto> {
        validate_identity(matricula, name)?;
        let bytes = decode_image(image)?;

        let filename = photo_filename(matricula, name);
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_path = self.dir.join(&filename);
        tokio::fs::write(&file_path, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), file_path.display());

        Ok(SavedPhoto {
            path: public_path(&filename),
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // "hello" in base64
    const HELLO_B64: &str = "aGVsbG8=";

    #[test]
    fn test_photo_filename_keeps_fields_verbatim() {
        assert_eq!(photo_filename("1001", "Ana Souza"), "1001_Ana Souza.jpg");
        assert_eq!(photo_filename(" 7 ", "Zé"), " 7 _Zé.jpg");
    }

    #[test]
    fn test_public_path() {
        assert_eq!(public_path("1_A.jpg"), "/photos/1_A.jpg");
    }

    #[test]
    fn test_strip_data_url_header() {
        assert_eq!(
            strip_data_url_header("data:image/jpeg;base64,aGVsbG8="),
            HELLO_B64
        );
        assert_eq!(strip_data_url_header("data:image/png;base64,xyz"), "xyz");
        assert_eq!(strip_data_url_header(HELLO_B64), HELLO_B64);
        // Not a word subtype: left alone
        assert_eq!(
            strip_data_url_header("data:image/svg+xml;base64,abc"),
            "data:image/svg+xml;base64,abc"
        );
    }

    #[test]
    fn test_decode_image() {
        assert_eq!(decode_image("data:image/jpeg;base64,aGVs\nbG8=").unwrap(), b"hello");
        assert!(matches!(decode_image("data:image/jpeg;base64,"), Err(Error::InvalidInput(_))));
        assert!(matches!(decode_image("not base64!!"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_validate_identity() {
        assert!(validate_identity("1001", "Ana Souza").is_ok());
        assert!(validate_identity("../etc", "x").is_err());
        assert!(validate_identity("1", "a\\b").is_err());
        assert!(validate_identity("1", "nul\0").is_err());
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = PhotoStore::new(tmp.path().join("public").join("photos"));

        let saved = store
            .save("1001", "Ana Souza", "data:image/jpeg;base64,aGVsbG8=")
            .await
            .unwrap();
        assert_eq!(saved.filename, "1001_Ana Souza.jpg");
        assert_eq!(saved.path, "/photos/1001_Ana Souza.jpg");

        let file = store.dir().join("1001_Ana Souza.jpg");
        assert_eq!(std::fs::read(&file).unwrap(), b"hello");

        // "bye" in base64
        store.save("1001", "Ana Souza", "Ynll").await.unwrap();
        assert_eq!(std::fs::read(&file).unwrap(), b"bye");
    }

    #[tokio::test]
    async fn test_save_rejects_traversal_without_writing() {
        let tmp = TempDir::new().unwrap();
        let store = PhotoStore::new(tmp.path().join("photos"));

        let result = store.save("../../x", "Ana", HELLO_B64).await;

        assert!(matches!(result, Err(Error::InvalidIdentity(_))));
        assert!(!store.dir().exists());
    }
}
