use std::{io::Cursor, path::PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use tracing::{debug, info, warn};

use crate::{models::users::DEFAULT_AVATAR, utils::errors::app_error::AppError};

/// Avatars are scaled to fit inside a square of this many pixels.
const AVATAR_SIZE: u32 = 125;

/// Placeholder shown for users who never uploaded an avatar.
const DEFAULT_AVATAR_PNG: &[u8] = include_bytes!("../../assets/default.png");

/// Where avatar files end up. The default local implementation writes them to
/// the directory that is served under `/static/avatars`.
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    async fn save(&self, name: &str, data: Bytes) -> Result<(), AppError>;
    async fn delete(&self, name: &str) -> Result<(), AppError>;
}

pub struct LocalAvatarStorage {
    dir: PathBuf,
}

impl LocalAvatarStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes the placeholder avatar into the upload directory unless a file
    /// with that name is already there.
    pub async fn install_default(&self) -> Result<(), AppError> {
        let path = self.dir.join(DEFAULT_AVATAR);
        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?
        {
            return Ok(());
        }
        self.save(DEFAULT_AVATAR, Bytes::from_static(DEFAULT_AVATAR_PNG))
            .await?;
        info!("Installed default avatar at {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    async fn save(&self, name: &str, data: Bytes) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        debug!("Stored avatar at {}", path.display());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), AppError> {
        if name == DEFAULT_AVATAR {
            return Ok(());
        }
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Avatar {} was already gone", name);
                Ok(())
            }
            Err(e) => Err(AppError::StorageError(e.to_string())),
        }
    }
}

/// Picks the file extension for an upload, preferring the client file name
/// and falling back to the declared content type. Only jpg, jpeg and png pass.
pub fn avatar_extension(
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<&'static str, AppError> {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match (from_name.as_deref(), content_type) {
        (Some("jpg"), _) => Ok("jpg"),
        (Some("jpeg"), _) => Ok("jpeg"),
        (Some("png"), _) => Ok("png"),
        (Some(_), _) => Err(AppError::InvalidFileType),
        (None, Some("image/jpeg")) => Ok("jpg"),
        (None, Some("image/png")) => Ok("png"),
        (None, _) => Err(AppError::InvalidFileType),
    }
}

/// 16 random hex characters plus the extension.
pub fn random_avatar_name(extension: &str) -> String {
    format!("{:016x}.{}", rand::random::<u64>(), extension)
}

/// Decodes the upload, shrinks it to the avatar size when it is larger and
/// re-encodes it in the format matching `extension`. Smaller images keep their
/// dimensions.
pub fn process_avatar(image_data: &[u8], extension: &str) -> Result<Bytes, AppError> {
    let format = ImageFormat::from_extension(extension).ok_or(AppError::InvalidFileType)?;
    let img = image::load_from_memory(image_data).map_err(|_| AppError::InvalidFileType)?;

    let resized = if img.width() > AVATAR_SIZE || img.height() > AVATAR_SIZE {
        img.resize(AVATAR_SIZE, AVATAR_SIZE, FilterType::Lanczos3)
    } else {
        img
    };
    // jpeg has no alpha channel
    let resized = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
        _ => resized,
    };

    let mut buffer = Cursor::new(Vec::new());
    resized
        .write_to(&mut buffer, format)
        .map_err(|e| AppError::StorageError(e.to_string()))?;

    Ok(Bytes::from(buffer.into_inner()))
}


#[cfg(test)]
mod tests {
    use super::testing::png_bytes;
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("me.PNG"), None, Ok("png"))]
    #[case(Some("me.jpeg"), Some("image/jpeg"), Ok("jpeg"))]
    #[case(Some("me.jpg"), Some("application/octet-stream"), Ok("jpg"))]
    #[case(None, Some("image/png"), Ok("png"))]
    #[case(Some("me.gif"), Some("image/gif"), Err(()))]
    #[case(None, Some("text/plain"), Err(()))]
    #[case(None, None, Err(()))]
    fn test_avatar_extension(
        #[case] name: Option<&str>,
        #[case] content_type: Option<&str>,
        #[case] expected: Result<&str, ()>,
    ) {
        let result = avatar_extension(name, content_type).map_err(|_| ());
        assert_eq!(result, expected);
    }

    #[test]
    fn test_random_avatar_name() {
        let name = random_avatar_name("png");
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(stem.len(), 16);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_process_avatar_shrinks_large_images() {
        let processed = process_avatar(&png_bytes(500, 250), "png").unwrap();
        let img = image::load_from_memory(&processed).unwrap();
        assert_eq!(img.width(), 125);
        assert!((62..=63).contains(&img.height()));
    }

    #[test]
    fn test_process_avatar_keeps_small_images() {
        let processed = process_avatar(&png_bytes(50, 40), "png").unwrap();
        let img = image::load_from_memory(&processed).unwrap();
        assert_eq!((img.width(), img.height()), (50, 40));
    }

    #[test]
    fn test_process_avatar_encodes_jpeg() {
        let processed = process_avatar(&png_bytes(200, 200), "jpg").unwrap();
        assert_eq!(
            image::guess_format(&processed).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_process_avatar_rejects_non_images() {
        assert!(matches!(
            process_avatar(b"definitely not an image", "png"),
            Err(AppError::InvalidFileType)
        ));
    }

    #[tokio::test]
    async fn test_local_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("avatars-{}", uuid::Uuid::new_v4()));
        let storage = LocalAvatarStorage::new(dir.clone());

        storage
            .save("a.png", Bytes::from_static(b"data"))
            .await
            .unwrap();
        assert!(dir.join("a.png").exists());

        storage.delete("a.png").await.unwrap();
        assert!(!dir.join("a.png").exists());
        // deleting again is fine
        storage.delete("a.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_install_default_avatar() {
        let dir = std::env::temp_dir().join(format!("avatars-{}", uuid::Uuid::new_v4()));
        let storage = LocalAvatarStorage::new(dir.clone());

        storage.install_default().await.unwrap();
        let installed = std::fs::read(dir.join(DEFAULT_AVATAR)).unwrap();
        assert_eq!(installed, DEFAULT_AVATAR_PNG);
        let img = image::load_from_memory(&installed).unwrap();
        assert_eq!((img.width(), img.height()), (AVATAR_SIZE, AVATAR_SIZE));

        // a customised placeholder survives restarts
        std::fs::write(dir.join(DEFAULT_AVATAR), b"custom").unwrap();
        storage.install_default().await.unwrap();
        assert_eq!(std::fs::read(dir.join(DEFAULT_AVATAR)).unwrap(), b"custom");

        // and is never removed
        storage.delete(DEFAULT_AVATAR).await.unwrap();
        assert!(dir.join(DEFAULT_AVATAR).exists());
    }
}
