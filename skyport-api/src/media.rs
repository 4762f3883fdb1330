use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::AppError;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Relative path an uploaded airplane image is stored under, derived from the
/// client filename. The random component keeps re-uploads from clobbering
/// each other.
pub fn airplane_image_path(airplane_id: Uuid, filename: &str) -> Result<String, AppError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| {
            AppError::ValidationError(format!("filename {filename:?} has no extension"))
        })?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::ValidationError(format!(
            "unsupported image extension {ext:?}: expected one of {ALLOWED_EXTENSIONS:?}"
        )));
    }
    Ok(format!("airplanes/{airplane_id}-{}.{ext}", Uuid::new_v4()))
}

/// Write the uploaded bytes under the media root and return the relative path
/// that gets persisted on the airplane row.
pub async fn store_airplane_image(
    media_root: &str,
    airplane_id: Uuid,
    filename: &str,
    data: &[u8],
) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::ValidationError("uploaded image is empty".to_string()));
    }
    let relative = airplane_image_path(airplane_id, filename)?;

    let full: PathBuf = Path::new(media_root).join(&relative);
    if let Some(parent) = full.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalServerError(format!("media directory: {e}")))?;
    }
    tokio::fs::write(&full, data)
        .await
        .map_err(|e| AppError::InternalServerError(format!("media write: {e}")))?;

    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_image_extensions() {
        let id = Uuid::new_v4();
        for name in ["plane.jpg", "plane.JPEG", "plane.png", "plane.webp"] {
            let path = airplane_image_path(id, name).unwrap();
            assert!(path.starts_with(&format!("airplanes/{id}-")), "{path}");
        }
    }

    #[test]
    fn rejects_non_image_extension() {
        let err = airplane_image_path(Uuid::new_v4(), "payload.exe").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn rejects_missing_extension() {
        let err = airplane_image_path(Uuid::new_v4(), "plane").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn rejects_empty_upload() {
        let err = store_airplane_image("/tmp", Uuid::new_v4(), "plane.png", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
