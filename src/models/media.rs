//! Media file models and MIME allow-lists.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// MIME types accepted for photo uploads.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// MIME types accepted for video uploads.
pub const ALLOWED_VIDEO_TYPES: [&str; 4] =
    ["video/mp4", "video/mpeg", "video/quicktime", "video/x-msvideo"];

pub fn is_allowed_media_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type) || ALLOWED_VIDEO_TYPES.contains(&content_type)
}

/// Media file metadata returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MediaFileResponse {
    pub id: Uuid,
    pub report_id: Uuid,
    pub activity_name: Option<String>,
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::media_file::Model> for MediaFileResponse {
    fn from(m: crate::entity::media_file::Model) -> Self {
        Self {
            id: m.id,
            report_id: m.report_id,
            activity_name: m.activity_name,
            file_name: m.file_name,
            file_path: m.file_path,
            file_type: m.file_type,
            file_size: m.file_size,
            uploaded_by: m.uploaded_by,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_media_types() {
        assert!(is_allowed_media_type("image/jpeg"));
        assert!(is_allowed_media_type("image/webp"));
        assert!(is_allowed_media_type("video/mp4"));
        assert!(!is_allowed_media_type("application/pdf"));
        assert!(!is_allowed_media_type("image/svg+xml"));
    }
}
