//! Session-cookie authentication and the per-video ownership guard.

pub mod password;
pub mod session;

pub use session::CurrentUser;

use uuid::Uuid;
use vidbox_core::models::Video;
use vidbox_core::AppError;

/// Ownership guard gating every per-video operation.
///
/// Allow iff the requester owns the video; Deny produces a uniform
/// access-denied error before any filesystem access or mutation happens.
pub fn ensure_owner(video: &Video, requester_id: Uuid) -> Result<(), AppError> {
    if video.is_owned_by(requester_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vidbox_core::ErrorMetadata;

    fn test_video(owner_id: Uuid) -> Video {
        Video {
            id: Uuid::new_v4(),
            owner_id,
            stored_name: format!("{}.mp4", Uuid::new_v4()),
            original_name: "clip.mp4".to_string(),
            title: "clip".to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        let owner = Uuid::new_v4();
        let video = test_video(owner);
        assert!(ensure_owner(&video, owner).is_ok());
    }

    #[test]
    fn test_any_other_identity_is_denied() {
        let video = test_video(Uuid::new_v4());
        for _ in 0..8 {
            let err = ensure_owner(&video, Uuid::new_v4()).unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
            assert_eq!(err.http_status_code(), 403);
            // uniform message, no detail about the video
            assert_eq!(err.client_message(), "Access denied");
        }
    }
}
