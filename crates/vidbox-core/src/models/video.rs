use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One uploaded media asset.
///
/// `stored_name` is the filename of the artifact currently on disk under
/// the upload root (post-transcode if transcoding occurred) and always
/// derives from `id`, never from user input. `original_name` is the
/// uploader-supplied filename kept for display and download.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub stored_name: String,
    pub original_name: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        VideoResponse {
            id: video.id,
            title: video.title,
            description: video.description,
            filename: video.original_name,
            created_at: video.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_video(owner_id: Uuid) -> Video {
        Video {
            id: Uuid::new_v4(),
            owner_id,
            stored_name: format!("{}.mp4", Uuid::new_v4()),
            original_name: "holiday.mov".to_string(),
            title: "holiday".to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_owned_by() {
        let owner = Uuid::new_v4();
        let video = test_video(owner);
        assert!(video.is_owned_by(owner));
        assert!(!video.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_video_response_exposes_original_name() {
        let video = test_video(Uuid::new_v4());
        let id = video.id;
        let response = VideoResponse::from(video);
        assert_eq!(response.id, id);
        assert_eq!(response.filename, "holiday.mov");
    }

    #[test]
    fn test_video_response_hides_stored_name() {
        let video = test_video(Uuid::new_v4());
        let json = serde_json::to_value(VideoResponse::from(video)).expect("serialize");
        assert!(json.get("stored_name").is_none());
        assert!(json.get("owner_id").is_none());
    }
}
