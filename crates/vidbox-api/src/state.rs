//! Application state.
//!
//! Every handler dependency (pool, repositories, store, transcoder) is
//! injected through `AppState` rather than reached through globals; the
//! lifecycle is scoped to the process.

use std::time::Duration;

use sqlx::PgPool;

use vidbox_core::Config;
use vidbox_db::{SessionRepository, UserRepository, VideoRepository};
use vidbox_processing::{Transcoder, VideoValidator};
use vidbox_storage::VideoStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UserRepository,
    pub sessions: SessionRepository,
    pub videos: VideoRepository,
    pub store: VideoStore,
    pub validator: VideoValidator,
    pub transcoder: Transcoder,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, store: VideoStore) -> Self {
        let validator = VideoValidator::new(
            config.max_video_size_bytes,
            config.allowed_extensions.clone(),
        );
        let transcoder = Transcoder::new(
            config.ffmpeg_path.clone(),
            Duration::from_secs(config.transcode_timeout_secs),
        );

        AppState {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            videos: VideoRepository::new(pool),
            store,
            validator,
            transcoder,
            config,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
