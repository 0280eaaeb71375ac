pub mod account;
pub mod auth;
pub mod health;
pub mod video_delete;
pub mod video_edit;
pub mod video_get;
pub mod video_stream;
pub mod video_upload;
