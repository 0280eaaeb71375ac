pub mod user;
pub mod video;

pub use user::{Session, User, UserResponse};
pub use video::{Video, VideoResponse};
