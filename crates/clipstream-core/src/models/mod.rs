pub mod upload_auth;
pub mod user;
pub mod video;

pub use upload_auth::{UploadAuth, UploadedFile};
pub use user::{RegisterRequest, RegisterResponse, User, UserResponse};
pub use video::{CreateVideoRequest, Video, VideoResponse, VideoRow, VideoTransformation};
