//! Clipstream database layer: Postgres repositories over sqlx.

pub mod db;

pub use db::pool::connect_once;
pub use db::users::UserRepository;
pub use db::videos::VideoRepository;
