pub mod pool;
pub mod users;
pub mod videos;
