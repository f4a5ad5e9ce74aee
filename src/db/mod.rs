pub mod emotion_logs;
pub mod pool;
pub mod users;

pub use pool::create_pool;
