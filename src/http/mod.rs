pub mod error;
pub mod handlers;
pub mod utils;

pub use error::ApiError;
