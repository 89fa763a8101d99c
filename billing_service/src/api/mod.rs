pub mod error;
pub mod http_routes;
pub mod response;

pub use error::ApiError;
pub use http_routes::{routes, AppState};
