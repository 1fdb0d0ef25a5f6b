pub mod error;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{ApiResponse, AppState};
pub use routes::create_api_router;
