pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use error::ApiError;
pub use middleware::AdmissionState;
pub use routes::router;
