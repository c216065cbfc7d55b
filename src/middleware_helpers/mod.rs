pub mod request_id;
pub mod route_logging;

pub use request_id::request_id_middleware;
pub use route_logging::log_matched_route;
