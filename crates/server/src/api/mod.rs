pub mod handlers;
pub mod middleware;
pub mod recordings;
pub mod routes;
pub mod webhook;

pub use routes::create_router;
