mod dispatch;
mod error;
mod handlers;
mod routes;

pub use routes::create_router;
