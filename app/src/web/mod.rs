// app/src/web/mod.rs

pub mod flash;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod session;


pub use routes::configure_app_routes;
