mod health;
mod routes;
mod sessions;

pub use routes::api_routes;
