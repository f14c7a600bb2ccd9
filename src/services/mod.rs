pub mod aggregation;
pub mod auth_service;
pub mod movie_service;
pub mod review_service;
pub mod store;

#[cfg(test)]
pub mod memory_store;
