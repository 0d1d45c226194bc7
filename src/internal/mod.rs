pub mod detail;
pub mod listing;
pub mod models;
pub mod render;
pub mod resolver;
