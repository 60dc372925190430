pub mod analysis;
pub mod config;
pub mod credential;
pub mod errors;
pub mod models;
pub mod util;
