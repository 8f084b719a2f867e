pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod food_records;
pub mod nutrition;
pub mod state;
pub mod users;
