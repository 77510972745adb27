pub mod assets;
pub mod config;
pub mod database;
pub mod errors;
pub mod game_launch;
pub mod models;
pub mod repositories;
pub mod uploads;
pub mod utils;
pub mod web;
