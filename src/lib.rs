pub mod app;
pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod exercises;
pub mod state;
pub mod workouts;
