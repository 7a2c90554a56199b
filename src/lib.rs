pub mod app;
pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod favorites;
pub mod models;
pub mod pages;
pub mod player;
pub mod session;
pub mod superflix;
pub mod tmdb;
