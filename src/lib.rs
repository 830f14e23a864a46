pub mod app;
pub mod config;
pub mod gateway;
pub mod media;
pub mod pages;
pub mod search;
pub mod tmdb;
pub mod utils;
