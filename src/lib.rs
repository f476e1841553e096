pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod loader;
pub mod models;
pub mod parser;
pub mod queries;
pub mod report;
