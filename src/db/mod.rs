pub mod connection;
pub mod job_repository;
pub mod migrations;
pub mod models;
pub mod operator_repository;
