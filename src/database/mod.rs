pub mod manager;
pub mod models;
pub mod patients;
pub mod physicians;
