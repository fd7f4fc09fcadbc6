pub mod patients;
pub mod physicians;
