pub mod auth;
pub mod colleges;
pub mod consultants;
pub mod otp;
pub mod resources;
pub mod students;
pub mod users;
