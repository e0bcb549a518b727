pub mod codes;
pub mod errors;
pub mod jwt;
pub mod notify;
pub mod pagination;
pub mod password;
