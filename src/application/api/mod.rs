pub mod logger;
pub mod person;
pub mod router;
