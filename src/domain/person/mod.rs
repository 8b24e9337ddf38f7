mod manager;
mod person;
mod person_id;
mod repository;

pub use manager::PersonManager;
pub use person::{Person, PersonDetails};
pub use person_id::PersonId;
pub use repository::{PersonRepository, PersonRepositoryError};
