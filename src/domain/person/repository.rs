use super::{
    person::{Person, PersonDetails},
    person_id::PersonId,
};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PersonRepositoryError {
    #[error("name missing")]
    NameMissing,
    #[error("number missing")]
    NumberMissing,
    #[error("name must be unique")]
    NameAlreadyExists,
    #[error("person not found")]
    PersonNotFound,
    #[error("malformatted id")]
    InvalidId,
    #[error("internal error: {0}")]
    InternalError(String),
}

#[async_trait::async_trait]
pub trait PersonRepository: PersonClone + Send + Sync {
    async fn get_people(&self) -> Result<Vec<Person>, PersonRepositoryError>;
    async fn count_people(&self) -> Result<usize, PersonRepositoryError>;
    async fn get_person_by_id(&self, id: &PersonId) -> Result<Person, PersonRepositoryError>;
    async fn create_person(&self, details: &PersonDetails)
        -> Result<Person, PersonRepositoryError>;
    async fn update_person(
        &self,
        id: &PersonId,
        details: &PersonDetails,
    ) -> Result<Person, PersonRepositoryError>;
    async fn delete_person(&self, id: &PersonId) -> Result<(), PersonRepositoryError>;
}
pub trait PersonClone {
    fn clone_box(&self) -> Box<dyn PersonRepository>;
}

impl<T> PersonClone for T
where
    T: 'static + PersonRepository + Clone,
{
    fn clone_box(&self) -> Box<dyn PersonRepository> {
        Box::new(self.clone())
    }
}

// We can now implement Clone manually by forwarding to clone_box.
impl Clone for Box<dyn PersonRepository> {
    fn clone(&self) -> Box<dyn PersonRepository> {
        self.clone_box()
    }
}
