use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use crate::domain::person::{
    Person, PersonDetails, PersonId, PersonRepository, PersonRepositoryError,
};

/// Ids are drawn from `0..MAX_ID`.
const MAX_ID: u32 = 100_000;

/// Keeps the phonebook in process memory. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersonRepository {
    persons: Arc<RwLock<Vec<Person>>>,
}

impl MemoryPersonRepository {
    /// Starts with the four classic phonebook entries.
    pub fn seeded() -> Self {
        let persons = vec![
            Person::new(PersonId::Numeric(1), "Arto Hellas", "040-123456"),
            Person::new(PersonId::Numeric(2), "Ada Lovelace", "39-44-5323523"),
            Person::new(PersonId::Numeric(3), "Dan Abramov", "12-43-234345"),
            Person::new(PersonId::Numeric(4), "Mary Poppendieck", "39-23-6423122"),
        ];
        Self {
            persons: Arc::new(RwLock::new(persons)),
        }
    }
}

fn allocate_id(persons: &[Person]) -> Result<u32, PersonRepositoryError> {
    if persons.len() >= MAX_ID as usize {
        return Err(PersonRepositoryError::InternalError(
            "No identifier left to allocate".to_owned(),
        ));
    }
    let mut rng = rand::thread_rng();
    loop {
        let candidate = rng.gen_range(0..MAX_ID);
        if !persons
            .iter()
            .any(|p| p.id() == &PersonId::Numeric(candidate))
        {
            return Ok(candidate);
        }
    }
}

#[async_trait::async_trait]
impl PersonRepository for MemoryPersonRepository {
    async fn get_people(&self) -> Result<Vec<Person>, PersonRepositoryError> {
        Ok(self.persons.read().await.clone())
    }

    async fn count_people(&self) -> Result<usize, PersonRepositoryError> {
        Ok(self.persons.read().await.len())
    }

    async fn get_person_by_id(&self, id: &PersonId) -> Result<Person, PersonRepositoryError> {
        self.persons
            .read()
            .await
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or(PersonRepositoryError::PersonNotFound)
    }

    async fn create_person(
        &self,
        details: &PersonDetails,
    ) -> Result<Person, PersonRepositoryError> {
        let mut persons = self.persons.write().await;
        if persons.iter().any(|p| p.name() == details.name()) {
            return Err(PersonRepositoryError::NameAlreadyExists);
        }
        let id = allocate_id(&persons)?;
        let person = Person::new(PersonId::Numeric(id), details.name(), details.number());
        persons.push(person.clone());
        Ok(person)
    }

    async fn update_person(
        &self,
        id: &PersonId,
        details: &PersonDetails,
    ) -> Result<Person, PersonRepositoryError> {
        let mut persons = self.persons.write().await;
        let person = persons
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(PersonRepositoryError::PersonNotFound)?;
        person.replace_details(details);
        Ok(person.clone())
    }

    async fn delete_person(&self, id: &PersonId) -> Result<(), PersonRepositoryError> {
        self.persons.write().await.retain(|p| p.id() != id);
        Ok(())
    }
}
