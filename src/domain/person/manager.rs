use super::{
    person::{Person, PersonDetails},
    person_id::PersonId,
    repository::{PersonRepository, PersonRepositoryError},
};

#[derive(Clone)]
pub struct PersonManager {
    repository: Box<dyn PersonRepository>,
}

impl PersonManager {
    pub fn new(repository: Box<dyn PersonRepository>) -> Self {
        return PersonManager { repository };
    }

    pub async fn create_person(
        &self,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<Person, PersonRepositoryError> {
        let details = validate_details(name, number)?;
        self.repository.create_person(&details).await
    }

    pub async fn update_person(
        &self,
        id: &PersonId,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<Person, PersonRepositoryError> {
        let details = validate_details(name, number)?;
        self.repository.update_person(id, &details).await
    }

    pub async fn get_person_by_id(&self, id: &PersonId) -> Result<Person, PersonRepositoryError> {
        self.repository.get_person_by_id(id).await
    }

    pub async fn get_people(&self) -> Result<Vec<Person>, PersonRepositoryError> {
        self.repository.get_people().await
    }

    pub async fn count_people(&self) -> Result<usize, PersonRepositoryError> {
        self.repository.count_people().await
    }

    pub async fn delete_person(&self, id: &PersonId) -> Result<(), PersonRepositoryError> {
        self.repository.delete_person(id).await
    }
}

// Blank strings count as missing; values are stored as sent.
fn validate_details(
    name: Option<&str>,
    number: Option<&str>,
) -> Result<PersonDetails, PersonRepositoryError> {
    let name = match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(PersonRepositoryError::NameMissing),
    };
    let number = match number {
        Some(number) if !number.trim().is_empty() => number,
        _ => return Err(PersonRepositoryError::NumberMissing),
    };
    Ok(PersonDetails::new(name, number))
}

#[cfg(test)]
pub mod tests {
    use mockall::{mock, predicate::eq};

    use super::*;

    mock! {
        pub Repository {}

        impl Clone for Repository {
            fn clone(&self) -> Self;
        }

        #[async_trait::async_trait]
        impl PersonRepository for Repository {
            async fn get_people(&self) -> Result<Vec<Person>, PersonRepositoryError>;
            async fn count_people(&self) -> Result<usize, PersonRepositoryError>;
            async fn get_person_by_id(&self, id: &PersonId) -> Result<Person, PersonRepositoryError>;
            async fn create_person(&self, details: &PersonDetails) -> Result<Person, PersonRepositoryError>;
            async fn update_person(&self, id: &PersonId, details: &PersonDetails) -> Result<Person, PersonRepositoryError>;
            async fn delete_person(&self, id: &PersonId) -> Result<(), PersonRepositoryError>;
        }
    }

    #[tokio::test]
    async fn test_create_person_keeps_details_as_sent() {
        let mut repository = MockRepository::new();
        repository
            .expect_create_person()
            .with(eq(PersonDetails::new(" Ada Lovelace ", "39-44-5323523")))
            .times(1)
            .returning(|details| {
                Ok(Person::new(
                    PersonId::Numeric(10),
                    details.name(),
                    details.number(),
                ))
            });
        let manager = PersonManager::new(Box::new(repository));
        let created = manager
            .create_person(Some(" Ada Lovelace "), Some("39-44-5323523"))
            .await;
        assert_eq!(
            created,
            Ok(Person::new(
                PersonId::Numeric(10),
                " Ada Lovelace ",
                "39-44-5323523"
            ))
        );
    }

    #[tokio::test]
    async fn test_create_person_without_name_never_reaches_store() {
        let mut repository = MockRepository::new();
        repository.expect_create_person().times(0);
        let manager = PersonManager::new(Box::new(repository));
        assert_eq!(
            manager.create_person(None, Some("123")).await,
            Err(PersonRepositoryError::NameMissing)
        );
        assert_eq!(
            manager.create_person(Some("   "), Some("123")).await,
            Err(PersonRepositoryError::NameMissing)
        );
    }

    #[tokio::test]
    async fn test_create_person_without_number() {
        let mut repository = MockRepository::new();
        repository.expect_create_person().times(0);
        let manager = PersonManager::new(Box::new(repository));
        assert_eq!(
            manager.create_person(Some("Dan Abramov"), Some("")).await,
            Err(PersonRepositoryError::NumberMissing)
        );
    }

    #[tokio::test]
    async fn test_update_person_propagates_store_error() {
        let mut repository = MockRepository::new();
        repository
            .expect_update_person()
            .times(1)
            .returning(|_, _| Err(PersonRepositoryError::PersonNotFound));
        let manager = PersonManager::new(Box::new(repository));
        assert_eq!(
            manager
                .update_person(&PersonId::Numeric(99), Some("X"), Some("1"))
                .await,
            Err(PersonRepositoryError::PersonNotFound)
        );
    }

    #[tokio::test]
    async fn test_count_people() {
        let mut repository = MockRepository::new();
        repository.expect_count_people().returning(|| Ok(4));
        let manager = PersonManager::new(Box::new(repository));
        assert_eq!(manager.count_people().await, Ok(4));
    }
}
