use serde::Serialize;

use super::person_id::PersonId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    id: PersonId,
    name: String,
    number: String,
}

impl Person {
    pub fn new(id: PersonId, name: &str, number: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            number: number.to_string(),
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }
    pub fn name(&self) -> &String {
        &self.name
    }
    pub fn number(&self) -> &String {
        &self.number
    }

    /// Replaces the name and number, keeping the id.
    pub fn replace_details(&mut self, details: &PersonDetails) {
        self.name = details.name().clone();
        self.number = details.number().clone();
    }
}

/// A name/number pair that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonDetails {
    name: String,
    number: String,
}

impl PersonDetails {
    pub fn new(name: &str, number: &str) -> Self {
        Self {
            name: name.to_string(),
            number: number.to_string(),
        }
    }

    pub fn name(&self) -> &String {
        &self.name
    }
    pub fn number(&self) -> &String {
        &self.number
    }
}
