use hyper::Method;
use serde::{Deserialize, Serialize};
use serde_json::{value, Value};
use tracing::error;

use crate::{
    application::api::router::{
        ApiResponse, HttpError, INTERNAL_ERROR, MALFORMATTED_BODY_ERROR, MALFORMATTED_ID_ERROR,
        NOT_FOUND_ERROR, UNKNOWN_ENDPOINT_ERROR,
    },
    domain::person::{PersonId, PersonManager, PersonRepositoryError},
};

#[derive(Deserialize, Default)]
struct PersonInput {
    name: Option<String>,
    number: Option<String>,
}

impl TryFrom<Value> for PersonInput {
    type Error = HttpError<'static>;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|_| MALFORMATTED_BODY_ERROR)
    }
}

impl From<PersonRepositoryError> for HttpError<'static> {
    fn from(value: PersonRepositoryError) -> Self {
        match value {
            PersonRepositoryError::InvalidId => MALFORMATTED_ID_ERROR,
            PersonRepositoryError::NameMissing => HttpError::new(400, "name missing"),
            PersonRepositoryError::NumberMissing => HttpError::new(400, "number missing"),
            PersonRepositoryError::NameAlreadyExists => HttpError::new(400, "name must be unique"),
            PersonRepositoryError::PersonNotFound => NOT_FOUND_ERROR,
            PersonRepositoryError::InternalError(e) => {
                error!(
                    "An internal error occured while making an action on Persons: {}",
                    e
                );
                INTERNAL_ERROR
            }
        }
    }
}

fn to_json<T: Serialize>(output: &T) -> Result<ApiResponse, HttpError<'static>> {
    let json = value::to_value(output).map_err(|e| {
        error!(
            "An internal error occured while converting persons to value: {:?}",
            e
        );
        INTERNAL_ERROR
    })?;
    Ok(ApiResponse::Json(json))
}

/// Handles everything under `/api/persons`; `path` is what follows it.
pub async fn router(
    path: &str,
    method: &Method,
    body: Value,
    person_manager: &PersonManager,
) -> Result<ApiResponse, HttpError<'static>> {
    match (method, path) {
        (&Method::GET, "") => {
            let people = person_manager.get_people().await?;
            to_json(&people)
        }
        (&Method::POST, "") => {
            let input = PersonInput::try_from(body)?;
            let created = person_manager
                .create_person(input.name.as_deref(), input.number.as_deref())
                .await?;
            to_json(&created)
        }
        (_, "") => Err(UNKNOWN_ENDPOINT_ERROR),
        (_, id) if id.contains('/') => Err(UNKNOWN_ENDPOINT_ERROR),
        (&Method::GET, id) => {
            let id: PersonId = id.parse()?;
            let person = person_manager.get_person_by_id(&id).await?;
            to_json(&person)
        }
        (&Method::PUT, id) => {
            let id: PersonId = id.parse()?;
            let input = PersonInput::try_from(body)?;
            let updated = person_manager
                .update_person(&id, input.name.as_deref(), input.number.as_deref())
                .await?;
            to_json(&updated)
        }
        (&Method::DELETE, id) => {
            // Unknown and malformed ids are both already absent.
            if let Ok(id) = id.parse::<PersonId>() {
                match person_manager.delete_person(&id).await {
                    Ok(()) | Err(PersonRepositoryError::InvalidId) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(ApiResponse::NoContent)
        }
        (_, _) => Err(UNKNOWN_ENDPOINT_ERROR),
    }
}
