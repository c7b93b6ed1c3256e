//! # Users Handler
//!
//! Create, read, update and delete for the `users` resource.
//!
//! - POST: firstName, lastName, phone, password, tosAgreement all required
//! - GET: phone query parameter required
//! - PUT: phone required, at least one of firstName, lastName, password
//! - DELETE: phone query parameter required
//!
//! Update and delete are existence-gated: the record is looked up first.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::errors::{UserError, UserResult};
use super::model::{
    redact, NewUser, FIRST_NAME_FIELD, HASHED_PASSWORD_FIELD, LAST_NAME_FIELD, PASSWORD_FIELD,
    PHONE_FIELD, TOS_AGREEMENT_FIELD, USERS_COLLECTION,
};
use crate::dispatch::{Handler, RequestDescriptor, Responder};
use crate::helpers::{parse_json_to_object, require_true, SecretHasher, TextField};
use crate::record_store::{RecordStore, StoreError};

/// Methods the users resource accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMethod {
    Post,
    Get,
    Put,
    Delete,
}

impl UserMethod {
    /// Parse a lower-cased method token
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "post" => Some(UserMethod::Post),
            "get" => Some(UserMethod::Get),
            "put" => Some(UserMethod::Put),
            "delete" => Some(UserMethod::Delete),
            _ => None,
        }
    }
}

/// Handler for the users resource
#[derive(Debug, Clone)]
pub struct UsersHandler {
    store: RecordStore,
    hasher: SecretHasher,
    phone: TextField,
}

impl UsersHandler {
    pub fn new(store: RecordStore, hasher: SecretHasher, phone_length: usize) -> Self {
        Self {
            store,
            hasher,
            phone: TextField::exact(phone_length),
        }
    }

    /// Create a user from a request payload
    pub async fn create(&self, payload: &Map<String, Value>) -> UserResult<()> {
        let name = TextField::non_empty();
        let first_name = name.validate(payload.get(FIRST_NAME_FIELD));
        let last_name = name.validate(payload.get(LAST_NAME_FIELD));
        let phone = self.phone.validate(payload.get(PHONE_FIELD));
        let password = name.validate(payload.get(PASSWORD_FIELD));
        let tos_agreement = require_true(payload.get(TOS_AGREEMENT_FIELD));

        let (Some(first_name), Some(last_name), Some(phone), Some(password), true) =
            (first_name, last_name, phone, password, tos_agreement)
        else {
            return Err(UserError::MissingRequiredFields);
        };

        if self.lookup(&phone).await?.is_some() {
            return Err(UserError::AlreadyExists);
        }

        let hashed_password = self.hasher.hash(&password).map_err(UserError::HashingFailed)?;
        let user = NewUser {
            first_name,
            last_name,
            phone,
            hashed_password,
            tos_agreement,
        };

        self.store
            .create(USERS_COLLECTION, &user.phone, &user)
            .await
            .map_err(|e| match e {
                // Lost the race against a concurrent create
                StoreError::AlreadyExists { .. } => UserError::AlreadyExists,
                StoreError::InvalidKey(_) => UserError::InvalidPhone,
                e => UserError::CreateFailed(e),
            })
    }

    /// Read a user, with the password digest removed
    pub async fn read(&self, query: &HashMap<String, String>) -> UserResult<Map<String, Value>> {
        let phone = self.query_phone(query)?;

        match self.lookup(&phone).await? {
            Some(user) => Ok(redact(user)),
            None => Err(UserError::NotFound),
        }
    }

    /// Apply the supplied fields to an existing user
    pub async fn update(&self, payload: &Map<String, Value>) -> UserResult<()> {
        let phone = self
            .phone
            .validate(payload.get(PHONE_FIELD))
            .ok_or(UserError::MissingRequiredField)?;

        let name = TextField::non_empty();
        let first_name = name.validate(payload.get(FIRST_NAME_FIELD));
        let last_name = name.validate(payload.get(LAST_NAME_FIELD));
        let password = name.validate(payload.get(PASSWORD_FIELD));

        if first_name.is_none() && last_name.is_none() && password.is_none() {
            return Err(UserError::MissingFieldsToUpdate);
        }

        let mut user = self.lookup(&phone).await?.ok_or(UserError::DoesNotExist)?;

        if let Some(first_name) = first_name {
            user.insert(FIRST_NAME_FIELD.to_string(), Value::String(first_name));
        }
        if let Some(last_name) = last_name {
            user.insert(LAST_NAME_FIELD.to_string(), Value::String(last_name));
        }
        if let Some(password) = password {
            let hashed = self.hasher.hash(&password).map_err(UserError::HashingFailed)?;
            user.insert(HASHED_PASSWORD_FIELD.to_string(), Value::String(hashed));
        }

        self.store
            .update(USERS_COLLECTION, &phone, &user)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => UserError::DoesNotExist,
                e => UserError::UpdateFailed(e),
            })
    }

    /// Delete an existing user
    pub async fn delete(&self, query: &HashMap<String, String>) -> UserResult<()> {
        let phone = self.query_phone(query)?;

        if self.lookup(&phone).await?.is_none() {
            return Err(UserError::CouldNotFind);
        }

        self.store
            .delete(USERS_COLLECTION, &phone)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => UserError::CouldNotFind,
                e => UserError::DeleteFailed(e),
            })
    }

    fn query_phone(&self, query: &HashMap<String, String>) -> UserResult<String> {
        query
            .get(PHONE_FIELD)
            .and_then(|phone| self.phone.validate_str(phone))
            .ok_or(UserError::MissingRequiredField)
    }

    /// Load a stored user; unreadable or empty documents count as absent
    async fn lookup(&self, phone: &str) -> UserResult<Option<Map<String, Value>>> {
        match self.store.read(USERS_COLLECTION, phone).await {
            Ok(content) => {
                let user = parse_json_to_object(&content);
                Ok((!user.is_empty()).then_some(user))
            }
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(StoreError::InvalidKey(_)) => Err(UserError::InvalidPhone),
            Err(e) => Err(UserError::LookupFailed(e)),
        }
    }

    async fn run(&self, method: UserMethod, request: &RequestDescriptor) -> UserResult<Option<Value>> {
        match method {
            UserMethod::Post => {
                let payload = parse_json_to_object(request.payload());
                self.create(&payload).await.map(|()| None)
            }
            UserMethod::Get => self
                .read(request.query())
                .await
                .map(|user| Some(Value::Object(user))),
            UserMethod::Put => {
                let payload = parse_json_to_object(request.payload());
                self.update(&payload).await.map(|()| None)
            }
            UserMethod::Delete => self.delete(request.query()).await.map(|()| None),
        }
    }
}

#[async_trait]
impl Handler for UsersHandler {
    async fn handle(&self, request: RequestDescriptor, respond: Responder) {
        let outcome = match UserMethod::parse(request.method()) {
            Some(method) => self.run(method, &request).await,
            None => Err(UserError::MethodNotAllowed),
        };

        match outcome {
            Ok(body) => respond.respond(200, body),
            Err(err) => {
                if err.is_client_error() {
                    tracing::debug!(error = %err, "Rejected users request");
                } else {
                    let cause = std::error::Error::source(&err)
                        .map(|source| source.to_string())
                        .unwrap_or_default();
                    tracing::error!(error = %err, cause = %cause, "Users request failed");
                }
                respond.respond(err.status_code(), err.body());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn handler() -> (TempDir, UsersHandler) {
        let dir = TempDir::new().unwrap();
        let handler = UsersHandler::new(
            RecordStore::new(dir.path()),
            SecretHasher::new("thisIsASecret"),
            10,
        );
        (dir, handler)
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn ada() -> Map<String, Value> {
        object(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "phone": "1234567890",
            "password": "s3cret",
            "tosAgreement": true,
        }))
    }

    fn phone_query(phone: &str) -> HashMap<String, String> {
        HashMap::from([("phone".to_string(), phone.to_string())])
    }

    #[tokio::test]
    async fn test_create_then_read_redacts_digest() {
        let (_dir, handler) = handler();

        handler.create(&ada()).await.unwrap();
        let user = handler.read(&phone_query("1234567890")).await.unwrap();

        assert_eq!(user["firstName"], "Ada");
        assert_eq!(user["lastName"], "Lovelace");
        assert_eq!(user["phone"], "1234567890");
        assert_eq!(user["tosAgreement"], true);
        assert!(!user.contains_key("hashedPassword"));
        assert!(!user.contains_key("password"));
    }

    #[tokio::test]
    async fn test_stored_record_holds_digest_not_password() {
        let (dir, handler) = handler();

        handler.create(&ada()).await.unwrap();
        let raw = std::fs::read_to_string(dir.path().join("users/1234567890.json")).unwrap();
        let stored = parse_json_to_object(&raw);

        assert!(!raw.contains("s3cret"));
        assert_eq!(
            stored["hashedPassword"],
            SecretHasher::new("thisIsASecret").hash("s3cret").unwrap()
        );
    }

    #[tokio::test]
    async fn test_each_required_field_is_enforced() {
        let (_dir, handler) = handler();

        for (field, bad) in [
            ("firstName", json!("  ")),
            ("lastName", json!(7)),
            ("phone", json!("12345")),
            ("password", json!("")),
            ("tosAgreement", json!(false)),
        ] {
            let mut payload = ada();
            payload.insert(field.to_string(), bad);
            assert!(matches!(
                handler.create(&payload).await,
                Err(UserError::MissingRequiredFields)
            ));

            let mut payload = ada();
            payload.remove(field);
            assert!(matches!(
                handler.create(&payload).await,
                Err(UserError::MissingRequiredFields)
            ));
        }
    }

    #[tokio::test]
    async fn test_second_create_conflicts_and_keeps_original() {
        let (_dir, handler) = handler();
        handler.create(&ada()).await.unwrap();

        let mut other = ada();
        other.insert("firstName".into(), json!("Grace"));
        assert!(matches!(
            handler.create(&other).await,
            Err(UserError::AlreadyExists)
        ));

        let user = handler.read(&phone_query("1234567890")).await.unwrap();
        assert_eq!(user["firstName"], "Ada");
    }

    #[tokio::test]
    async fn test_missing_user_outcomes() {
        let (_dir, handler) = handler();
        let query = phone_query("0000000000");

        assert!(matches!(handler.read(&query).await, Err(UserError::NotFound)));
        assert!(matches!(
            handler
                .update(&object(json!({"phone": "0000000000", "firstName": "X"})))
                .await,
            Err(UserError::DoesNotExist)
        ));
        assert!(matches!(handler.delete(&query).await, Err(UserError::CouldNotFind)));
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let (dir, handler) = handler();
        handler.create(&ada()).await.unwrap();
        let path = dir.path().join("users/1234567890.json");
        let before = parse_json_to_object(&std::fs::read_to_string(&path).unwrap());

        handler
            .update(&object(json!({"phone": "1234567890", "firstName": "Augusta"})))
            .await
            .unwrap();

        let after = parse_json_to_object(&std::fs::read_to_string(&path).unwrap());
        assert_eq!(after["firstName"], "Augusta");
        assert_eq!(after["lastName"], before["lastName"]);
        assert_eq!(after["hashedPassword"], before["hashedPassword"]);
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let (dir, handler) = handler();
        handler.create(&ada()).await.unwrap();

        handler
            .update(&object(json!({"phone": "1234567890", "password": " n3w "})))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("users/1234567890.json")).unwrap();
        let stored = parse_json_to_object(&raw);
        let hasher = SecretHasher::new("thisIsASecret");
        assert!(hasher.verify("n3w", stored["hashedPassword"].as_str().unwrap()));
        assert_eq!(stored["firstName"], "Ada");
    }

    #[tokio::test]
    async fn test_update_needs_phone_and_a_field() {
        let (_dir, handler) = handler();
        handler.create(&ada()).await.unwrap();

        assert!(matches!(
            handler.update(&object(json!({"firstName": "X"}))).await,
            Err(UserError::MissingRequiredField)
        ));
        assert!(matches!(
            handler
                .update(&object(json!({"phone": "1234567890", "firstName": " "})))
                .await,
            Err(UserError::MissingFieldsToUpdate)
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let (_dir, handler) = handler();
        handler.create(&ada()).await.unwrap();
        let query = phone_query("1234567890");

        handler.delete(&query).await.unwrap();

        assert!(matches!(handler.read(&query).await, Err(UserError::NotFound)));
        assert!(matches!(handler.delete(&query).await, Err(UserError::CouldNotFind)));
    }

    #[tokio::test]
    async fn test_query_phone_is_validated() {
        let (_dir, handler) = handler();

        assert!(matches!(
            handler.read(&HashMap::new()).await,
            Err(UserError::MissingRequiredField)
        ));
        assert!(matches!(
            handler.delete(&phone_query("123")).await,
            Err(UserError::MissingRequiredField)
        ));
    }

    #[tokio::test]
    async fn test_path_like_phone_is_rejected() {
        let (_dir, handler) = handler();
        let mut payload = ada();
        payload.insert("phone".into(), json!("../../etc/"));

        assert!(matches!(
            handler.create(&payload).await,
            Err(UserError::InvalidPhone)
        ));
    }

    #[tokio::test]
    async fn test_handle_rejects_unknown_methods() {
        let (dir, handler) = handler();
        let request = RequestDescriptor::new("PATCH", "/users", None, HashMap::new(), "");
        let (responder, completion) = Responder::channel();

        handler.handle(request, responder).await;

        let reply = completion.await.unwrap();
        assert_eq!(reply.status, Some(405));
        assert!(reply.body.is_none());
        assert!(!dir.path().join("users").exists());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(UserMethod::parse("post"), Some(UserMethod::Post));
        assert_eq!(UserMethod::parse("delete"), Some(UserMethod::Delete));
        assert_eq!(UserMethod::parse("GET"), None);
        assert_eq!(UserMethod::parse("patch"), None);
    }
}
