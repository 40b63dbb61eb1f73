//! Client Repository

use super::{decode, encode};
use crate::store::{ListQuery, RecordStore, collections};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use serde_json::Value;
use shared::{Client, ClientDraft, CoreError, CoreResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct ClientRepository {
    store: Arc<dyn RecordStore>,
}

impl ClientRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn validate(draft: &ClientDraft) -> CoreResult<()> {
        validate_required_text(&draft.name, "client name", MAX_NAME_LEN)?;
        validate_optional_text(&draft.contact, "client contact", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&draft.address, "client address", MAX_ADDRESS_LEN)?;
        Ok(())
    }

    /// Create a new client
    pub async fn create(&self, draft: ClientDraft) -> CoreResult<Client> {
        Self::validate(&draft)?;
        let record = self
            .store
            .insert(collections::CLIENTS, encode(&draft)?)
            .await?;
        let client: Client = decode(record)?;
        tracing::info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    pub async fn find_by_id(&self, id: &str) -> CoreResult<Option<Client>> {
        let record = self.store.get(collections::CLIENTS, id).await?;
        record.map(decode).transpose()
    }

    /// All clients, ordered by name (case-insensitive)
    pub async fn find_all(&self) -> CoreResult<Vec<Client>> {
        let records = self
            .store
            .list(collections::CLIENTS, ListQuery::all())
            .await?;
        let mut clients = records
            .into_iter()
            .map(decode)
            .collect::<CoreResult<Vec<Client>>>()?;
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(clients)
    }

    /// Update identity fields
    pub async fn update(&self, id: &str, draft: ClientDraft) -> CoreResult<Client> {
        Self::validate(&draft)?;
        let patch = serde_json::json!({
            "name": draft.name,
            "contact": draft.contact.map(Value::from).unwrap_or(Value::Null),
            "address": draft.address.map(Value::from).unwrap_or(Value::Null),
        });
        let record = self.store.update(collections::CLIENTS, id, patch).await?;
        decode(record)
    }

    /// Delete a client.
    ///
    /// Deletion is blocked while any order still references the client:
    /// the directory must never leave dangling references silently.
    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        let referencing = self
            .store
            .list(collections::ORDERS, ListQuery::field_eq("client_id", id))
            .await?;
        if !referencing.is_empty() {
            return Err(CoreError::business_rule(format!(
                "client {id} still has {} order(s); delete or reassign them first",
                referencing.len()
            )));
        }
        self.store.delete(collections::CLIENTS, id).await?;
        tracing::info!(client_id = %id, "Client deleted");
        Ok(())
    }
}
