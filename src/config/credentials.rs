//! Saved TruckStop credentials for the `load-search` client.

use crate::domain::model::Credentials;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde_json::Value;

pub const CREDENTIALS_KEY: &str = "truckstop_config.json";

pub struct CredentialStore<S: Storage> {
    storage: S,
}

impl<S: Storage> CredentialStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn save(&self, credentials: &Credentials) -> Result<()> {
        let data = serde_json::to_vec_pretty(credentials)?;
        self.storage.write_file(CREDENTIALS_KEY, &data).await?;
        tracing::debug!("Saved credentials for user {}", credentials.user_name);
        Ok(())
    }

    /// `None` when nothing is saved or the saved file cannot be read back.
    pub async fn load(&self) -> Result<Option<Credentials>> {
        let Some(data) = self.storage.read_file(CREDENTIALS_KEY).await? else {
            return Ok(None);
        };

        match decode(&data) {
            Ok(credentials) => Ok(Some(credentials)),
            Err(e) => {
                tracing::error!("Failed to parse stored config: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_file(CREDENTIALS_KEY).await
    }
}

/// Older saves wrote `integrationId` as a number.
fn decode(data: &[u8]) -> serde_json::Result<Credentials> {
    let mut value: Value = serde_json::from_slice(data)?;
    if let Some(Value::Number(n)) = value.get("integrationId") {
        let id = n.to_string();
        value["integrationId"] = Value::String(id);
    }
    serde_json::from_value(value)
}
