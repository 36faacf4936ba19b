use async_trait::async_trait;
use meshsentry_application::ports::SettingsPort;
use meshsentry_domain::MeshError;
use sqlx::SqlitePool;
use tracing::instrument;

use super::crypto::SettingsCipher;

/// `geo_*`/`fw_*`/`jail_*` key-value settings store. Plain values go through
/// `get`/`set`; encrypted values use the separate `get_encrypted`/
/// `set_encrypted` pair so callers can never accidentally read ciphertext
/// through the plain accessor.
pub struct SqliteSettingsStore {
    pool: SqlitePool,
    cipher: SettingsCipher,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool, secret: &[u8; 32]) -> Result<Self, MeshError> {
        Ok(Self {
            pool,
            cipher: SettingsCipher::new(secret)?,
        })
    }

    async fn raw_get(&self, key: &str) -> Result<Option<String>, MeshError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;
        Ok(row.map(|(v,)| v))
    }

    async fn raw_set(&self, key: &str, value: &str, encrypted: bool) -> Result<(), MeshError> {
        sqlx::query(
            "INSERT INTO settings (key, value, encrypted) VALUES (?, ?, ?)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, encrypted = excluded.encrypted",
        )
        .bind(key)
        .bind(value)
        .bind(encrypted as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsPort for SqliteSettingsStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, MeshError> {
        self.raw_get(key).await
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<(), MeshError> {
        self.raw_set(key, value, false).await
    }

    #[instrument(skip(self))]
    async fn get_encrypted(&self, key: &str) -> Result<Option<String>, MeshError> {
        match self.raw_get(key).await? {
            Some(ciphertext) => Ok(Some(self.cipher.decrypt(&ciphertext)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, value))]
    async fn set_encrypted(&self, key: &str, value: &str) -> Result<(), MeshError> {
        let ciphertext = self.cipher.encrypt(value)?;
        self.raw_set(key, &ciphertext, true).await
    }
}
