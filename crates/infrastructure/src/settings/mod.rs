mod crypto;
mod sqlite_settings;

pub use crypto::SettingsCipher;
pub use sqlite_settings::SqliteSettingsStore;
