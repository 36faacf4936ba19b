mod block_country;
mod refresh_zones;
mod trigger_update;
mod unblock_country;

pub use block_country::BlockCountryUseCase;
pub use refresh_zones::RefreshZonesUseCase;
pub use trigger_update::TriggerUpdateUseCase;
pub use unblock_country::UnblockCountryUseCase;
