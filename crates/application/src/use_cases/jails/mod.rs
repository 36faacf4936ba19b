mod create_jail;
mod delete_jail;
mod list_jails;
mod update_jail;

pub use create_jail::CreateJailUseCase;
pub use delete_jail::DeleteJailUseCase;
pub use list_jails::ListJailsUseCase;
pub use update_jail::UpdateJailUseCase;
