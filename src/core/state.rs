// Application state (AppState)

use crate::accounts::AccountService;
use crate::auth::token::TokenService;
use crate::core::config::Config;
use crate::stores::{record_store::RecordStore, user_store::UserStore};
use std::sync::Arc;

/// Shared application state
///
/// Everything here is immutable or internally synchronized; handlers share it through an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Usage records queried by the aggregate endpoints
    pub records: Arc<RecordStore>,

    /// Registered accounts
    pub users: Arc<UserStore>,

    /// Bearer token signing and verification
    pub tokens: Arc<TokenService>,

    /// Registration and login
    pub accounts: Arc<AccountService>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, records: RecordStore, users: UserStore) -> Self {
        let config = Arc::new(config);
        let users = Arc::new(users);
        let tokens = Arc::new(TokenService::new(&config.auth));

        let accounts = Arc::new(AccountService::new(
            Arc::clone(&users),
            Arc::clone(&tokens),
            config.auth.bcrypt_cost,
        ));

        Self {
            records: Arc::new(records),
            users,
            tokens,
            accounts,
            config,
        }
    }
}
