use crate::models::user::UserAccount;
use crate::wal::wal::{Wal, WalOperation};
use anyhow::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Account collection keyed by email
pub struct UserStore {
    users: DashMap<String, Arc<UserAccount>>,
    wal: Wal<UserAccount>,
}

impl UserStore {
    pub fn new(wal: Wal<UserAccount>) -> Self {
        Self {
            users: DashMap::new(),
            wal,
        }
    }

    /// Apply a replayed journal entry without logging it again
    pub fn apply(&self, op: WalOperation<UserAccount>) {
        match op {
            WalOperation::Insert(user) => {
                self.users.insert(user.email.clone(), Arc::new(user));
            }
            WalOperation::Clear => self.users.clear(),
        }
    }

    pub fn find_by_email(&self, email: &str) -> Option<Arc<UserAccount>> {
        self.users.get(email).map(|entry| Arc::clone(entry.value()))
    }

    /// Persist a new account.
    ///
    /// Returns `Ok(false)` without writing anything if the email is already taken.
    pub fn insert(&self, user: UserAccount) -> Result<bool> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                self.wal.log_operation(&WalOperation::Insert(user.clone()))?;
                slot.insert(Arc::new(user));
                Ok(true)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
