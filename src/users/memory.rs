use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{NewUser, StoreError, User, UserStore};

/// In-memory store for tests. The map entry API gives the same
/// one-winner guarantee as the unique index on `users.email`.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn len(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(email).map(|u| u.clone()))
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(user.email)),
            Entry::Vacant(slot) => {
                let user = user.into_user(Uuid::new_v4(), OffsetDateTime::now_utc());
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}

/// Store whose every call fails, for asserting that a code path never
/// reaches the database or that failures surface as 500s.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "$2b$10$hash".into(),
            first_name: Some("Ada".into()),
            last_name: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryUserStore::default();
        let created = store.insert(new_user("a@x.com")).await.expect("insert");
        assert!(created.is_active);

        let found = store
            .find_by_email("a@x.com")
            .await
            .expect("find")
            .expect("user present");
        assert_eq!(found.id, created.id);
        assert_eq!(found.first_name.as_deref(), Some("Ada"));
        assert!(store.exists("a@x.com").await.expect("exists"));
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = InMemoryUserStore::default();
        store.insert(new_user("a@x.com")).await.expect("insert");
        assert!(!store.exists("A@x.com").await.expect("exists"));
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryUserStore::default();
        store.insert(new_user("a@x.com")).await.expect("first insert");
        let err = store.insert(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref e) if e == "a@x.com"));
        assert_eq!(store.len(), 1);
    }
}
