//! In-memory reference implementation of the [`Store`] contract.
//!
//! Backs the server binary and the test suites. All operations run under a
//! single `RwLock`, which trivially gives the atomic check-and-create the
//! contract demands. Messages are keyed by their numeric id so iteration
//! yields ascending `msg-<n>` order.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use forum_core::{Message, MessageId, User};

use crate::error::{StoreError, StoreResult};
use crate::store::{MessageEdit, NewMessage, NewUser, Store, UserPatch};

/// In-process store. Cheap to construct; every test gets a fresh one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    messages: BTreeMap<u64, Message>,
    next_message: u64,
    users: BTreeMap<String, User>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        // Lock poisoning only happens if another thread panicked while
        // holding the guard; at that point the process is going down.
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn insert_message(
        inner: &mut Inner,
        message: NewMessage,
        replyto: Option<MessageId>,
    ) -> MessageId {
        inner.next_message += 1;
        let id = MessageId::from_number(inner.next_message);
        let row = Message {
            id: id.clone(),
            title: message.title,
            body: message.body,
            sender: message.sender,
            editor: None,
            replyto,
            origin_ip: message.origin_ip,
            modified_at: Utc::now().timestamp(),
        };
        inner.messages.insert(id.number(), row);
        id
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_messages(&self) -> StoreResult<Vec<Message>> {
        Ok(self.read().messages.values().cloned().collect())
    }

    async fn get_message(&self, id: &MessageId) -> StoreResult<Option<Message>> {
        Ok(self.read().messages.get(&id.number()).cloned())
    }

    async fn contains_message(&self, id: &MessageId) -> StoreResult<bool> {
        Ok(self.read().messages.contains_key(&id.number()))
    }

    async fn create_message(&self, message: NewMessage) -> StoreResult<MessageId> {
        let mut inner = self.write();
        let id = Self::insert_message(&mut inner, message, None);
        tracing::debug!(message_id = %id, "message created");
        Ok(id)
    }

    async fn append_answer(
        &self,
        parent: &MessageId,
        message: NewMessage,
    ) -> StoreResult<MessageId> {
        let mut inner = self.write();
        if !inner.messages.contains_key(&parent.number()) {
            return Err(StoreError::MessageNotFound(parent.clone()));
        }
        let id = Self::insert_message(&mut inner, message, Some(parent.clone()));
        tracing::debug!(message_id = %id, parent = %parent, "reply created");
        Ok(id)
    }

    async fn modify_message(&self, id: &MessageId, edit: MessageEdit) -> StoreResult<bool> {
        let mut inner = self.write();
        let Some(row) = inner.messages.get_mut(&id.number()) else {
            return Ok(false);
        };
        row.title = edit.title;
        row.body = edit.body;
        row.editor = Some(edit.editor);
        row.modified_at = Utc::now().timestamp();
        tracing::debug!(message_id = %id, "message modified");
        Ok(true)
    }

    async fn delete_message(&self, id: &MessageId) -> StoreResult<bool> {
        let removed = self.write().messages.remove(&id.number()).is_some();
        if removed {
            tracing::debug!(message_id = %id, "message deleted");
        }
        Ok(removed)
    }

    async fn get_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read().users.values().cloned().collect())
    }

    async fn get_user(&self, nickname: &str) -> StoreResult<Option<User>> {
        Ok(self.read().users.get(nickname).cloned())
    }

    async fn contains_user(&self, nickname: &str) -> StoreResult<bool> {
        Ok(self.read().users.contains_key(nickname))
    }

    async fn append_user(&self, user: NewUser) -> StoreResult<String> {
        if user.nickname.is_empty() {
            return Err(StoreError::InvalidProfile("empty nickname".into()));
        }
        let mut inner = self.write();
        // Check and insert under one guard: the uniqueness race lives here,
        // not in the resource layer.
        if inner.users.contains_key(&user.nickname) {
            return Err(StoreError::DuplicateNickname(user.nickname));
        }
        let nickname = user.nickname.clone();
        inner.users.insert(
            nickname.clone(),
            User {
                nickname: user.nickname,
                registration_date: Utc::now().timestamp(),
                public_profile: user.public_profile,
                restricted_profile: user.restricted_profile,
            },
        );
        tracing::debug!(nickname = %nickname, "user registered");
        Ok(nickname)
    }

    async fn modify_user(&self, nickname: &str, patch: UserPatch) -> StoreResult<bool> {
        let mut inner = self.write();
        let Some(user) = inner.users.get_mut(nickname) else {
            return Ok(false);
        };
        if let Some(public) = patch.public {
            user.public_profile.signature = public.signature;
            user.public_profile.avatar = public.avatar;
        }
        if let Some(r) = patch.restricted {
            let p = &mut user.restricted_profile;
            if let Some(v) = r.firstname {
                p.firstname = v;
            }
            if let Some(v) = r.lastname {
                p.lastname = v;
            }
            if let Some(v) = r.email {
                p.email = v;
            }
            if let Some(v) = r.website {
                p.website = Some(v);
            }
            if let Some(v) = r.mobile {
                p.mobile = Some(v);
            }
            if let Some(v) = r.skype {
                p.skype = Some(v);
            }
            if let Some(v) = r.birthday {
                p.birthday = v;
            }
            if let Some(v) = r.residence {
                p.residence = Some(v);
            }
            if let Some(v) = r.gender {
                p.gender = v;
            }
            if let Some(v) = r.picture {
                p.picture = Some(v);
            }
        }
        tracing::debug!(nickname = %nickname, "profile updated");
        Ok(true)
    }

    async fn delete_user(&self, nickname: &str) -> StoreResult<bool> {
        let removed = self.write().users.remove(nickname).is_some();
        if removed {
            tracing::debug!(nickname = %nickname, "user deleted");
        }
        Ok(removed)
    }

    async fn messages_by_sender(&self, nickname: &str) -> StoreResult<Vec<Message>> {
        Ok(self
            .read()
            .messages
            .values()
            .filter(|m| m.sender == nickname)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{PublicProfileUpdate, RestrictedProfileUpdate};
    use forum_core::{PublicProfile, RestrictedProfile};

    fn new_message(title: &str, sender: &str) -> NewMessage {
        NewMessage {
            title: title.into(),
            body: format!("{title} body"),
            sender: sender.into(),
            origin_ip: Some("127.0.0.1".into()),
        }
    }

    fn new_user(nickname: &str) -> NewUser {
        NewUser {
            nickname: nickname.into(),
            public_profile: PublicProfile {
                signature: "sig".into(),
                avatar: "avatar.png".into(),
            },
            restricted_profile: RestrictedProfile {
                firstname: "Axel".into(),
                lastname: "W".into(),
                email: "axel@example.com".into(),
                website: Some("https://example.com".into()),
                mobile: None,
                skype: None,
                birthday: "1990-01-01".into(),
                residence: Some("Oulu,Finland".into()),
                gender: "male".into(),
                picture: None,
            },
        }
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let store = MemoryStore::new();
        let a = store.create_message(new_message("a", "x")).await.unwrap();
        let b = store.create_message(new_message("b", "x")).await.unwrap();
        assert_eq!(a.as_str(), "msg-1");
        assert_eq!(b.as_str(), "msg-2");
        let all = store.get_messages().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a);
    }

    #[tokio::test]
    async fn reply_records_parent() {
        let store = MemoryStore::new();
        let parent = store.create_message(new_message("a", "x")).await.unwrap();
        let child = store
            .append_answer(&parent, new_message("re: a", "y"))
            .await
            .unwrap();
        let row = store.get_message(&child).await.unwrap().unwrap();
        assert_eq!(row.replyto, Some(parent));
    }

    #[tokio::test]
    async fn reply_to_unknown_parent_fails() {
        let store = MemoryStore::new();
        let err = store
            .append_answer(&MessageId::from_number(9), new_message("a", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MessageNotFound(_)));
    }

    #[tokio::test]
    async fn modify_sets_editor() {
        let store = MemoryStore::new();
        let id = store.create_message(new_message("a", "x")).await.unwrap();
        let changed = store
            .modify_message(
                &id,
                MessageEdit {
                    title: "new".into(),
                    body: "new body".into(),
                    editor: "ed".into(),
                },
            )
            .await
            .unwrap();
        assert!(changed);
        let row = store.get_message(&id).await.unwrap().unwrap();
        assert_eq!(row.title, "new");
        assert_eq!(row.editor.as_deref(), Some("ed"));
    }

    #[tokio::test]
    async fn modify_unknown_message_returns_false() {
        let store = MemoryStore::new();
        let changed = store
            .modify_message(
                &MessageId::from_number(5),
                MessageEdit {
                    title: "t".into(),
                    body: "b".into(),
                    editor: "e".into(),
                },
            )
            .await
            .unwrap();
        assert!(!changed);
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let store = MemoryStore::new();
        let id = store.create_message(new_message("a", "x")).await.unwrap();
        assert!(store.delete_message(&id).await.unwrap());
        assert!(store.get_message(&id).await.unwrap().is_none());
        assert!(!store.delete_message(&id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_nickname_is_rejected() {
        let store = MemoryStore::new();
        store.append_user(new_user("AxelW")).await.unwrap();
        let err = store.append_user(new_user("AxelW")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateNickname(_)));
        assert_eq!(store.get_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn partial_restricted_update_keeps_omitted_fields() {
        let store = MemoryStore::new();
        store.append_user(new_user("AxelW")).await.unwrap();
        let patch = UserPatch {
            public: None,
            restricted: Some(RestrictedProfileUpdate {
                email: Some("new@example.com".into()),
                ..Default::default()
            }),
        };
        assert!(store.modify_user("AxelW", patch).await.unwrap());
        let user = store.get_user("AxelW").await.unwrap().unwrap();
        assert_eq!(user.restricted_profile.email, "new@example.com");
        // Untouched by the patch.
        assert_eq!(
            user.restricted_profile.website.as_deref(),
            Some("https://example.com")
        );
        assert_eq!(user.restricted_profile.firstname, "Axel");
    }

    #[tokio::test]
    async fn public_update_is_independent() {
        let store = MemoryStore::new();
        store.append_user(new_user("AxelW")).await.unwrap();
        let patch = UserPatch {
            public: Some(PublicProfileUpdate {
                signature: "new sig".into(),
                avatar: "new.png".into(),
            }),
            restricted: None,
        };
        assert!(store.modify_user("AxelW", patch).await.unwrap());
        let user = store.get_user("AxelW").await.unwrap().unwrap();
        assert_eq!(user.public_profile.signature, "new sig");
        assert_eq!(user.restricted_profile.email, "axel@example.com");
    }

    #[tokio::test]
    async fn messages_by_sender_filters() {
        let store = MemoryStore::new();
        store.create_message(new_message("a", "AxelW")).await.unwrap();
        store.create_message(new_message("b", "other")).await.unwrap();
        store.create_message(new_message("c", "AxelW")).await.unwrap();
        let mine = store.messages_by_sender("AxelW").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|m| m.sender == "AxelW"));
        assert!(store.messages_by_sender("nobody").await.unwrap().is_empty());
    }
}
