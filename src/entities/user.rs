//! User accounts
//!
//! A user owns itself: `owner_id` is the user's own id, so the ownership
//! policy lets a user act on its own account and admins on any account.

use crate::core::error::{ShopError, ShopResult};
use crate::core::field::FieldValue;
use crate::core::identity::Role;
use crate::core::password::hash_password;
use crate::core::resource::{CreatePolicy, Resource, ResourceKind, ResourceMeta};
use crate::{apply_fields, resource_meta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored user record, including the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    pub password_hash: String,
}

/// Signup payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UserDraft {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 8, max = 128, message = "must be 8 to 128 characters"))]
    pub password: String,
    /// Only admins may create users with a role other than `user`
    #[serde(default)]
    pub role: Option<Role>,
    /// Filled from `password` before the record is built
    #[serde(skip)]
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 8, max = 128, message = "must be 8 to 128 characters"))]
    pub password: Option<String>,
    /// Filled from `password` before the patch is stored
    #[serde(skip)]
    pub password_hash: Option<String>,
}

/// User as returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl Resource for User {
    type Draft = UserDraft;
    type Patch = UserPatch;
    type Public = UserView;

    const KIND: ResourceKind = ResourceKind::User;
    const FIELDS: &'static [&'static str] = &["email", "name", "role"];

    resource_meta!();

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.meta.id)
    }

    fn create_policy(draft: &UserDraft) -> CreatePolicy {
        match draft.role {
            Some(role) if role != Role::default() => CreatePolicy::AdminOnly,
            _ => CreatePolicy::Open,
        }
    }

    async fn prepare_draft(mut draft: UserDraft) -> ShopResult<UserDraft> {
        let password = std::mem::take(&mut draft.password);
        draft.password_hash = Some(hash_password(password).await?);
        Ok(draft)
    }

    fn build(draft: UserDraft, _owner_id: Option<Uuid>) -> ShopResult<Self> {
        let password_hash = draft
            .password_hash
            .ok_or_else(|| ShopError::Internal("user draft was built unhashed".into()))?;
        Ok(Self {
            meta: ResourceMeta::new(),
            email: draft.email,
            name: draft.name,
            role: draft.role.unwrap_or_default(),
            password_hash,
        })
    }

    async fn prepare_patch(mut patch: UserPatch) -> ShopResult<UserPatch> {
        if let Some(password) = patch.password.take() {
            patch.password_hash = Some(hash_password(password).await?);
        }
        Ok(patch)
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        apply_fields!(self, patch; email, name, password_hash);
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "email" => Some(self.email.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            "role" => Some(self.role.as_str().into()),
            _ => None,
        }
    }

    fn into_public(self) -> UserView {
        UserView {
            meta: self.meta,
            email: self.email,
            name: self.name,
            role: self.role,
        }
    }
}
