//! Ownership checks
//!
//! Every resource belongs to a field, and every field to exactly one user.
//! A field that exists but belongs to someone else is reported exactly like a
//! missing one.

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Field, FieldKey, UserId};
use crate::store::Store;
use rustc_hash::FxHashSet;
use uuid::Uuid;

/// The caller's field addressed by `key`.
pub fn owned_field(store: &Store, owner: UserId, key: &FieldKey) -> ServiceResult<Field> {
    let field = match key {
        FieldKey::Id(id) => store.fields.get(*id).filter(|f| f.owner == owner),
        FieldKey::Code(code) => store
            .fields
            .find_one(|f| f.owner == owner && f.field_id == *code),
    };
    field.ok_or_else(ServiceError::field_not_found)
}

/// Like `owned_field`, for a key still in its raw string form.
pub fn owned_field_raw(store: &Store, owner: UserId, raw: &str) -> ServiceResult<Field> {
    owned_field(store, owner, &FieldKey::parse(raw))
}

/// Field by document id, only if `owner` holds it.
pub fn field_if_owned(store: &Store, owner: UserId, field_id: Uuid) -> Option<Field> {
    store.fields.get(field_id).filter(|f| f.owner == owner)
}

/// Document ids of every field the caller owns
pub fn owned_field_ids(store: &Store, owner: UserId) -> FxHashSet<Uuid> {
    store
        .fields
        .find(|f| f.owner == owner)
        .into_iter()
        .map(|f| f.id)
        .collect()
}
