//! Protocol adapters
//!
//! Each adapter turns one client wire shape into an [`UpdateRequest`]. They
//! are pure: no I/O, no authorization. Missing or empty required fields
//! fail with [`Error::BadRequest`](crate::Error::BadRequest); names that
//! cannot be split fail with
//! [`Error::InvalidFqdn`](crate::Error::InvalidFqdn).
//!
//! [`UpdateRequest`]: crate::UpdateRequest

pub mod acmedns;
pub mod directadmin;
pub mod httpreq;
pub mod plain;

/// A field value, treating empty strings as absent
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
