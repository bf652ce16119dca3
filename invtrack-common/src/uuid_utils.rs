//! Identifier generation for records created outside the legacy migration

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generate a prefixed record id, e.g. `tpl-6f1c...`
///
/// Migration ids use positional numbering (`tpl-1`, `item-1`); ids minted
/// here never collide with those because the suffix is a hyphenated UUID.
pub fn prefixed_id(prefix: &str) -> String {
    format!("{}-{}", prefix, generate())
}
