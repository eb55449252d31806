//! Keyed lookup table for diagnostic message text.
//!
//! Error values carry machine-readable kinds; only `Display` composition
//! reaches into this table. Unknown keys resolve to a generic fallback so a
//! missing entry can never turn into a panic on an error path.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static MESSAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("null_operand", "operand is not initialized"),
        (
            "dimension_mismatch",
            "operand dimensions are incompatible with the operator",
        ),
        (
            "invalid_enum_value",
            "value is not a member of the enumeration",
        ),
        ("index_out_of_range", "index is outside the valid range"),
        ("singular_matrix", "matrix is singular to working precision"),
        ("computation_failed", "native kernel reported a failure"),
        (
            "platform_unsupported",
            "native kernel capability is unavailable on this platform",
        ),
    ])
});

/// Resolve a symbolic message identifier to its human-readable text.
pub fn lookup(key: &str) -> &'static str {
    MESSAGES.get(key).copied().unwrap_or("unrecognized diagnostic")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve() {
        assert_eq!(lookup("singular_matrix"), "matrix is singular to working precision");
    }

    #[test]
    fn unknown_keys_fall_back() {
        assert_eq!(lookup("no_such_key"), "unrecognized diagnostic");
    }
}
