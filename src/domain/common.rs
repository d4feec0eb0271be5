/// Two monetary totals closer than this are considered equal.
pub const BALANCE_TOLERANCE: f64 = 0.01;

/// Returns `true` when the two amounts agree within [`BALANCE_TOLERANCE`].
pub fn amounts_match(left: f64, right: f64) -> bool {
    (left - right).abs() < BALANCE_TOLERANCE
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Normalizes a name for case-insensitive comparison.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_within_a_cent_match() {
        assert!(amounts_match(100.0, 100.009));
        assert!(!amounts_match(100.0, 100.02));
    }

    #[test]
    fn normalize_ignores_case_and_padding() {
        assert_eq!(normalize_name("  Cash "), normalize_name("CASH"));
    }
}
