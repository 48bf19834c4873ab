//! Route derivation from function identifiers.

/// Derive the URL path for a function identifier under a version prefix.
///
/// Every underscore becomes a path separator and the result is mounted
/// under `/{version}/`. Leading separators produced by the replacement are
/// trimmed; interior ones are kept so distinct identifiers keep distinct
/// paths.
///
/// ```
/// use jolt::api::derive_route;
///
/// assert_eq!(derive_route("say_hi", "1"), "/1/say/hi");
/// assert_eq!(derive_route("ping", "1"), "/1/ping");
/// ```
pub fn derive_route(identifier: &str, version: &str) -> String {
    let segments = identifier.replace('_', "/");
    format!("/{}/{}", version, segments.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscores_become_separators() {
        assert_eq!(derive_route("say_hi", "1"), "/1/say/hi");
        assert_eq!(derive_route("get_user_profile", "1"), "/1/get/user/profile");
    }

    #[test]
    fn test_identifier_without_underscores_is_single_segment() {
        assert_eq!(derive_route("ping", "1"), "/1/ping");
    }

    #[test]
    fn test_leading_underscores_are_trimmed() {
        assert_eq!(derive_route("_private", "1"), "/1/private");
        assert_eq!(derive_route("__dunder", "1"), "/1/dunder");
    }

    #[test]
    fn test_interior_duplicates_are_preserved() {
        // Collapsing these would make "say__hi" and "say_hi" collide.
        assert_eq!(derive_route("say__hi", "1"), "/1/say//hi");
    }

    #[test]
    fn test_version_prefix_is_respected() {
        assert_eq!(derive_route("say_hi", "2"), "/2/say/hi");
        assert_eq!(derive_route("say_hi", "beta"), "/beta/say/hi");
    }

    #[test]
    fn test_derivation_is_deterministic() {
        assert_eq!(derive_route("say_hi", "1"), derive_route("say_hi", "1"));
    }
}
