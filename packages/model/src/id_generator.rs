use uuid::Uuid;

/// Mint a globally unique node id (hyphenated UUID v4)
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Derive a URL slug from a page name
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_uuids() {
        let id1 = new_id();
        let id2 = new_id();

        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(&id1).is_ok());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Landing Page"), "landing-page");
        assert_eq!(slugify("  Thank You "), "thank-you");
    }
}
