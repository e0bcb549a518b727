use uuid::Uuid;

/// Generate a short prefixed code like `STU-4F2A1C`.
///
/// Codes are derived from a random UUID so collisions are unlikely but not
/// impossible; callers that require global uniqueness (college codes) must
/// retry against the existing-code set.
pub fn generate_unique_code(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, hex[..6].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_format() {
        let code = generate_unique_code("COL");
        assert!(code.starts_with("COL-"));
        assert_eq!(code.len(), 10);
        assert!(
            code[4..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_codes_differ() {
        let a = generate_unique_code("STU");
        let b = generate_unique_code("STU");
        assert_ne!(a, b);
    }
}
