/// Drops every character that is not a word character (`[A-Za-z0-9_]`) or whitespace, then trims.
pub fn sanitize_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_punctuation_and_trims() {
        assert_eq!(sanitize_input("  The Matrix!  "), "The Matrix");
        assert_eq!(sanitize_input("Spider-Man: No Way Home"), "SpiderMan No Way Home");
        assert_eq!(sanitize_input("<script>alert(1)</script>"), "scriptalert1script");
        assert_eq!(sanitize_input("snake_case 42"), "snake_case 42");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(sanitize_input("Amélie"), "Amlie");
        assert_eq!(sanitize_input("???"), "");
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(s in "\\PC*") {
            let once = sanitize_input(&s);
            prop_assert_eq!(sanitize_input(&once), once);
        }
    }
}
