//! Alias casing helpers used when matching aliases against view names.

/// Convert a content-type alias to PascalCase.
///
/// Separators (anything that is not alphanumeric) are dropped and the
/// following character is upper-cased; existing inner capitals are kept, so
/// `heroBanner` and `hero-banner` both become `HeroBanner`.
pub fn to_pascal_case(alias: &str) -> String {
    let mut out = String::with_capacity(alias.len());
    let mut upper_next = true;

    for ch in alias.chars() {
        if !ch.is_alphanumeric() {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }

    out
}

/// Case-insensitive comparison of two names ignoring separators.
pub fn names_match(left: &str, right: &str) -> bool {
    let normalize = |value: &str| {
        value
            .chars()
            .filter(|ch| ch.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    normalize(left) == normalize(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_upper_cases_first_letter() {
        assert_eq!(to_pascal_case("hero"), "Hero");
        assert_eq!(to_pascal_case("heroBanner"), "HeroBanner");
    }

    #[test]
    fn pascal_case_drops_separators() {
        assert_eq!(to_pascal_case("hero-banner"), "HeroBanner");
        assert_eq!(to_pascal_case("hero_banner_v2"), "HeroBannerV2");
        assert_eq!(to_pascal_case("  spaced out "), "SpacedOut");
    }

    #[test]
    fn pascal_case_of_empty_is_empty() {
        assert_eq!(to_pascal_case(""), "");
        assert_eq!(to_pascal_case("--"), "");
    }

    #[test]
    fn names_match_ignores_case_and_separators() {
        assert!(names_match("heroBanner", "HeroBanner"));
        assert!(names_match("hero-banner", "HEROBANNER"));
        assert!(!names_match("hero", "heroBanner"));
    }
}
