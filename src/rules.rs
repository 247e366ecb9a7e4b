//! Pure classification rules over already-extracted listing text.

const INCLUDE_KEYWORDS: &[&str] = &[
    "marketing",
    "content",
    "social",
    "video",
    "digital",
    "creative",
    "communications",
    "community",
    "seo",
    "brand",
];

const EXCLUDE_KEYWORDS: &[&str] = &[
    "engineer",
    "engineering",
    "developer",
    "scientist",
    "medical writer",
    "nurse",
    "physician",
    "chemist",
];

pub fn is_remote(meta_tags: &[String], location: &str) -> bool {
    let haystack = format!("{} {}", location, meta_tags.join(" ")).to_lowercase();
    haystack.contains("remote") || haystack.contains("work from home")
}

/// Exclusion wins: a title carrying both an inclusion and an exclusion
/// keyword is rejected.
pub fn is_relevant_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    if EXCLUDE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return false;
    }
    INCLUDE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Substring rather than exact match, so an inferred region name like
/// "Brussels Region, Belgium" still counts for "Belgium".
pub fn country_matches(inferred: &str, search_country: &str) -> bool {
    inferred
        .to_lowercase()
        .contains(&search_country.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_remote_from_location() {
        assert!(is_remote(&[], "Remote, Netherlands"));
        assert!(is_remote(&[], "Amsterdam (remote)"));
        assert!(!is_remote(&[], "Amsterdam, Netherlands"));
    }

    #[test]
    fn test_is_remote_from_meta_tags() {
        assert!(is_remote(&tags(&["Hybrid", "Work From Home"]), "Berlin"));
        assert!(is_remote(&tags(&["REMOTE"]), "Berlin"));
        assert!(!is_remote(&tags(&["On-site", "Full-time"]), "Berlin"));
    }

    #[test]
    fn test_relevant_titles_accepted() {
        assert!(is_relevant_title("Marketing Manager"));
        assert!(is_relevant_title("Senior Content Strategist"));
        assert!(is_relevant_title("SEO Specialist"));
        assert!(is_relevant_title("Head of Brand"));
        assert!(is_relevant_title("Community Lead"));
    }

    #[test]
    fn test_irrelevant_titles_rejected() {
        assert!(!is_relevant_title("Software Engineer"));
        assert!(!is_relevant_title("Account Executive"));
        assert!(!is_relevant_title("Registered Nurse"));
        assert!(!is_relevant_title("Warehouse Operative"));
    }

    #[test]
    fn test_exclusion_dominates_inclusion() {
        // Both keyword sets present -> rejected, always.
        assert!(!is_relevant_title("Marketing Engineer"));
        assert!(!is_relevant_title("Content Developer"));
        assert!(!is_relevant_title("Social Media Data Scientist"));
        assert!(!is_relevant_title("Medical Writer - Digital Content"));
    }

    #[test]
    fn test_title_matching_is_case_insensitive() {
        assert!(is_relevant_title("MARKETING COORDINATOR"));
        assert!(!is_relevant_title("BRAND ENGINEERING LEAD"));
    }

    #[test]
    fn test_country_matches_substring() {
        assert!(country_matches("Netherlands", "Netherlands"));
        assert!(country_matches("Brussels Region, Belgium", "Belgium"));
        assert!(country_matches("belgium", "Belgium"));
        assert!(!country_matches("Germany", "Belgium"));
    }
}
