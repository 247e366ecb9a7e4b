use std::time::Duration;

use crate::models::SearchSpec;

pub const PROXY_BASE: &str = "https://r.jina.ai/";
pub const SOURCE_NAME: &str = "linkedin";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const ACCEPT: &str = "text/plain, text/markdown;q=0.9, */*;q=0.8";

// Pagination: offsets 0, 25, 50 -> at most three pages per search.
pub const PAGE_SIZE: usize = 25;
pub const MAX_OFFSET: usize = 50;

pub const GLOBAL_CAP: usize = 200;

// Politeness delays: before each detail fetch, between pages, between searches.
pub const DETAIL_DELAY: Duration = Duration::from_millis(1500);
pub const PAGE_DELAY: Duration = Duration::from_millis(2500);
pub const SEARCH_DELAY: Duration = Duration::from_millis(6000);

// Staffing mills whose reposts drown out real listings.
pub const BLOCKED_COMPANIES: &[&str] = &["crossover"];

pub const SEARCHES: [SearchSpec; 10] = [
    SearchSpec {
        country: "Netherlands",
        location: "Amsterdam, North Holland, Netherlands",
        keywords: "marketing",
        label: "Marketing roles in Amsterdam",
        country_cap: 50,
    },
    SearchSpec {
        country: "Netherlands",
        location: "Netherlands",
        keywords: "content marketing",
        label: "Content marketing in the Netherlands",
        country_cap: 50,
    },
    SearchSpec {
        country: "Germany",
        location: "Berlin, Germany",
        keywords: "marketing",
        label: "Marketing roles in Berlin",
        country_cap: 50,
    },
    SearchSpec {
        country: "Germany",
        location: "Germany",
        keywords: "social media",
        label: "Social media roles in Germany",
        country_cap: 50,
    },
    SearchSpec {
        country: "Belgium",
        location: "Brussels, Brussels Region, Belgium",
        keywords: "marketing",
        label: "Marketing roles in Brussels",
        country_cap: 30,
    },
    SearchSpec {
        country: "Belgium",
        location: "Belgium",
        keywords: "communications",
        label: "Communications roles in Belgium",
        country_cap: 30,
    },
    SearchSpec {
        country: "France",
        location: "Paris, Île-de-France, France",
        keywords: "marketing",
        label: "Marketing roles in Paris",
        country_cap: 40,
    },
    SearchSpec {
        country: "France",
        location: "France",
        keywords: "digital marketing",
        label: "Digital marketing in France",
        country_cap: 40,
    },
    SearchSpec {
        country: "Spain",
        location: "Madrid, Community of Madrid, Spain",
        keywords: "marketing",
        label: "Marketing roles in Madrid",
        country_cap: 30,
    },
    SearchSpec {
        country: "Spain",
        location: "Barcelona, Catalonia, Spain",
        keywords: "social media",
        label: "Social media roles in Barcelona",
        country_cap: 30,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_search_table_shape() {
        assert_eq!(SEARCHES.len(), 10);
        let countries: HashSet<&str> = SEARCHES.iter().map(|s| s.country).collect();
        assert_eq!(countries.len(), 5);
    }

    #[test]
    fn test_caps_within_global_cap() {
        // One cap per country; together they must not exceed the global cap.
        let mut caps: std::collections::HashMap<&str, usize> = Default::default();
        for spec in &SEARCHES {
            caps.insert(spec.country, spec.country_cap);
        }
        let total: usize = caps.values().sum();
        assert!(total <= GLOBAL_CAP);
    }

    #[test]
    fn test_searches_for_same_country_share_a_cap() {
        let mut caps: std::collections::HashMap<&str, usize> = Default::default();
        for spec in &SEARCHES {
            let cap = caps.entry(spec.country).or_insert(spec.country_cap);
            assert_eq!(*cap, spec.country_cap, "cap mismatch for {}", spec.country);
        }
    }
}
