use crate::models::RawListing;

// Keyword groups scored against the combined title + detail text.
// Order here is the order reasons appear in the output.
const REASON_RULES: &[(&[&str], &str)] = &[
    (
        &["social media", "community manage", "instagram", "tiktok"],
        "Direct social media and community management responsibilities",
    ),
    (
        &["content marketing", "content creation", "content strategy", "copywrit"],
        "Content creation and storytelling focus",
    ),
    (
        &["video", "youtube", "motion design"],
        "Video production or editing involved",
    ),
    (
        &["seo", "search engine optimi"],
        "SEO and organic growth work",
    ),
    (&["brand"], "Brand building and positioning"),
    (
        &["email marketing", "newsletter", "crm", "lifecycle"],
        "Email and lifecycle marketing",
    ),
    (
        &["campaign", "paid media", "google ads", "meta ads"],
        "Campaign and paid media management",
    ),
    (
        &["analytics", "data-driven", "performance marketing"],
        "Performance measurement and analytics",
    ),
    (
        &["communications", "public relations", "press"],
        "Communications and public relations scope",
    ),
];

/// Human-readable "why this matched" strings. The originating search's
/// label always comes first, so the result is never empty.
pub fn build_match_reasons(listing: &RawListing, detail_text: &str) -> Vec<String> {
    let mut reasons = vec![format!("Matches {}", listing.search.label)];
    let haystack = format!("{} {}", listing.title, detail_text).to_lowercase();
    for (keywords, reason) in REASON_RULES {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            let reason = (*reason).to_string();
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
    }
    reasons
}
