use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::models::{RawListing, SearchSpec};

/// Everything before this sentinel is proxy chrome, not listing content.
pub const CONTENT_SENTINEL: &str = "Markdown Content:";

// Each listing renders as a "*   [Title](url)" list item.
const LIST_MARKER: &str = "*   [";
const BLOCK_DELIM: &str = "\n*   [";

const JOB_PATH_SEGMENT: &str = "/jobs/view/";

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\((https?://[^)\s]+)\)").expect("static pattern"));
static COMPANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#+\s*\[([^\]]+)\]\((https?://[^)\s]+)\)").expect("static pattern")
});
static META_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n[ \t]*([^\n]+)").expect("static pattern"));
static POSTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:\d+\s+(?:day|hour|week|month)s?\s+ago|today|yesterday)\b")
        .expect("static pattern")
});

/// The upstream markdown no longer looks like listing output. The caller
/// treats this the same way as an empty page: abandon the search.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("document does not contain the rendered-content sentinel")]
pub struct FormatDrift;

/// Split a rendered document into listing blocks and extract one
/// `RawListing` per well-formed block. Malformed blocks are skipped.
pub fn parse_listings(
    document: &str,
    search: SearchSpec,
) -> Result<Vec<RawListing>, FormatDrift> {
    let Some(idx) = document.find(CONTENT_SENTINEL) else {
        return Err(FormatDrift);
    };
    let content = &document[idx + CONTENT_SENTINEL.len()..];

    let mut listings = Vec::new();
    for (i, part) in content.split(BLOCK_DELIM).enumerate() {
        // The delimiter is consumed by the split; re-attach it so every
        // block after the first still starts with the list marker.
        let block = if i == 0 {
            part.to_string()
        } else {
            format!("{LIST_MARKER}{part}")
        };
        if !block.trim_start().starts_with(LIST_MARKER) {
            continue;
        }
        match parse_block(&block, search) {
            Some(listing) => listings.push(listing),
            None => debug!(block_index = i, "skipping malformed listing block"),
        }
    }
    Ok(listings)
}

fn parse_block(block: &str, search: SearchSpec) -> Option<RawListing> {
    let link = LINK_RE.captures(block)?;
    let title = normalize_ws(&link[1]);
    let listing_url = link[2].to_string();
    // Non-job links (company pages, nav) share the same markdown shape.
    if !listing_url.contains(JOB_PATH_SEGMENT) {
        return None;
    }

    let company_caps = COMPANY_RE.captures(block)?;
    let company = normalize_ws(&company_caps[1]);
    let company_url = Some(company_caps[2].to_string());
    let rest = &block[company_caps.get(0)?.end()..];

    let meta_caps = META_RE.captures(rest)?;
    let meta_tags: Vec<String> = meta_caps[1]
        .split("  ")
        .map(normalize_ws)
        .filter(|tag| !tag.is_empty())
        .collect();

    let location = meta_tags
        .first()
        .cloned()
        .unwrap_or_else(|| search.country.to_string());
    let posted_text = meta_tags
        .iter()
        .skip(1)
        .find(|tag| POSTED_RE.is_match(tag))
        .cloned();
    let inferred_country = infer_country(&location);

    Some(RawListing {
        title,
        company,
        listing_url,
        company_url,
        location,
        posted_text,
        meta_tags,
        inferred_country,
        search,
    })
}

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("netherlands", "Netherlands"),
    ("germany", "Germany"),
    ("belgium", "Belgium"),
    ("france", "France"),
    ("spain", "Spain"),
    ("united kingdom", "United Kingdom"),
    ("ireland", "Ireland"),
    ("portugal", "Portugal"),
    ("denmark", "Denmark"),
    ("sweden", "Sweden"),
    ("austria", "Austria"),
    ("switzerland", "Switzerland"),
    ("italy", "Italy"),
    ("poland", "Poland"),
    ("luxembourg", "Luxembourg"),
];

/// Match the location against known country names; fall back to the text
/// after the last comma. `None` means the caller should substitute the
/// search's configured country.
pub fn infer_country(location: &str) -> Option<String> {
    let lower = location.to_lowercase();
    for (needle, canonical) in COUNTRY_NAMES {
        if lower.contains(needle) {
            return Some((*canonical).to_string());
        }
    }
    location
        .rsplit_once(',')
        .map(|(_, tail)| tail.trim().to_string())
        .filter(|tail| !tail.is_empty())
}

pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
