use regex::Regex;

use crate::fetch::{FetchError, Fetcher, proxied};
use crate::models::{VisaFinding, VisaStatus};
use crate::parse::normalize_ws;

// Checked in this fixed order; the first group with any match wins,
// regardless of where its phrase sits in the text.
const POSITIVE_PHRASES: &[&str] = &[
    "visa sponsorship",
    "sponsor your visa",
    "work permit support",
    "sponsorship available",
    "visa support",
];

const NEGATIVE_PHRASES: &[&str] = &[
    "no visa sponsorship",
    "without sponsorship",
    "no sponsorship",
    "unable to sponsor",
    "cannot sponsor",
    "must have work permit",
];

// Bare mentions with no clear qualifier; evidence is still captured.
const NEUTRAL_PHRASES: &[&str] = &["work permit", "right to work"];

const EVIDENCE_BEFORE: usize = 160;
const EVIDENCE_AFTER: usize = 200;

pub(crate) fn classify(body: &str) -> Option<(VisaStatus, &'static str)> {
    let lower = body.to_lowercase();
    for phrase in POSITIVE_PHRASES {
        if lower.contains(phrase) {
            return Some((VisaStatus::SponsorshipMentioned, phrase));
        }
    }
    for phrase in NEGATIVE_PHRASES {
        if lower.contains(phrase) {
            return Some((VisaStatus::SponsorshipDenied, phrase));
        }
    }
    for phrase in NEUTRAL_PHRASES {
        if lower.contains(phrase) {
            return Some((VisaStatus::NotMentioned, phrase));
        }
    }
    None
}

/// Bounded window around the first occurrence of `phrase` in the
/// whitespace-normalized body, for human audit of the classification.
pub(crate) fn extract_evidence(body: &str, phrase: &str) -> Option<String> {
    let norm = normalize_ws(body);
    let re = Regex::new(&format!("(?i){}", regex::escape(phrase))).ok()?;
    let found = re.find(&norm)?;

    let mut start = found.start().saturating_sub(EVIDENCE_BEFORE);
    while !norm.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (found.end() + EVIDENCE_AFTER).min(norm.len());
    while !norm.is_char_boundary(end) {
        end += 1;
    }
    Some(norm[start..end].trim().to_string())
}

/// Fetch a job's detail page and scan it for sponsorship language.
/// Fetch failures propagate; the orchestrator degrades them to
/// `NotMentioned` rather than aborting the run.
pub fn detect_visa(fetcher: &Fetcher<'_>, job_url: &str) -> Result<VisaFinding, FetchError> {
    let body = fetcher.fetch_rendered_text(&proxied(job_url))?;
    let finding = match classify(&body) {
        Some((status, phrase)) => VisaFinding {
            status,
            evidence: extract_evidence(&body, phrase),
            detail_text: body,
        },
        None => VisaFinding {
            status: VisaStatus::NotMentioned,
            evidence: None,
            detail_text: body,
        },
    };
    Ok(finding)
}
