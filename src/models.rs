use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct SearchSpec {
    pub country: &'static str,
    pub location: &'static str,
    pub keywords: &'static str,
    pub label: &'static str,
    /// Stop harvesting for this country once it holds this many records.
    pub country_cap: usize,
}

/// One parsed listing block, before filtering. Never persisted.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub title: String,
    pub company: String,
    pub listing_url: String,
    pub company_url: Option<String>,
    pub location: String,
    pub posted_text: Option<String>,
    pub meta_tags: Vec<String>,
    pub inferred_country: Option<String>,
    pub search: SearchSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisaStatus {
    SponsorshipMentioned,
    SponsorshipDenied,
    NotMentioned,
}

/// Outcome of scanning a job's detail page for sponsorship language.
#[derive(Debug, Clone)]
pub struct VisaFinding {
    pub status: VisaStatus,
    pub evidence: Option<String>,
    pub detail_text: String,
}

impl VisaFinding {
    // Substituted when the detail fetch fails; the run keeps going.
    pub fn unavailable() -> Self {
        Self {
            status: VisaStatus::NotMentioned,
            evidence: None,
            detail_text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisaInfo {
    pub status: VisaStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Canonical listing URL; the global dedup key. Equals `apply_url`.
    pub id: String,
    pub title: String,
    pub company: String,
    pub apply_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    pub location: String,
    pub country: String,
    pub posted_label: String,
    pub meta_tags: Vec<String>,
    pub match_reasons: Vec<String>,
    pub visa: VisaInfo,
    pub search_label: String,
    pub search_keywords: String,
    pub source_name: String,
    pub fetched_timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsDataset {
    pub generated_at: String,
    pub total: usize,
    pub jobs: Vec<JobRecord>,
}

impl JobsDataset {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            total: jobs.len(),
            jobs,
        }
    }
}

/// Strip query and fragment, keeping scheme/host/path intact.
pub fn canonical_url(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_url_strips_query() {
        assert_eq!(
            canonical_url("https://www.linkedin.com/jobs/view/123?refId=abc"),
            "https://www.linkedin.com/jobs/view/123"
        );
    }

    #[test]
    fn test_canonical_url_strips_query_and_fragment() {
        assert_eq!(
            canonical_url("https://example.com/job?id=123#section"),
            "https://example.com/job"
        );
        assert_eq!(
            canonical_url("https://example.com/job#section"),
            "https://example.com/job"
        );
    }

    #[test]
    fn test_canonical_url_leaves_clean_urls_alone() {
        assert_eq!(
            canonical_url("https://www.linkedin.com/jobs/view/123"),
            "https://www.linkedin.com/jobs/view/123"
        );
    }

    #[test]
    fn test_visa_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&VisaStatus::SponsorshipMentioned).unwrap(),
            "\"sponsorship-mentioned\""
        );
        assert_eq!(
            serde_json::to_string(&VisaStatus::SponsorshipDenied).unwrap(),
            "\"sponsorship-denied\""
        );
        assert_eq!(
            serde_json::to_string(&VisaStatus::NotMentioned).unwrap(),
            "\"not-mentioned\""
        );
    }

    #[test]
    fn test_job_record_serializes_camel_case() {
        let record = JobRecord {
            id: "https://www.linkedin.com/jobs/view/1".to_string(),
            title: "Marketing Manager".to_string(),
            company: "Acme".to_string(),
            apply_url: "https://www.linkedin.com/jobs/view/1".to_string(),
            company_url: None,
            location: "Amsterdam, Netherlands".to_string(),
            country: "Netherlands".to_string(),
            posted_label: "3 days ago".to_string(),
            meta_tags: vec!["Amsterdam, Netherlands".to_string()],
            match_reasons: vec!["Matches Marketing roles in Amsterdam".to_string()],
            visa: VisaInfo {
                status: VisaStatus::NotMentioned,
                evidence: None,
            },
            search_label: "Marketing roles in Amsterdam".to_string(),
            search_keywords: "marketing".to_string(),
            source_name: "linkedin".to_string(),
            fetched_timestamp: "2025-01-01T00:00:00+00:00".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("applyUrl").is_some());
        assert!(value.get("postedLabel").is_some());
        assert!(value.get("matchReasons").is_some());
        assert!(value.get("fetchedTimestamp").is_some());
        // Absent optional fields are omitted, not null
        assert!(value.get("companyUrl").is_none());
        assert!(value["visa"].get("evidence").is_none());
        assert_eq!(value["visa"]["status"], "not-mentioned");
    }

    #[test]
    fn test_dataset_total_matches_jobs_len() {
        let dataset = JobsDataset::new(vec![]);
        assert_eq!(dataset.total, 0);
        let value = serde_json::to_value(&dataset).unwrap();
        assert!(value.get("generatedAt").is_some());
        assert!(value.get("jobs").is_some());
    }
}
