use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config;
use crate::fetch::{Fetcher, Throttle, proxied};
use crate::models::{JobRecord, SearchSpec, VisaFinding, VisaInfo, canonical_url};
use crate::parse::parse_listings;
use crate::reasons::build_match_reasons;
use crate::rules;
use crate::store::ResultStore;
use crate::visa::detect_visa;

#[derive(Debug, Default)]
pub struct HarvestStats {
    pub pages_fetched: usize,
    pub listings_seen: usize,
    pub added: usize,
    pub skipped_remote: usize,
    pub skipped_irrelevant: usize,
    pub skipped_blocked: usize,
    pub skipped_duplicates: usize,
    pub skipped_wrong_country: usize,
    pub visa_failures: usize,
}

pub struct Harvester<'a> {
    fetcher: Fetcher<'a>,
    throttle: Throttle,
}

impl<'a> Harvester<'a> {
    pub fn new(fetcher: Fetcher<'a>, throttle: Throttle) -> Self {
        Self { fetcher, throttle }
    }

    /// Run every search in configured order against a shared store.
    /// Per-search failures are contained; the run itself never fails.
    pub fn run(&self, searches: &[SearchSpec], store: &mut ResultStore) -> HarvestStats {
        let mut stats = HarvestStats::default();
        let mut first = true;
        for spec in searches {
            // Earlier searches can saturate a country's quota.
            if store.count_by_country(spec.country) >= spec.country_cap {
                info!(
                    country = spec.country,
                    label = spec.label,
                    "country cap already met, skipping search"
                );
                continue;
            }
            if !first {
                self.throttle.pause(config::SEARCH_DELAY);
            }
            first = false;
            self.run_search(*spec, store, &mut stats);
        }
        stats
    }

    fn run_search(&self, spec: SearchSpec, store: &mut ResultStore, stats: &mut HarvestStats) {
        info!(label = spec.label, country = spec.country, "starting search");
        let mut offset = 0;
        while offset <= config::MAX_OFFSET {
            if offset > 0 {
                self.throttle.pause(config::PAGE_DELAY);
            }

            let url = proxied(&build_search_url(spec, offset));
            let document = match self.fetcher.fetch_rendered_text(&url) {
                Ok(document) => document,
                Err(e) => {
                    warn!(
                        label = spec.label,
                        offset,
                        error = %e,
                        "search page fetch failed, abandoning search"
                    );
                    return;
                }
            };
            stats.pages_fetched += 1;

            let listings = match parse_listings(&document, spec) {
                Ok(listings) => listings,
                Err(e) => {
                    warn!(
                        label = spec.label,
                        offset,
                        error = %e,
                        "page format drifted, abandoning search"
                    );
                    return;
                }
            };
            if listings.is_empty() {
                debug!(label = spec.label, offset, "no listings parsed, end of results");
                return;
            }

            for listing in listings {
                stats.listings_seen += 1;

                // Fixed short-circuit filter order; first matching skip wins.
                if listing.title.to_lowercase().contains("remote") {
                    stats.skipped_remote += 1;
                    debug!(title = %listing.title, "skip: remote in title");
                    continue;
                }
                if rules::is_remote(&listing.meta_tags, &listing.location) {
                    stats.skipped_remote += 1;
                    debug!(title = %listing.title, "skip: remote per meta/location");
                    continue;
                }
                if !rules::is_relevant_title(&listing.title) {
                    stats.skipped_irrelevant += 1;
                    debug!(title = %listing.title, "skip: irrelevant title");
                    continue;
                }
                let company_lower = listing.company.to_lowercase();
                if config::BLOCKED_COMPANIES
                    .iter()
                    .any(|blocked| company_lower.contains(blocked))
                {
                    stats.skipped_blocked += 1;
                    debug!(company = %listing.company, "skip: blocklisted company");
                    continue;
                }
                let id = canonical_url(&listing.listing_url);
                if store.contains(&id) {
                    stats.skipped_duplicates += 1;
                    debug!(%id, "skip: duplicate listing");
                    continue;
                }
                let country = listing
                    .inferred_country
                    .clone()
                    .unwrap_or_else(|| spec.country.to_string());
                if !rules::country_matches(&country, spec.country) {
                    stats.skipped_wrong_country += 1;
                    debug!(title = %listing.title, %country, "skip: wrong country");
                    continue;
                }
                if store.len() >= config::GLOBAL_CAP {
                    info!("global result cap reached, stopping page");
                    break;
                }

                self.throttle.pause(config::DETAIL_DELAY);
                let visa = match detect_visa(&self.fetcher, &listing.listing_url) {
                    Ok(finding) => finding,
                    Err(e) => {
                        stats.visa_failures += 1;
                        warn!(url = %listing.listing_url, error = %e, "visa detail fetch failed");
                        VisaFinding::unavailable()
                    }
                };

                let match_reasons = build_match_reasons(&listing, &visa.detail_text);
                let record = JobRecord {
                    id: id.clone(),
                    title: listing.title,
                    company: listing.company,
                    apply_url: id,
                    company_url: listing.company_url,
                    location: listing.location,
                    country,
                    posted_label: listing
                        .posted_text
                        .unwrap_or_else(|| "Recently posted".to_string()),
                    meta_tags: listing.meta_tags,
                    match_reasons,
                    visa: VisaInfo {
                        status: visa.status,
                        evidence: visa.evidence,
                    },
                    search_label: spec.label.to_string(),
                    search_keywords: spec.keywords.to_string(),
                    source_name: config::SOURCE_NAME.to_string(),
                    fetched_timestamp: Utc::now().to_rfc3339(),
                };
                if store.insert_if_absent(record) {
                    stats.added += 1;
                }

                if store.count_by_country(spec.country) >= spec.country_cap {
                    info!(
                        country = spec.country,
                        cap = spec.country_cap,
                        "country cap reached, ending search"
                    );
                    return;
                }
            }

            offset += config::PAGE_SIZE;
        }
    }
}

pub(crate) fn build_search_url(spec: SearchSpec, offset: usize) -> String {
    format!(
        "https://www.linkedin.com/jobs/search/?keywords={}&location={}&f_TPR=r604800&f_WT=1&start={}",
        urlencoding::encode(spec.keywords),
        urlencoding::encode(spec.location),
        offset
    )
}
