//! Polite crawler for the recipe site.
//!
//! Category pages (`/rs/s<n>/`) are followed for more links, recipe pages
//! (`/rezepte/<id>`) are extracted and written as one JSON line each. Recipe
//! pages are fetched before any queued category page, and requests are spaced
//! by a fixed delay.

use crate::config::CrawlConfig;
use crate::error::Result;
use crate::extractors::{ChefkochExtractor, Extractor, ParsingContext};
use crate::fetcher::{request_fingerprint, RequestFetcher};
use crate::text::strip_hash_qs;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::time::Duration;
use url::Url;

static CATEGORY_LINK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/rs/s\d+/").unwrap());
static RECIPE_LINK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/rezepte/\d+").unwrap());

/// Plus recipes need a subscription, links to them are skipped
const PAYED_CONTENT_ATTR: &str = "data-vars-payed-content-type";
const PLUS_RECIPE: &str = "plus_recipe";

/// Links found on a category page
#[derive(Debug, Default, PartialEq)]
pub struct Links {
    pub categories: Vec<String>,
    pub recipes: Vec<String>,
}

/// Counts of what a crawl did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages: usize,
    pub recipes: usize,
    pub failed: usize,
}

/// Collect category and recipe links from a page, resolved against `base`
pub fn extract_links(document: &Html, base: &Url) -> Links {
    let mut links = Links::default();
    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut url) = base.join(href) else {
            continue;
        };
        url.set_fragment(None);

        // category pages keep their query, it selects the listing page
        if CATEGORY_LINK_REGEX.is_match(url.as_str()) {
            links.categories.push(url.into());
        } else if RECIPE_LINK_REGEX.is_match(url.as_str()) {
            let plus_recipe = anchor
                .parent()
                .and_then(scraper::ElementRef::wrap)
                .and_then(|parent| parent.value().attr(PAYED_CONTENT_ATTR))
                .is_some_and(|kind| kind == PLUS_RECIPE);
            if !plus_recipe {
                links.recipes.push(strip_hash_qs(url.as_str()).to_string());
            }
        }
    }

    links
}

fn is_allowed(url: &str, allowed_domains: &[String]) -> bool {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) else {
        return false;
    };
    allowed_domains
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: RequestFetcher,
    seen: HashSet<String>,
    categories: VecDeque<(String, usize)>,
    recipes: VecDeque<(String, usize)>,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let fetcher = RequestFetcher::new(
            &config.user_agent,
            Some(Duration::from_secs(config.timeout)),
        )?;
        Ok(Self {
            config,
            fetcher,
            seen: HashSet::new(),
            categories: VecDeque::new(),
            recipes: VecDeque::new(),
        })
    }

    fn enqueue(&mut self, url: String, depth: usize, recipe: bool) {
        if depth > self.config.depth_limit {
            return;
        }
        if !is_allowed(&url, &self.config.allowed_domains) {
            debug!("Ignoring offsite link {}", url);
            return;
        }
        if !self.seen.insert(url.clone()) {
            return;
        }
        if recipe {
            self.recipes.push_back((url, depth));
        } else {
            self.categories.push_back((url, depth));
        }
    }

    fn next_request(&mut self) -> Option<(String, usize, bool)> {
        if let Some((url, depth)) = self.recipes.pop_front() {
            return Some((url, depth, true));
        }
        self.categories
            .pop_front()
            .map(|(url, depth)| (url, depth, false))
    }

    /// Crawl from the configured start page, writing each recipe to `out` as a JSON line
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();
        let delay = Duration::from_millis(self.config.download_delay_ms);
        let start_url = Url::parse(&self.config.start_url)?;
        self.enqueue(start_url.to_string(), 0, false);

        while let Some((url, depth, is_recipe)) = self.next_request() {
            if self
                .config
                .max_recipes
                .is_some_and(|max| summary.recipes >= max)
            {
                break;
            }
            if summary.pages > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            debug!("Fetching {} (depth {})", url, depth);
            summary.pages += 1;
            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(err) => {
                    warn!("Failed to fetch {}: {}", url, err);
                    summary.failed += 1;
                    continue;
                }
            };

            let page_url = Url::parse(&url)?;
            let context = ParsingContext::new(url.as_str(), &html);
            if is_recipe {
                match ChefkochExtractor.parse(&context) {
                    Ok(mut record) => {
                        record.url_fingerprint = Some(request_fingerprint(&page_url));
                        serde_json::to_writer(&mut *out, &record)
                            .map_err(std::io::Error::from)?;
                        out.write_all(b"\n")?;
                        summary.recipes += 1;
                    }
                    Err(err) => {
                        warn!("Failed to extract {}: {}", url, err);
                        summary.failed += 1;
                    }
                }
                continue;
            }

            let links = extract_links(&context.document, &page_url);
            debug!(
                "{}: {} category links, {} recipe links",
                url,
                links.categories.len(),
                links.recipes.len()
            );
            for link in links.categories {
                self.enqueue(link, depth + 1, false);
            }
            for link in links.recipes {
                self.enqueue(link, depth + 1, true);
            }
        }

        out.flush()?;
        info!(
            "Crawled {} pages, wrote {} recipes ({} failed)",
            summary.pages, summary.recipes, summary.failed
        );
        Ok(summary)
    }
}
