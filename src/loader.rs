//! Record set loading: local cache first, remote feed as fallback.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::fetch::{HttpClient, fetch_bytes};
use crate::models::FeatureCollection;

/// USGS FDSN event query endpoint, GeoJSON flavour.
pub const FEED_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query.geojson";

/// Default cache location, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "earthquake_data.json";

/// Most events the feed returns for one query. Larger result sets are cut off.
pub const FEED_PAGE_LIMIT: usize = 20_000;

/// Parameters of the event query. `Default` is the fixed UK window.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub start_time: String,
    pub end_time: String,
    pub min_latitude: String,
    pub max_latitude: String,
    pub min_longitude: String,
    pub max_longitude: String,
    pub min_magnitude: String,
    pub order_by: String,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            start_time: "2000-01-01".to_string(),
            end_time: "2018-10-11".to_string(),
            min_latitude: "50.008".to_string(),
            max_latitude: "58.723".to_string(),
            min_longitude: "-9.756".to_string(),
            max_longitude: "1.67".to_string(),
            min_magnitude: "1".to_string(),
            order_by: "time-asc".to_string(),
        }
    }
}

impl FeedQuery {
    /// Query string pairs in the order they are sent.
    pub fn query_pairs(&self) -> [(&'static str, &str); 8] {
        [
            ("starttime", self.start_time.as_str()),
            ("endtime", self.end_time.as_str()),
            ("minlatitude", self.min_latitude.as_str()),
            ("maxlatitude", self.max_latitude.as_str()),
            ("minlongitude", self.min_longitude.as_str()),
            ("maxlongitude", self.max_longitude.as_str()),
            ("minmagnitude", self.min_magnitude.as_str()),
            ("orderby", self.order_by.as_str()),
        ]
    }

    /// Full request URL against `base`.
    pub fn url(&self, base: &str) -> Result<Url> {
        Url::parse_with_params(base, self.query_pairs())
            .with_context(|| format!("Invalid feed URL '{base}'"))
    }
}

/// Anything that can produce a raw feed response body.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<u8>>;
}

/// [`FeedSource`] backed by an HTTP client against a base URL.
pub struct RemoteFeed<C> {
    pub client: C,
    pub base_url: String,
}

impl<C> RemoteFeed<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            base_url: FEED_URL.to_string(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> FeedSource for RemoteFeed<C> {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<u8>> {
        let url = query.url(&self.base_url)?;
        fetch_bytes(&self.client, url).await
    }
}

/// Knobs controlling where data comes from and whether it is kept.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub cache_path: PathBuf,
    pub prefer_local: bool,
    pub save_to_cache: bool,
    pub query: FeedQuery,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            prefer_local: true,
            save_to_cache: false,
            query: FeedQuery::default(),
        }
    }
}

pub struct Loader<S> {
    source: S,
    options: LoaderOptions,
}

impl<S: FeedSource> Loader<S> {
    pub fn new(source: S, options: LoaderOptions) -> Self {
        Self { source, options }
    }

    /// Returns the record set, reading the cache when allowed and falling
    /// back to a single remote query otherwise.
    ///
    /// # Errors
    ///
    /// Fetch and decode failures of the remote query propagate. Cache misses
    /// and failed cache writes do not.
    #[tracing::instrument(
        skip(self),
        fields(
            cache = %self.options.cache_path.display(),
            prefer_local = self.options.prefer_local
        )
    )]
    pub async fn load(&self) -> Result<FeatureCollection> {
        if self.options.prefer_local {
            match read_cache(&self.options.cache_path) {
                Ok(collection) => {
                    info!(events = collection.len(), "Loaded data from local cache");
                    return Ok(collection);
                }
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "Local cache unavailable, fetching from feed");
                }
            }
        }

        info!("Fetching data from feed");
        let bytes = self.source.fetch(&self.options.query).await?;
        debug!(bytes = bytes.len(), "Feed body received, decoding");
        let collection = decode_collection(&bytes)?;
        match check_single_page(&collection) {
            Some(Truncation::BelowReported { reported, received }) => {
                warn!(reported, received, "Feed response is truncated; results are incomplete");
            }
            Some(Truncation::AtPageLimit { received }) => {
                warn!(
                    received,
                    limit = FEED_PAGE_LIMIT,
                    "Feed response reached the per-query limit; results may be incomplete"
                );
            }
            None => {}
        }

        if self.options.save_to_cache {
            match write_cache(&self.options.cache_path, &collection) {
                Ok(()) => info!(path = %self.options.cache_path.display(), "Data saved to cache"),
                Err(e) => warn!(error = %format!("{e:#}"), "Failed to save data to cache"),
            }
        }

        Ok(collection)
    }
}

/// Decodes a feed response body.
pub fn decode_collection(bytes: &[u8]) -> Result<FeatureCollection> {
    serde_json::from_slice(bytes).context("Feed response is not a valid event collection")
}

/// Reads a previously saved collection.
pub fn read_cache(path: &Path) -> Result<FeatureCollection> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot decode {}", path.display()))
}

/// Writes `collection` pretty-printed to `path`, replacing any existing file.
pub fn write_cache(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, collection)?;
    writer.flush()?;
    Ok(())
}

/// Why a single-page response cannot be the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// The server reported more matching events than it sent.
    BelowReported { reported: u64, received: usize },
    /// The response hit the per-query cap, so more events may exist.
    AtPageLimit { received: usize },
}

/// The feed is queried without paging, so a result that hit the server cap or
/// is smaller than the reported total is incomplete.
pub fn check_single_page(collection: &FeatureCollection) -> Option<Truncation> {
    let received = collection.len();
    if let Some(reported) = collection.reported_count() {
        if reported > received as u64 {
            return Some(Truncation::BelowReported { reported, received });
        }
    }
    (received >= FEED_PAGE_LIMIT).then_some(Truncation::AtPageLimit { received })
}
