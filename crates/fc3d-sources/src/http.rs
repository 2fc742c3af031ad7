//! Shared HTTP plumbing and the adapter registry.

use std::time::Duration;

use tracing::debug;

use crate::cwl::CwlAdapter;
use crate::data17500::Data17500Adapter;
use crate::five_hundred::FiveHundredAdapter;
use crate::zhcw::ZhcwAdapter;
use crate::{SourceAdapter, SourceError, SourceKind};

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 fc3d/",
    env!("CARGO_PKG_VERSION")
);

const MIN_PAGE_TIMEOUT: Duration = Duration::from_secs(1);

/// Settings shared by every HTTP adapter.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Per-request timeout applied by the client.
    pub request_timeout: Duration,
    /// Pause between page requests for paginated sources.
    pub page_delay: Duration,
    /// Pages requested from paginated sources.
    pub max_pages: u32,
    /// Rows requested per page, or per request for unpaginated sources.
    pub page_size: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            page_delay: Duration::from_millis(500),
            max_pages: 2,
            page_size: 30,
        }
    }
}

impl HttpSettings {
    /// Per-request timeout for a paginated source, sized so every page and
    /// the pauses between them fit in `request_timeout`, which is also the
    /// whole-source budget. Never below one second.
    pub fn page_timeout(&self) -> Duration {
        let pages = self.max_pages.max(1);
        let pauses = self.page_delay.saturating_mul(pages - 1);
        (self.request_timeout.saturating_sub(pauses) / pages).max(MIN_PAGE_TIMEOUT)
    }
}

/// Build the client every adapter shares.
pub fn build_client(settings: &HttpSettings) -> Result<reqwest::Client, SourceError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(settings.request_timeout)
        .build()?;
    Ok(client)
}

/// GET `url` and return the body as text.
///
/// Bodies are decoded lossily: several sites serve GB2312 pages whose
/// relevant content (periods, digits, dates) is plain ASCII.
pub async fn get_text(
    client: &reqwest::Client,
    url: &str,
    referer: Option<&str>,
) -> Result<String, SourceError> {
    send_text(request(client, url, referer)).await
}

/// A GET request with the optional `Referer` header set.
pub fn request(client: &reqwest::Client, url: &str, referer: Option<&str>) -> reqwest::RequestBuilder {
    debug!(url, "GET");
    let req = client.get(url);
    match referer {
        Some(referer) => req.header(reqwest::header::REFERER, referer),
        None => req,
    }
}

/// Send `req` and return the body as text, failing on a non-success status.
pub async fn send_text(req: reqwest::RequestBuilder) -> Result<String, SourceError> {
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
        });
    }
    let bytes = resp.bytes().await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Build the adapters for `kinds`, preserving their order.
pub fn build_adapters(
    kinds: &[SourceKind],
    settings: &HttpSettings,
) -> Result<Vec<Box<dyn SourceAdapter>>, SourceError> {
    let client = build_client(settings)?;
    let adapters = kinds
        .iter()
        .map(|kind| -> Box<dyn SourceAdapter> {
            match kind {
                SourceKind::Cwl => Box::new(CwlAdapter::new(client.clone(), settings.page_size)),
                SourceKind::Zhcw => Box::new(ZhcwAdapter::new(client.clone(), settings)),
                SourceKind::FiveHundred => {
                    Box::new(FiveHundredAdapter::new(client.clone(), settings.page_size))
                }
                SourceKind::Data17500 => {
                    Box::new(Data17500Adapter::new(client.clone(), settings.page_size))
                }
            }
        })
        .collect();
    Ok(adapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_share_the_source_budget() {
        let settings = HttpSettings::default();
        // 10 s minus one 500 ms pause, split over two pages.
        assert_eq!(settings.page_timeout(), Duration::from_millis(4750));
        let total = settings.page_timeout() * settings.max_pages
            + settings.page_delay * (settings.max_pages - 1);
        assert!(total <= settings.request_timeout);
    }

    #[test]
    fn page_timeout_single_page_and_floor() {
        let single = HttpSettings {
            max_pages: 1,
            ..HttpSettings::default()
        };
        assert_eq!(single.page_timeout(), single.request_timeout);

        let tight = HttpSettings {
            request_timeout: Duration::from_secs(2),
            max_pages: 5,
            ..HttpSettings::default()
        };
        assert_eq!(tight.page_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn registry_preserves_order() {
        let kinds = [SourceKind::Data17500, SourceKind::Cwl, SourceKind::FiveHundred];
        let adapters = build_adapters(&kinds, &HttpSettings::default()).unwrap();
        let names: Vec<_> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(names, ["17500", "cwl", "500"]);
    }

    #[test]
    fn registry_default_precedence() {
        let adapters =
            build_adapters(&SourceKind::DEFAULT_PRECEDENCE, &HttpSettings::default()).unwrap();
        let names: Vec<_> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(names, ["cwl", "zhcw", "500", "17500"]);
    }
}
