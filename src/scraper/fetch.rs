//! 직접 요청 / 모바일 요청 전략
//!
//! 두 전략 모두 GET 한 번으로 본문을 받아 필드 추출기에 넘깁니다.
//! 본문이 최소 길이를 넘지 못하면 차단/에러 페이지로 보고 추출하지 않습니다.

use url::Url;

use super::transport::page_headers;
use super::ProductScraper;
use crate::product::{ProductInfo, ScrapeError};

impl ProductScraper {
    /// 방법 1: 원본 URL로 직접 요청
    pub async fn fetch_direct(&self, url: &str) -> Result<ProductInfo, ScrapeError> {
        self.fetch_and_parse("direct", url, url).await
    }

    /// 방법 2: 모바일 호스트로 바꿔서 요청
    pub async fn fetch_mobile(&self, url: &str) -> Result<ProductInfo, ScrapeError> {
        let mobile = self.mobile_url(url)?;
        self.fetch_and_parse("mobile", &mobile, url).await
    }

    /// 호스트를 모바일 서브도메인으로 교체 (이미 모바일이면 그대로)
    pub fn mobile_url(&self, url: &str) -> Result<String, ScrapeError> {
        let mut parsed = Url::parse(url)?;
        let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();

        if host != self.site.mobile_host {
            parsed.set_host(Some(&self.site.mobile_host))?;
        }

        Ok(parsed.to_string())
    }

    async fn fetch_and_parse(
        &self,
        label: &str,
        request_url: &str,
        original_url: &str,
    ) -> Result<ProductInfo, ScrapeError> {
        let html = self
            .transport
            .get_text(request_url, &page_headers())
            .await?;

        let chars = html.chars().count();
        tracing::info!("[{}] HTML 수신: {}자", label, chars);

        if chars <= self.site.min_body_chars {
            return Err(ScrapeError::BlockedPage { chars });
        }

        Ok(self.extractor.parse_product_html(&html, original_url))
    }
}
