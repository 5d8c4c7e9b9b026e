//! 상품 스크래퍼 모듈 - 다단계 폴백 오케스트레이터
//!
//! URL 하나를 받아 세 가지 전략을 고정 순서로 시도합니다.
//! 1. 직접 요청 (`fetch.rs`)
//! 2. 모바일 호스트 요청 (`fetch.rs`)
//! 3. URL 추론 (`infer.rs`, 이미지는 `image.rs`)
//!
//! 이름을 얻은 첫 전략의 결과를 그대로 반환하며, 이후 전략은 실행하지 않습니다.
//! 어떤 실패도 호출자에게 에러로 전파되지 않습니다.

mod config;
mod fetch;
mod image;
mod infer;
mod transport;

use std::sync::Arc;

use url::Url;

use crate::extractor::HtmlExtractor;
use crate::product::{ProductInfo, ScrapeError};

pub use config::{SiteConfig, DEFAULT_MIN_BODY_CHARS, DEFAULT_PROBE_TIMEOUT};
pub use image::image_candidates;
pub use infer::{parse_product_key, ProductKey, SALE_PREFIX, SALE_PRICE_LABEL};
pub use transport::{page_headers, probe_headers, Headers, HttpTransport, ReqwestTransport};

// ============================================================================
// Strategy State Machine
// ============================================================================

/// 데이터 획득 방법
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Mobile,
    Inference,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::Mobile => "mobile",
            Strategy::Inference => "infer",
        }
    }
}

/// 오케스트레이터 진행 상태 (각 전략은 최대 한 번)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    NotStarted,
    TryingDirect,
    TryingMobile,
    TryingInference,
    Done,
}

impl FetchStage {
    /// 다음 상태
    pub fn next(self) -> Self {
        match self {
            FetchStage::NotStarted => FetchStage::TryingDirect,
            FetchStage::TryingDirect => FetchStage::TryingMobile,
            FetchStage::TryingMobile => FetchStage::TryingInference,
            FetchStage::TryingInference | FetchStage::Done => FetchStage::Done,
        }
    }

    /// 이 상태에서 실행할 전략
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            FetchStage::TryingDirect => Some(Strategy::Direct),
            FetchStage::TryingMobile => Some(Strategy::Mobile),
            FetchStage::TryingInference => Some(Strategy::Inference),
            FetchStage::NotStarted | FetchStage::Done => None,
        }
    }
}

// ============================================================================
// Product Scraper
// ============================================================================

/// 상품 정보 스크래퍼
///
/// 호출 간 공유되는 가변 상태가 없으므로 여러 URL을 동시에 처리해도 됩니다.
pub struct ProductScraper {
    transport: Arc<dyn HttpTransport>,
    extractor: HtmlExtractor,
    site: SiteConfig,
}

impl ProductScraper {
    /// reqwest 전송 + 기본 사이트 설정으로 생성
    pub fn new() -> Result<Self, ScrapeError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// 전송 구현을 지정하여 생성
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_config(transport, SiteConfig::default())
    }

    /// 전송 구현 + 사이트 설정 지정
    pub fn with_config(transport: Arc<dyn HttpTransport>, site: SiteConfig) -> Self {
        let extractor = HtmlExtractor::new(&site);
        Self {
            transport,
            extractor,
            site,
        }
    }

    /// 사이트 설정
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// URL에서 상품 정보 추출 (항상 값을 반환)
    pub async fn fetch_product_info(&self, url: &str) -> ProductInfo {
        if let Err(e) = self.check_domain(url) {
            tracing::warn!("대상 사이트 URL이 아님: {} ({})", url, e);
            return ProductInfo::empty(url);
        }

        let mut stage = FetchStage::NotStarted.next();
        while let Some(strategy) = stage.strategy() {
            tracing::info!("[{}] 시도: {}", strategy.label(), url);

            match self.run_strategy(strategy, url).await {
                Ok(info) if info.has_name() => return info,
                Ok(_) => tracing::info!("[{}] 상품명 없음", strategy.label()),
                Err(e) => tracing::warn!("[{}] 실패: {}", strategy.label(), e),
            }

            stage = stage.next();
        }

        tracing::warn!("모든 방법으로 상품 정보 취득 실패: {}", url);
        ProductInfo::empty(url)
    }

    /// 여러 URL을 독립 호출로 동시에 처리 (결과는 입력 순서)
    pub async fn fetch_many(&self, urls: &[String]) -> Vec<ProductInfo> {
        futures::future::join_all(urls.iter().map(|url| self.fetch_product_info(url))).await
    }

    async fn run_strategy(&self, strategy: Strategy, url: &str) -> Result<ProductInfo, ScrapeError> {
        match strategy {
            Strategy::Direct => self.fetch_direct(url).await,
            Strategy::Mobile => self.fetch_mobile(url).await,
            Strategy::Inference => self.infer_from_url(url).await,
        }
    }

    fn check_domain(&self, url: &str) -> Result<(), ScrapeError> {
        let parsed = Url::parse(url)?;
        let host = parsed.host_str().unwrap_or_default();
        if self.site.matches_host(host) {
            Ok(())
        } else {
            Err(ScrapeError::OutOfDomain(host.to_string()))
        }
    }
}

/// 기본 설정으로 URL 하나를 처리하는 단축 함수
pub async fn fetch_product_info(url: &str) -> ProductInfo {
    match ProductScraper::new() {
        Ok(scraper) => scraper.fetch_product_info(url).await,
        Err(e) => {
            tracing::error!("ProductScraper 생성 실패: {}", e);
            ProductInfo::empty(url)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
