//! HTTP 전송 계층
//!
//! 전략과 이미지 검증기는 `HttpTransport` 트레이트만 보고 동작합니다.
//! 실제 구현은 `ReqwestTransport`이며, 테스트에서는 요청을 기록하는
//! 목(mock) 전송을 끼워 넣습니다.

use std::time::Duration;

use async_trait::async_trait;

use crate::product::ScrapeError;

/// 요청 헤더 목록
pub type Headers = Vec<(&'static str, String)>;

/// 모바일 Safari User-Agent
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

/// 전송 클라이언트 기본 타임아웃 (전략 자체에는 별도 타임아웃 없음)
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// HttpTransport Trait
// ============================================================================

/// 페이지 GET / 이미지 HEAD 인터페이스
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET 요청 후 본문을 문자열로 반환
    async fn get_text(&self, url: &str, headers: &Headers) -> Result<String, ScrapeError>;

    /// HEAD 요청 후 상태 코드를 반환 (`timeout` 안에 응답이 없으면 에러)
    async fn head_status(
        &self,
        url: &str,
        headers: &Headers,
        timeout: Duration,
    ) -> Result<u16, ScrapeError>;
}

// ============================================================================
// Header Sets
// ============================================================================

/// 상품 페이지 GET용 헤더 (일반 모바일 브라우저의 탐색 요청처럼 보이도록)
pub fn page_headers() -> Headers {
    vec![
        ("User-Agent", MOBILE_USER_AGENT.to_string()),
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        ),
        ("Accept-Language", "ja-JP,ja;q=0.9,en;q=0.8".to_string()),
        ("Sec-Fetch-Site", "same-origin".to_string()),
        ("Sec-Fetch-Mode", "navigate".to_string()),
        ("Sec-Fetch-Dest", "document".to_string()),
        ("Sec-Fetch-User", "?1".to_string()),
    ]
}

/// 이미지 HEAD 프로브용 헤더
pub fn probe_headers(referer: &str) -> Headers {
    vec![
        ("User-Agent", MOBILE_USER_AGENT.to_string()),
        (
            "Accept",
            "image/webp,image/apng,image/jpeg,image/png,image/*,*/*;q=0.8".to_string(),
        ),
        ("Referer", referer.to_string()),
        ("Sec-Fetch-Site", "same-origin".to_string()),
        ("Cache-Control", "no-cache".to_string()),
    ]
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// reqwest 기반 전송 구현
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// 새 전송 생성
    pub fn new() -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder().timeout(CLIENT_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new().unwrap_or_else(|e| {
            tracing::error!("ReqwestTransport 생성 실패: {}", e);
            // 최소한의 클라이언트로 폴백
            Self {
                client: reqwest::Client::new(),
            }
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_text(&self, url: &str, headers: &Headers) -> Result<String, ScrapeError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await?;
        tracing::debug!("GET {} -> {}", url, response.status());

        Ok(response.text().await?)
    }

    async fn head_status(
        &self,
        url: &str,
        headers: &Headers,
        timeout: Duration,
    ) -> Result<u16, ScrapeError> {
        let mut request = self.client.head(url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await?;
        Ok(response.status().as_u16())
    }
}

// ============================================================================
// Mock Transport (tests)
// ============================================================================

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    /// 기록된 요청
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Get(String),
        Head(String),
    }

    /// 요청 한 건의 기록 (헤더, HEAD 타임아웃 포함)
    #[derive(Debug, Clone)]
    pub(crate) struct Recorded {
        pub(crate) call: Call,
        pub(crate) headers: Headers,
        pub(crate) timeout: Option<Duration>,
    }

    impl Recorded {
        pub(crate) fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
        }
    }

    /// 등록된 페이지/이미지에만 응답하는 전송
    #[derive(Debug, Default)]
    pub(crate) struct MockTransport {
        pages: HashMap<String, String>,
        live_images: HashSet<String>,
        failing_images: HashSet<String>,
        requests: Mutex<Vec<Recorded>>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }

        pub(crate) fn with_image(mut self, url: &str) -> Self {
            self.live_images.insert(url.to_string());
            self
        }

        /// HEAD 요청이 전송 에러(타임아웃 등)로 끝나는 이미지
        pub(crate) fn with_failing_image(mut self, url: &str) -> Self {
            self.failing_images.insert(url.to_string());
            self
        }

        pub(crate) fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        pub(crate) fn calls(&self) -> Vec<Call> {
            self.requests().into_iter().map(|r| r.call).collect()
        }

        pub(crate) fn head_count(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Head(_)))
                .count()
        }

        fn record(&self, call: Call, headers: &Headers, timeout: Option<Duration>) {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(Recorded {
                    call,
                    headers: headers.clone(),
                    timeout,
                });
            }
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get_text(&self, url: &str, headers: &Headers) -> Result<String, ScrapeError> {
            self.record(Call::Get(url.to_string()), headers, None);
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScrapeError::Transport(format!("connection refused: {}", url)))
        }

        async fn head_status(
            &self,
            url: &str,
            headers: &Headers,
            timeout: Duration,
        ) -> Result<u16, ScrapeError> {
            self.record(Call::Head(url.to_string()), headers, Some(timeout));
            if self.failing_images.contains(url) {
                return Err(ScrapeError::Transport(format!("timed out: {}", url)));
            }
            if self.live_images.contains(url) {
                Ok(200)
            } else {
                Ok(404)
            }
        }
    }
}
