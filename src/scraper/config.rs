//! 대상 사이트 설정

use std::collections::HashMap;
use std::time::Duration;

/// 본문이 이보다 짧으면 차단/에러 페이지로 간주
pub const DEFAULT_MIN_BODY_CHARS: usize = 1000;

/// 이미지 존재 확인(HEAD) 타임아웃
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// 대상 사이트 설정 (기본값: ZOZOTOWN)
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// 호스트에 포함되어야 하는 도메인 토큰
    pub domain: String,
    /// 모바일 서브도메인 호스트
    pub mobile_host: String,
    /// 사이트명 (상품명으로 잡히면 거부)
    pub site_name: String,
    /// 루트 상대 이미지 경로 보정 및 Referer에 사용
    pub homepage: String,
    /// "페이지를 찾을 수 없음" 문구
    pub not_found_phrase: String,
    /// 이미지 URL이 포함해야 하는 토큰 (하나 이상)
    pub image_url_tokens: Vec<String>,
    /// 최소 본문 길이 (문자 수)
    pub min_body_chars: usize,
    /// 이미지 프로브 타임아웃
    pub probe_timeout: Duration,
    /// 어떤 후보도 확인되지 않을 때 쓰는 범용 아이콘 (정확히 두 개, 프로브하지 않음)
    pub fallback_icons: [String; 2],
    /// 숍 슬러그(소문자) → 표시명
    pub shop_aliases: HashMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: "zozo.jp".to_string(),
            mobile_host: "m.zozo.jp".to_string(),
            site_name: "ZOZOTOWN".to_string(),
            homepage: "https://zozo.jp".to_string(),
            not_found_phrase: "ページが見つかりません".to_string(),
            image_url_tokens: vec!["zozo".to_string(), "img".to_string()],
            min_body_chars: DEFAULT_MIN_BODY_CHARS,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            fallback_icons: [
                "https://img.icons8.com/color/300/clothes.png".to_string(),
                "https://img.icons8.com/color/300/t-shirt.png".to_string(),
            ],
            shop_aliases: default_shop_aliases(),
        }
    }
}

impl SiteConfig {
    /// URL 호스트가 대상 도메인에 속하는지
    pub fn matches_host(&self, host: &str) -> bool {
        host.to_ascii_lowercase().contains(&self.domain)
    }

    /// 숍 슬러그 표시명 (별칭 표에 없으면 대문자 변환)
    pub fn shop_display_name(&self, slug: &str) -> String {
        self.shop_aliases
            .get(&slug.to_lowercase())
            .cloned()
            .unwrap_or_else(|| slug.to_uppercase())
    }
}

fn default_shop_aliases() -> HashMap<String, String> {
    [
        ("multisize", "MULTISIZE"),
        ("diavel", "Diavel"),
        ("bonjoursagan", "Bonjour Sagan"),
        ("uniqlo", "ユニクロ"),
        ("gu", "GU"),
        ("beams", "BEAMS"),
        ("ships", "SHIPS"),
        ("urbanresearch", "URBAN RESEARCH"),
        ("nanamica", "nanamica"),
        ("tomorrowland", "TOMORROWLAND"),
        ("studious", "STUDIOUS"),
        ("nano", "nano・universe"),
        ("journal", "JOURNAL STANDARD"),
        ("freak", "FREAK'S STORE"),
    ]
    .into_iter()
    .map(|(slug, name)| (slug.to_string(), name.to_string()))
    .collect()
}
