//! 상품 정보 레코드 및 에러 분류
//!
//! 스크래퍼가 반환하는 `ProductInfo`는 호출마다 새로 만들어지는 값 타입입니다.
//! 모든 선택 필드는 "내용 있음(Some)" 또는 "결정 안 됨(None)" 둘 중 하나이며,
//! 빈 문자열은 API 경계에서 항상 `None`으로 정규화됩니다.

use serde::Serialize;

/// UI가 이름을 못 얻었을 때 표시하는 자리표시자
pub const UNKNOWN_NAME_LABEL: &str = "商品名不明";

// ============================================================================
// Product Info
// ============================================================================

/// 추출된 상품 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    /// 상품명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 표시용 가격 (예: `¥12,345`, `セール価格`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// 상품 이미지 URL
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// 브랜드 / 숍 표시명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// 호출자가 넘긴 URL (수정하지 않음)
    #[serde(rename = "originalURL")]
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
}

impl ProductInfo {
    /// 모든 선택 필드가 비어 있는 레코드
    pub fn empty(original_url: impl Into<String>) -> Self {
        Self {
            name: None,
            price: None,
            image_url: None,
            brand: None,
            original_url: original_url.into(),
            size: None,
            description: None,
            color: None,
            sale_price: None,
            original_price: None,
        }
    }

    /// 이름이 결정되었는지 여부 (오케스트레이터의 성공 조건)
    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    /// 선택 필드가 하나도 결정되지 않았는지 여부
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.brand.is_none()
            && self.size.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.sale_price.is_none()
            && self.original_price.is_none()
    }

    /// 화면 표시용 이름
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME_LABEL)
    }
}

/// 빈 문자열(공백만 있는 경우 포함)을 `None`으로 접는다
pub fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// 전략 내부에서 발생하는 실패 분류
///
/// 어떤 변형도 공개 진입점 밖으로 전파되지 않습니다. 오케스트레이터가
/// 로그만 남기고 다음 전략으로 넘어갑니다.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("host is outside the target domain: {0}")]
    OutOfDomain(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("response looks like a block/error page ({chars} chars)")]
    BlockedPage { chars: usize },

    #[error("shop slug or product id not found in url")]
    MissingProductKey,
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Transport(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_keeps_original_url() {
        let info = ProductInfo::empty("https://example.com/x");
        assert_eq!(info.original_url, "https://example.com/x");
        assert!(info.is_empty());
        assert!(!info.has_name());
        assert_eq!(info.display_name(), UNKNOWN_NAME_LABEL);
    }

    #[test]
    fn test_non_empty_collapses_blank() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty("M"), Some("M".to_string()));
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let mut info = ProductInfo::empty("https://zozo.jp/shop/a/goods/1/");
        info.image_url = Some("https://c.imgz.jp/1.jpg".to_string());
        let json = serde_json::to_value(&info).expect("serialize");
        assert_eq!(json["originalURL"], "https://zozo.jp/shop/a/goods/1/");
        assert_eq!(json["imageURL"], "https://c.imgz.jp/1.jpg");
        assert!(json.get("name").is_none());
        assert!(json.get("salePrice").is_none());
    }
}
