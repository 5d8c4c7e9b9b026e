//! 필드 추출 모듈
//!
//! 원본 HTML 문자열에 필드별 패턴 캐스케이드를 순서대로 적용합니다.
//! - 상품명: 구조화 메타 태그 → title 태그 → JSON 필드 → data 속성 → 클래스명
//! - 가격: 천 단위 구분자 제거 후 양의 정수만 허용, `¥12,345` 형식으로 재포맷
//! - 이미지: 상대 URL을 절대 URL로 변환, 사이트/이미지 호스트 토큰 검사
//! - 브랜드: `/brand/` 링크의 텍스트
//!
//! 패턴 순서가 곧 우선순위입니다. 순서를 바꾸면 추출 결과가 바뀝니다.

pub mod text;

use regex::Regex;

use crate::product::{non_empty, ProductInfo};
use crate::scraper::SiteConfig;

pub use text::clean_html_text;

// ============================================================================
// Pattern Cascade
// ============================================================================

/// (패턴, 캡처 인덱스) 쌍의 순서 있는 목록
#[derive(Debug, Clone)]
pub struct Cascade {
    field: &'static str,
    patterns: Vec<(Regex, usize)>,
}

impl Cascade {
    /// 패턴 목록 컴파일 (잘못된 패턴은 로그 후 건너뜀)
    pub fn compile(field: &'static str, specs: &[(String, usize)]) -> Self {
        let patterns = specs
            .iter()
            .filter_map(|(pattern, group)| match Regex::new(pattern) {
                Ok(re) => Some((re, *group)),
                Err(e) => {
                    tracing::error!("{} 패턴 컴파일 실패: {} ({})", field, pattern, e);
                    None
                }
            })
            .collect();

        Self { field, patterns }
    }

    /// 패턴 개수
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 각 패턴의 첫 매치 캡처를 `accept`에 넘기고, 처음으로 `Some`이 나오면 멈춘다
    pub fn first_accepted<T>(
        &self,
        html: &str,
        mut accept: impl FnMut(&str) -> Option<T>,
    ) -> Option<T> {
        for (index, (re, group)) in self.patterns.iter().enumerate() {
            let Some(capture) = re.captures(html).and_then(|caps| caps.get(*group)) else {
                continue;
            };

            if let Some(value) = accept(capture.as_str()) {
                tracing::debug!("{} 패턴 {} 매치", self.field, index + 1);
                return Some(value);
            }
            tracing::debug!("{} 패턴 {} 매치 거부: {:?}", self.field, index + 1, capture.as_str());
        }

        None
    }
}

fn specs(patterns: &[&str]) -> Vec<(String, usize)> {
    patterns.iter().map(|p| (p.to_string(), 1)).collect()
}

// ============================================================================
// HTML Extractor
// ============================================================================

/// 사이트 설정에 맞춰 컴파일된 네 개의 캐스케이드
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    site_name: String,
    not_found_phrase: String,
    homepage: String,
    image_url_tokens: Vec<String>,
    name: Cascade,
    price: Cascade,
    image: Cascade,
    brand: Cascade,
}

impl HtmlExtractor {
    /// 사이트 설정으로 추출기 생성
    pub fn new(site: &SiteConfig) -> Self {
        let title_with_suffix = format!(
            r"(?i)<title>([^<]*?)\s*\|\s*{}",
            regex::escape(&site.site_name)
        );

        let name = Cascade::compile(
            "name",
            &specs(&[
                r#"(?i)<meta\s+property=["']og:title["']\s+content=["']([^"']*)["']"#,
                title_with_suffix.as_str(),
                r"(?i)<title>([^<]*)</title>",
                r#"(?i)["']productName["']\s*:\s*["']([^"']*)["']"#,
                r#"(?i)["']name["']\s*:\s*["']([^"']*)["']"#,
                r#"(?i)data-product-name=["']([^"']*)["']"#,
                r#"(?i)class=["'][^"']*product[^"']*name[^"']*["'][^>]*>([^<]*)"#,
            ]),
        );

        let price = Cascade::compile(
            "price",
            &specs(&[
                r"[￥¥]\s*([0-9,]+)",
                r#"(?i)["']price["']\s*:\s*["']?([0-9,]+)["']?"#,
                r#"(?i)["']salePrice["']\s*:\s*["']?([0-9,]+)["']?"#,
                r#"(?i)data-price=["']([0-9,]+)["']"#,
                r#"(?i)class=["'][^"']*price[^"']*["'][^>]*>.*?([0-9,]+)"#,
            ]),
        );

        let image = Cascade::compile(
            "image",
            &specs(&[
                r#"(?i)<meta\s+property=["']og:image["']\s+content=["']([^"']*)["']"#,
                r#"(?i)<img[^>]*src=["']([^"']*)["'][^>]*(?:alt=["'][^"']*商品|class=["'][^"']*product)"#,
                r#"(?i)<img[^>]*data-src=["']([^"']*)["']"#,
                r#"(?i)["']imageUrl["']\s*:\s*["']([^"']*)["']"#,
                r#"(?i)["']image["']\s*:\s*["']([^"']*)["']"#,
            ]),
        );

        let brand = Cascade::compile(
            "brand",
            &specs(&[r#"<a[^>]*href="/brand/[^"]*"[^>]*>(.*?)</a>"#]),
        );

        Self {
            site_name: site.site_name.clone(),
            not_found_phrase: site.not_found_phrase.clone(),
            homepage: site.homepage.trim_end_matches('/').to_string(),
            image_url_tokens: site.image_url_tokens.clone(),
            name,
            price,
            image,
            brand,
        }
    }

    /// 페이지 본문 전체를 `ProductInfo`로 변환
    pub fn parse_product_html(&self, html: &str, original_url: &str) -> ProductInfo {
        let name = self.extract_name(html);
        let price = self.extract_price(html);
        let image_url = self.extract_image_url(html);
        let brand = self.extract_brand(html);

        tracing::info!(
            "추출 결과 - name: {:?}, price: {:?}, image: {:?}, brand: {:?}",
            name,
            price,
            image_url,
            brand
        );

        ProductInfo {
            name,
            sale_price: price.clone(),
            price,
            image_url,
            brand,
            size: extract_size_param(original_url),
            ..ProductInfo::empty(original_url)
        }
    }

    /// 상품명 추출 (사이트명 그 자체, "페이지 없음" 문구는 거부)
    pub fn extract_name(&self, html: &str) -> Option<String> {
        self.name.first_accepted(html, |capture| {
            let cleaned = clean_html_text(capture);
            if cleaned.is_empty()
                || cleaned == self.site_name
                || cleaned.contains(&self.not_found_phrase)
            {
                return None;
            }
            Some(cleaned)
        })
    }

    /// 가격 추출
    pub fn extract_price(&self, html: &str) -> Option<String> {
        self.price.first_accepted(html, format_price)
    }

    /// 이미지 URL 추출
    pub fn extract_image_url(&self, html: &str) -> Option<String> {
        self.image
            .first_accepted(html, |capture| self.normalize_image_url(capture))
    }

    /// 브랜드 추출 (거부 규칙 없음)
    pub fn extract_brand(&self, html: &str) -> Option<String> {
        self.brand
            .first_accepted(html, |capture| non_empty(clean_html_text(capture)))
    }

    /// 프로토콜/루트 상대 URL을 절대 URL로 바꾸고 호스트 토큰을 검사
    fn normalize_image_url(&self, capture: &str) -> Option<String> {
        let raw = capture.trim();

        let absolute = if let Some(rest) = raw.strip_prefix("//") {
            format!("https://{}", rest)
        } else if raw.starts_with('/') {
            format!("{}{}", self.homepage, raw)
        } else if raw.starts_with("http") {
            raw.to_string()
        } else {
            return None;
        };

        self.image_url_tokens
            .iter()
            .any(|token| absolute.contains(token.as_str()))
            .then_some(absolute)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// 가격 캡처를 정규화: 구분자 제거 → 양의 정수 확인 → `¥` + 천 단위 구분
pub fn format_price(capture: &str) -> Option<String> {
    let cleaned = capture.trim().replace(',', "");
    let value: i64 = cleaned.parse().ok()?;
    if value <= 0 {
        return None;
    }
    Some(format!("¥{}", group_thousands(value)))
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 원본 URL의 `size` 쿼리 파라미터 값
pub fn extract_size_param(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let size = parsed
        .query_pairs()
        .find(|(key, _)| key == "size")
        .map(|(_, value)| value.into_owned())?;
    non_empty(size)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> HtmlExtractor {
        HtmlExtractor::new(&SiteConfig::default())
    }

    #[test]
    fn test_all_patterns_compile() {
        let ex = extractor();
        assert_eq!(ex.name.len(), 7);
        assert_eq!(ex.price.len(), 5);
        assert_eq!(ex.image.len(), 5);
        assert_eq!(ex.brand.len(), 1);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("12,345"), Some("¥12,345".to_string()));
        assert_eq!(format_price("1234567"), Some("¥1,234,567".to_string()));
        assert_eq!(format_price("990"), Some("¥990".to_string()));
        assert_eq!(format_price("0"), None);
        assert_eq!(format_price("-5"), None);
        assert_eq!(format_price(","), None);
        assert_eq!(format_price("abc"), None);
    }

    #[test]
    fn test_name_prefers_og_title() {
        let html = r#"
            <html><head>
            <meta property="og:title" content="リネンシャツ">
            <title>別の名前 | ZOZOTOWN</title>
            </head></html>
        "#;
        assert_eq!(extractor().extract_name(html), Some("リネンシャツ".to_string()));
    }

    #[test]
    fn test_name_strips_site_suffix_from_title() {
        let html = "<html><head><title>デニムパンツ | ZOZOTOWN</title></head></html>";
        assert_eq!(extractor().extract_name(html), Some("デニムパンツ".to_string()));
    }

    #[test]
    fn test_name_rejects_bare_site_name() {
        let html = "<html><head><title>ZOZOTOWN</title></head><body></body></html>";
        assert_eq!(extractor().extract_name(html), None);
    }

    #[test]
    fn test_name_rejects_not_found_and_continues() {
        let html = r#"
            <title>ページが見つかりません</title>
            <div data-product-name="ニットカーディガン"></div>
        "#;
        assert_eq!(
            extractor().extract_name(html),
            Some("ニットカーディガン".to_string())
        );
    }

    #[test]
    fn test_name_decodes_entities() {
        let html = r#"<meta property="og:title" content="Tee &amp; Shorts">"#;
        assert_eq!(extractor().extract_name(html), Some("Tee & Shorts".to_string()));
    }

    #[test]
    fn test_name_from_json_field() {
        let html = r#"<script>var d = {"productName": "ボアブルゾン"};</script>"#;
        assert_eq!(extractor().extract_name(html), Some("ボアブルゾン".to_string()));
    }

    #[test]
    fn test_name_from_generic_json_name_before_data_attribute() {
        let html = r#"
            <div data-product-name="データ属性の名前"></div>
            <script>{"@type": "Product", "name": "カーゴパンツ"}</script>
        "#;
        assert_eq!(extractor().extract_name(html), Some("カーゴパンツ".to_string()));
    }

    #[test]
    fn test_name_from_class_heuristic() {
        let html = r#"<h1 class="p-product-name">  ウールコート </h1>"#;
        assert_eq!(extractor().extract_name(html), Some("ウールコート".to_string()));
    }

    #[test]
    fn test_price_from_yen_glyph() {
        let html = "<span class=\"p\">￥12,345 税込</span>";
        assert_eq!(extractor().extract_price(html), Some("¥12,345".to_string()));
    }

    #[test]
    fn test_price_zero_falls_through_to_json() {
        let html = r#"<span>¥0</span><script>{"price": "4,990"}</script>"#;
        assert_eq!(extractor().extract_price(html), Some("¥4,990".to_string()));
    }

    #[test]
    fn test_price_from_sale_price_before_data_attribute() {
        let html = r#"<div data-price="5,000"></div><script>{"salePrice": 3990}</script>"#;
        assert_eq!(extractor().extract_price(html), Some("¥3,990".to_string()));
    }

    #[test]
    fn test_price_from_data_attribute_before_price_class() {
        let html = r#"<div class="price" data-price="5,000">6,600</div>"#;
        assert_eq!(extractor().extract_price(html), Some("¥5,000".to_string()));
    }

    #[test]
    fn test_price_from_price_class() {
        let html = r#"<p class="p-price">税込 12,800円</p>"#;
        assert_eq!(extractor().extract_price(html), Some("¥12,800".to_string()));
    }

    #[test]
    fn test_price_absent() {
        assert_eq!(extractor().extract_price("<p>no price here</p>"), None);
    }

    #[test]
    fn test_image_protocol_relative() {
        let html = r#"<meta property="og:image" content="//c.imgz.jp/123/123_1_D_500.jpg">"#;
        assert_eq!(
            extractor().extract_image_url(html),
            Some("https://c.imgz.jp/123/123_1_D_500.jpg".to_string())
        );
    }

    #[test]
    fn test_image_product_img_before_lazy_src() {
        let html = r#"
            <img data-src="https://img.zozo.jp/lazy.jpg">
            <img src="https://c.imgz.jp/1/1_1_D_500.jpg" alt="商品画像">
        "#;
        assert_eq!(
            extractor().extract_image_url(html),
            Some("https://c.imgz.jp/1/1_1_D_500.jpg".to_string())
        );

        let html = r#"
            <img data-src="https://img.zozo.jp/lazy.jpg">
            <img src="//c.imgz.jp/2/2_B_01_500.jpg" class="product-image">
        "#;
        assert_eq!(
            extractor().extract_image_url(html),
            Some("https://c.imgz.jp/2/2_B_01_500.jpg".to_string())
        );
    }

    #[test]
    fn test_image_root_relative() {
        let html = r#"<img class="x" data-src="/goodsimages/1/1.jpg">"#;
        assert_eq!(
            extractor().extract_image_url(html),
            Some("https://zozo.jp/goodsimages/1/1.jpg".to_string())
        );
    }

    #[test]
    fn test_image_rejects_foreign_host() {
        let html = r#"
            <meta property="og:image" content="https://cdn.example.com/a.jpg">
            <script>{"imageUrl": "https://img.zozo.jp/b.jpg"}</script>
        "#;
        assert_eq!(
            extractor().extract_image_url(html),
            Some("https://img.zozo.jp/b.jpg".to_string())
        );
    }

    #[test]
    fn test_image_rejects_non_url() {
        let html = r#"<meta property="og:image" content="data:image/png;base64,xx">"#;
        assert_eq!(extractor().extract_image_url(html), None);
    }

    #[test]
    fn test_brand_from_link() {
        let html = r#"<a class="brand" href="/brand/beams/"><span>BEAMS</span></a>"#;
        assert_eq!(extractor().extract_brand(html), Some("BEAMS".to_string()));
        assert_eq!(extractor().extract_brand("<a href=\"/shop/x/\">x</a>"), None);
    }

    #[test]
    fn test_extract_size_param() {
        assert_eq!(
            extract_size_param("https://zozo.jp/shop/a/goods/1/?did=2&size=M"),
            Some("M".to_string())
        );
        assert_eq!(extract_size_param("https://zozo.jp/shop/a/goods/1/?size="), None);
        assert_eq!(extract_size_param("https://zozo.jp/shop/a/goods/1/"), None);
        assert_eq!(extract_size_param("not a url"), None);
    }

    #[test]
    fn test_parse_product_html() {
        let html = r#"
            <meta property="og:title" content="スウェット">
            <meta property="og:image" content="https://c.imgz.jp/9/9_1_D_500.jpg">
            <span>¥5,500</span>
            <a href="/brand/gu/">GU</a>
        "#;
        let url = "https://zozo.jp/shop/gu/goods/9/?size=L";
        let info = extractor().parse_product_html(html, url);
        assert_eq!(info.name.as_deref(), Some("スウェット"));
        assert_eq!(info.price.as_deref(), Some("¥5,500"));
        assert_eq!(info.sale_price.as_deref(), Some("¥5,500"));
        assert_eq!(info.brand.as_deref(), Some("GU"));
        assert_eq!(info.size.as_deref(), Some("L"));
        assert_eq!(info.original_url, url);
        assert!(info.description.is_none());
    }
}
