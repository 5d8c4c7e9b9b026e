//! URL 추론 전략
//!
//! 본문을 받지 않고 URL 경로만으로 숍 슬러그와 상품 ID를 뽑아
//! 이름/브랜드/가격을 합성합니다. 이미지는 후보 검증기로 찾습니다.

use std::sync::LazyLock;

use regex::Regex;

use super::ProductScraper;
use crate::extractor::extract_size_param;
use crate::product::{ProductInfo, ScrapeError};

/// 세일 상품명 접두어
pub const SALE_PREFIX: &str = "【セール】";

/// 세일 상품 가격 표시
pub const SALE_PRICE_LABEL: &str = "セール価格";

static SHOP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/shop/([^/?#]+)").expect("shop pattern is a valid regex"));

/// 상품 ID 패턴 (우선순위 순, 두 번째 값은 세일 여부)
static ID_PATTERNS: LazyLock<Vec<(Regex, bool)>> = LazyLock::new(|| {
    [
        (r"/goods-sale/(\d+)", true),
        (r"/goods/(\d+)", false),
        (r"goods[^/]*/(\d+)", false),
    ]
    .into_iter()
    .map(|(pattern, on_sale)| {
        let re = Regex::new(pattern).expect("product id pattern is a valid regex");
        (re, on_sale)
    })
    .collect()
});

/// URL에서 뽑아낸 상품 식별 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductKey {
    pub shop: String,
    pub product_id: String,
    pub on_sale: bool,
}

/// URL 경로에서 숍 슬러그 + 상품 ID 추출 (둘 중 하나라도 없으면 `None`)
pub fn parse_product_key(url: &str) -> Option<ProductKey> {
    let shop = SHOP_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())?;

    let (product_id, on_sale) = ID_PATTERNS.iter().find_map(|(re, on_sale)| {
        re.captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| (m.as_str().to_string(), *on_sale))
    })?;

    Some(ProductKey {
        shop,
        product_id,
        on_sale,
    })
}

impl ProductScraper {
    /// 방법 3: URL만으로 상품 정보 구성
    pub async fn infer_from_url(&self, url: &str) -> Result<ProductInfo, ScrapeError> {
        let key = parse_product_key(url).ok_or(ScrapeError::MissingProductKey)?;

        let brand = self.site.shop_display_name(&key.shop);
        let sale_text = if key.on_sale { SALE_PREFIX } else { "" };
        let name = format!("{}{} - 商品ID: {}", sale_text, brand, key.product_id);
        let price = key.on_sale.then(|| SALE_PRICE_LABEL.to_string());

        tracing::info!(
            "[infer] 숍: {}, ID: {}, 세일: {}",
            brand,
            key.product_id,
            key.on_sale
        );

        let image_url = self.find_valid_image(&key.product_id).await;

        Ok(ProductInfo {
            name: Some(name),
            sale_price: price.clone(),
            price,
            image_url: Some(image_url),
            brand: Some(brand),
            size: extract_size_param(url),
            ..ProductInfo::empty(url)
        })
    }
}
