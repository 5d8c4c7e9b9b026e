//! visu-scraper - ZOZOTOWN 상품 메타데이터 추출기
//!
//! 상품 페이지 URL 하나로 이름/가격/이미지/브랜드/사이즈를 추출합니다.
//! 직접 요청 → 모바일 요청 → URL 추론 순서로 시도하며,
//! 공개 진입점은 실패를 에러로 돌려주지 않고 빈 필드로만 표현합니다.

pub mod cli;
pub mod extractor;
pub mod product;
pub mod scraper;

// Re-exports
pub use extractor::{clean_html_text, format_price, HtmlExtractor};
pub use product::{ProductInfo, ScrapeError};
pub use scraper::{
    fetch_product_info, image_candidates, parse_product_key, FetchStage, HttpTransport,
    ProductKey, ProductScraper, ReqwestTransport, SiteConfig, Strategy,
};
