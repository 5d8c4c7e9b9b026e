//! 이미지 URL 검증
//!
//! 상품 ID로 CDN 후보 URL 목록을 만들고, 앞에서부터 하나씩 HEAD로
//! 존재를 확인합니다. 프로브는 동시에 날리지 않습니다 (외부 호스트에 대한
//! 요청량 제한). 확인된 후보가 없으면 첫 번째 범용 아이콘을 그대로 반환하며,
//! 범용 아이콘 자체는 프로브하지 않습니다.

use super::config::SiteConfig;
use super::transport::probe_headers;
use super::ProductScraper;

/// 후보 URL 템플릿 (`{id}` 자리에 상품 ID)
const IMAGE_TEMPLATES: [&str; 7] = [
    // 최신 CDN
    "https://c.imgz.jp/{id}/{id}_1_D_500.jpg",
    "https://c.imgz.jp/{id}/{id}_B_01_500.jpg",
    "https://c.imgz.jp/{id}/{id}_1_D_300.jpg",
    // 기존 이미지 서버
    "https://img.zozo.jp/goodsimages/{id}/{id}_1_D_500.jpg",
    "https://img.zozo.jp/goodsimages/{id}/{id}_B_01_500.jpg",
    "https://img.zozo.jp/goodsimages/{id}/{id}_1_D_300.jpg",
    // 상품 페이지 상대 경로 추정
    "https://zozo.jp/shop/goods/{id}/image/{id}_1.jpg",
];

/// 후보 목록: 실제 이미지 후보 + 범용 아이콘 두 개 (항상 마지막)
pub fn image_candidates(site: &SiteConfig, product_id: &str) -> Vec<String> {
    IMAGE_TEMPLATES
        .iter()
        .map(|template| template.replace("{id}", product_id))
        .chain(site.fallback_icons.iter().cloned())
        .collect()
}

impl ProductScraper {
    /// 첫 번째로 확인되는 후보 URL (없으면 첫 번째 범용 아이콘)
    pub async fn find_valid_image(&self, product_id: &str) -> String {
        let candidates = image_candidates(&self.site, product_id);
        let probe_count = candidates.len().saturating_sub(self.site.fallback_icons.len());
        let headers = probe_headers(&self.site.homepage);

        for (index, candidate) in candidates.iter().take(probe_count).enumerate() {
            tracing::debug!("이미지 후보 {} 확인 중: {}", index + 1, candidate);

            match self
                .transport
                .head_status(candidate, &headers, self.site.probe_timeout)
                .await
            {
                Ok(200) => {
                    tracing::info!("상품 이미지 발견: {}", candidate);
                    return candidate.clone();
                }
                Ok(status) => tracing::debug!("이미지 후보 무효 ({}): {}", status, candidate),
                Err(e) => tracing::debug!("이미지 후보 확인 실패: {} ({})", candidate, e),
            }
        }

        let fallback = self.site.fallback_icons[0].clone();
        tracing::info!("상품 이미지 없음, 범용 아이콘 사용: {}", fallback);
        fallback
    }
}
