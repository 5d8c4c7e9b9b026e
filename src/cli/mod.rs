//! CLI 모듈
//!
//! visu-scraper 명령어 정의 및 구현

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::product::ProductInfo;
use crate::scraper::{
    image_candidates, ProductScraper, ReqwestTransport, SiteConfig, DEFAULT_MIN_BODY_CHARS,
};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "visu-scraper")]
#[command(version, about = "ZOZOTOWN 상품 정보 추출기", long_about = None)]
pub struct Cli {
    /// 최소 본문 길이 (문자 수, 미만이면 차단 페이지로 간주)
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_BODY_CHARS)]
    pub min_body_chars: usize,

    /// 이미지 프로브 타임아웃 (초)
    #[arg(long, global = true, default_value = "3")]
    pub probe_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// URL에서 상품 정보 추출
    Fetch {
        /// 상품 페이지 URL (여러 개 가능)
        #[arg(required = true)]
        urls: Vec<String>,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 대기 URL 목록 파일을 일괄 처리
    Batch {
        /// URL 목록 파일 (한 줄에 하나, `#` 주석 허용)
        #[arg(short, long)]
        file: PathBuf,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// URL만으로 상품 정보 추론 (페이지 본문 요청 없음)
    Infer {
        /// 상품 페이지 URL
        url: String,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 상품 ID의 이미지 후보 URL 목록 (네트워크 없음)
    Candidates {
        /// 상품 ID
        product_id: String,
    },
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    let site = SiteConfig {
        min_body_chars: cli.min_body_chars,
        probe_timeout: Duration::from_secs(cli.probe_timeout_secs),
        ..SiteConfig::default()
    };

    match cli.command {
        Commands::Fetch { urls, json } => cmd_fetch(site, &urls, json).await,
        Commands::Batch { file, json } => cmd_batch(site, &file, json).await,
        Commands::Infer { url, json } => cmd_infer(site, &url, json).await,
        Commands::Candidates { product_id } => cmd_candidates(&site, &product_id),
    }
}

fn build_scraper(site: SiteConfig) -> Result<ProductScraper> {
    let transport = ReqwestTransport::new().context("HTTP 클라이언트 생성 실패")?;
    Ok(ProductScraper::with_config(Arc::new(transport), site))
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 상품 정보 추출 명령어 (fetch)
async fn cmd_fetch(site: SiteConfig, urls: &[String], json: bool) -> Result<()> {
    let scraper = build_scraper(site)?;

    let mut results = Vec::with_capacity(urls.len());
    for url in urls {
        if !json {
            println!("[*] 상품 정보 취득 중: {}", url);
        }
        results.push(scraper.fetch_product_info(url).await);
    }

    print_products(&results, json)
}

/// 일괄 처리 명령어 (batch)
async fn cmd_batch(site: SiteConfig, file: &Path, json: bool) -> Result<()> {
    let urls = read_pending_urls(file)?;
    if urls.is_empty() {
        bail!("처리할 URL이 없습니다: {:?}", file);
    }

    if !json {
        println!("[*] 처리 대상: {} URL", urls.len());
    }

    let scraper = build_scraper(site)?;
    let results = scraper.fetch_many(&urls).await;

    print_products(&results, json)
}

/// URL 추론 명령어 (infer)
async fn cmd_infer(site: SiteConfig, url: &str, json: bool) -> Result<()> {
    let scraper = build_scraper(site)?;
    let info = scraper
        .infer_from_url(url)
        .await
        .with_context(|| format!("URL에서 상품 정보를 추론할 수 없습니다: {}", url))?;

    print_products(&[info], json)
}

/// 이미지 후보 목록 명령어 (candidates)
fn cmd_candidates(site: &SiteConfig, product_id: &str) -> Result<()> {
    if product_id.is_empty() || !product_id.chars().all(|c| c.is_ascii_digit()) {
        bail!("상품 ID는 숫자여야 합니다: {}", product_id);
    }

    let candidates = image_candidates(site, product_id);
    let probe_count = candidates.len() - site.fallback_icons.len();
    for (i, candidate) in candidates.iter().enumerate() {
        let mark = if i < probe_count { "probe" } else { "fallback" };
        println!("{:>2}. [{}] {}", i + 1, mark, candidate);
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 대기 URL 목록 읽기 (빈 줄/주석 제외, 순서 유지 중복 제거)
fn read_pending_urls(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list: {:?}", path))?;
    Ok(parse_pending_urls(&content))
}

fn parse_pending_urls(content: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !urls.iter().any(|u| u == line) {
            urls.push(line.to_string());
        }
    }
    urls
}

fn print_products(results: &[ProductInfo], json: bool) -> Result<()> {
    if json {
        let out = if results.len() == 1 {
            serde_json::to_string_pretty(&results[0])
        } else {
            serde_json::to_string_pretty(results)
        }
        .context("JSON 직렬화 실패")?;
        println!("{}", out);
        return Ok(());
    }

    for info in results {
        println!();
        if info.is_empty() {
            println!("[!] 상품 정보를 취득하지 못했습니다");
        } else {
            println!("[OK] {}", truncate_text(info.display_name(), 80));
        }
        println!("     URL: {}", info.original_url);
        print_field("가격", info.price.as_deref());
        print_field("브랜드", info.brand.as_deref());
        print_field("이미지", info.image_url.as_deref());
        print_field("사이즈", info.size.as_deref());
    }

    Ok(())
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("     {}: {}", label, value);
    }
}

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 5), "hello...");
        assert_eq!(truncate_text("hello\nworld", 20), "hello world");
    }

    #[test]
    fn test_truncate_unicode() {
        let name = "【セール】ユニクロ - 商品ID: 1";
        assert_eq!(truncate_text(name, 5), "【セール】...");
    }

    #[test]
    fn test_parse_pending_urls() {
        let content = "\
# shared from app
https://zozo.jp/shop/gu/goods/1/

https://zozo.jp/shop/gu/goods/2/
https://zozo.jp/shop/gu/goods/1/
";
        assert_eq!(
            parse_pending_urls(content),
            vec![
                "https://zozo.jp/shop/gu/goods/1/".to_string(),
                "https://zozo.jp/shop/gu/goods/2/".to_string(),
            ]
        );
    }

    #[test]
    fn test_read_pending_urls_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  https://zozo.jp/shop/beams/goods-sale/5/  ").unwrap();
        let urls = read_pending_urls(file.path()).unwrap();
        assert_eq!(urls, vec!["https://zozo.jp/shop/beams/goods-sale/5/".to_string()]);
    }

    #[test]
    fn test_read_pending_urls_missing_file() {
        assert!(read_pending_urls(Path::new("/nonexistent/urls.txt")).is_err());
    }

    #[test]
    fn test_cli_parses_fetch() {
        let cli = Cli::try_parse_from([
            "visu-scraper",
            "fetch",
            "https://zozo.jp/shop/a/goods/1/",
            "--json",
            "--min-body-chars",
            "500",
        ])
        .unwrap();
        assert_eq!(cli.min_body_chars, 500);
        assert_eq!(cli.probe_timeout_secs, 3);
        assert!(matches!(cli.command, Commands::Fetch { json: true, .. }));
    }

    #[test]
    fn test_candidates_rejects_non_numeric_id() {
        assert!(cmd_candidates(&SiteConfig::default(), "abc").is_err());
        assert!(cmd_candidates(&SiteConfig::default(), "123").is_ok());
    }
}
