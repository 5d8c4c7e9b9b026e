//! HTML 조각 정리 - 태그 제거 + 엔티티 디코딩

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is a valid regex"));

/// 디코딩하는 엔티티 목록 (순서대로 적용, `&amp;`가 먼저)
const ENTITIES: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// 태그를 제거하고 엔티티를 디코딩한 뒤 앞뒤 공백을 잘라낸다
pub fn clean_html_text(fragment: &str) -> String {
    let mut text = TAG_RE.replace_all(fragment, "").into_owned();

    for (entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }

    text.trim().to_string()
}
