use crate::utils::error::{Result, SearchError};
use scraper::{ElementRef, Selector};
use url::Url;

pub fn selector(source_id: &str, css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::parse(source_id, format!("invalid selector '{}': {}", css, e)))
}

/// 元素內所有文字，壓縮空白
pub fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn first_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| element_text(&e))
        .unwrap_or_default()
}

/// 依序嘗試多個選擇器，回傳第一個非空文字
pub fn first_text_of(element: &ElementRef, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .map(|selector| first_text(element, selector))
        .find(|text| !text.is_empty())
}

pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 相對路徑轉為絕對網址，並正規化 `.`、`..` 區段；無法解析時保留原始 href
pub fn resolve_url(base_url: &str, href: &str) -> String {
    let href = href.trim();
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}
