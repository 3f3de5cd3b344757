//! Parsing of static-server directory listings.

use std::cmp::Ordering;

use quiz_core::model::TestSetName;
use quiz_core::normalize::has_json_suffix;

/// Extract test-set names from an HTML directory listing.
///
/// Keeps anchors whose target ends in `.json`, skips the parent link and
/// subdirectories, decodes the last path segment, then deduplicates and sorts
/// with numeric runs compared by value (`set_2` before `set_10`).
#[must_use]
pub fn parse_listing(html: &str) -> Vec<TestSetName> {
    let mut names: Vec<String> = extract_hrefs(html)
        .iter()
        .filter_map(|href| listing_entry(href))
        .collect();
    names.sort_by(|a, b| natural_cmp(a, b));
    names.dedup();
    names.into_iter().map(TestSetName::new).collect()
}

/// Every `href` attribute value in document order.
#[must_use]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    let mut hrefs = Vec::new();
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find("href") {
        let mut pos = cursor + found + "href".len();
        cursor = pos;

        let rest = &html[pos..];
        let after_ws = rest.trim_start();
        let Some(value) = after_ws.strip_prefix('=') else {
            continue;
        };
        pos += rest.len() - after_ws.len() + 1;
        let value_ws = value.trim_start();
        pos += value.len() - value_ws.len();

        let (raw, consumed) = match value_ws.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &value_ws[1..];
                let end = body.find(quote).unwrap_or(body.len());
                (&body[..end], end + 2)
            }
            Some(_) => {
                let end = value_ws
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(value_ws.len());
                (&value_ws[..end], end)
            }
            None => continue,
        };
        hrefs.push(raw.to_string());
        cursor = (pos + consumed).min(html.len());
    }
    hrefs
}

fn listing_entry(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.ends_with('/') || !has_json_suffix(href) {
        return None;
    }
    let path = href.split(['?', '#']).next()?;
    let last = path.rsplit('/').next()?;
    let decoded = urlencoding::decode(last).ok()?.into_owned();
    (!decoded.is_empty() && has_json_suffix(&decoded)).then_some(decoded)
}

/// Compare names case-insensitively with digit runs ordered by numeric value.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x, y) {
                    (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
                    (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
                    (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
                    (Chunk::Text(x), Chunk::Text(y)) => {
                        x.to_lowercase().cmp(&y.to_lowercase())
                    }
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}
