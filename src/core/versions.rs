//! Parser for `/candidates/{candidate}/{platform}/versions/list` replies.
//!
//! Both layouts put the versions between the second and third `===` banner.
//! Java uses a `|` separated vendor table, every other candidate a grid of
//! version strings prefixed by the `>`, `*` and `+` markers.

use crate::domain::model::{CandidateVersion, Version};
use crate::utils::error::{CatalogError, Result};
use std::cmp::Ordering;

const JAVA_MARKER: &str = "Available Java Versions";
const BANNER: &str = "===";

pub fn parse_available_versions(input: &str) -> Result<Vec<CandidateVersion>> {
    let body = body_lines(input)?;
    if input.contains(JAVA_MARKER) {
        Ok(parse_java_rows(&body))
    } else {
        Ok(parse_version_grid(&body))
    }
}

fn body_lines(input: &str) -> Result<Vec<&str>> {
    let mut banners = 0;
    let mut body = Vec::new();

    for line in input.lines() {
        if line.starts_with(BANNER) {
            banners += 1;
            if banners == 3 {
                return Ok(body);
            }
            continue;
        }
        if banners == 2 {
            body.push(line);
        }
    }

    if banners < 2 {
        return Err(CatalogError::parse(
            "version listing",
            "expected a title between '===' banners",
        ));
    }
    Ok(body)
}

fn parse_java_rows(body: &[&str]) -> Vec<CandidateVersion> {
    let mut versions = Vec::new();
    let mut last_vendor = String::new();

    for line in body {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.bytes().all(|b| b == b'-') {
            continue;
        }
        if trimmed.starts_with("Vendor") && trimmed.contains("Identifier") {
            continue;
        }

        let version = line
            .parse::<Version>()
            .unwrap_or_else(|never| match never {});
        if version.identifier().is_empty() {
            tracing::warn!("Skipping java version row without identifier: '{}'", trimmed);
            continue;
        }

        let version = match version {
            Version::Java {
                vendor,
                usage,
                version,
                distribution,
                status,
                identifier,
            } => {
                let vendor = if vendor.is_empty() {
                    last_vendor.clone()
                } else {
                    last_vendor = vendor.clone();
                    vendor
                };
                Version::Java {
                    vendor,
                    usage,
                    version,
                    distribution,
                    status,
                    identifier,
                }
            }
            other => other,
        };

        let (installed, current, local_only) = match &version {
            Version::Java { usage, status, .. } => {
                let local_only = status.eq_ignore_ascii_case("local only");
                (
                    local_only || status.eq_ignore_ascii_case("installed"),
                    usage.contains(">>>"),
                    local_only,
                )
            }
            Version::Other { .. } => (false, false, false),
        };

        versions.push(CandidateVersion {
            version,
            installed,
            current,
            local_only,
        });
    }

    versions
}

fn parse_version_grid(body: &[&str]) -> Vec<CandidateVersion> {
    let mut versions = Vec::new();
    let mut current = false;
    let mut installed = false;
    let mut local_only = false;

    for token in body.iter().flat_map(|line| line.split_whitespace()) {
        if token.chars().all(|c| matches!(c, '>' | '*' | '+')) {
            for marker in token.chars() {
                match marker {
                    '>' => current = true,
                    '*' => installed = true,
                    _ => {
                        installed = true;
                        local_only = true;
                    }
                }
            }
            continue;
        }

        versions.push(CandidateVersion {
            version: Version::other(token),
            installed,
            current,
            local_only,
        });
        current = false;
        installed = false;
        local_only = false;
    }

    versions.sort_by(|a, b| compare_versions(b.identifier(), a.identifier()));
    versions
}

/// Natural ordering: digit runs compare by value, everything else by bytes.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (is_numeric(l), is_numeric(r)) {
                    (true, true) => compare_numeric(l, r),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_numeric(chunk: &str) -> bool {
    chunk.bytes().all(|b| b.is_ascii_digit())
}

fn compare_numeric(l: &str, r: &str) -> Ordering {
    let l = l.trim_start_matches('0');
    let r = r.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}

fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}
