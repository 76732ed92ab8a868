//! Parser for the plain-text candidate catalog served by `/candidates/list`.
//!
//! The listing opens with a banner and the pager key hints, then a run of
//! dashes. The same run separates every candidate block after that:
//!
//! ```text
//! --------------------------------------------------------------------------------
//! Apache ActiveMQ (Classic) (5.17.1)                  https://activemq.apache.org/
//!
//! Apache ActiveMQ® is a popular open source, multi-protocol, Java-based message
//! broker.
//!
//!                                                           $ sdk install activemq
//! --------------------------------------------------------------------------------
//! ```

use crate::domain::model::Candidate;
use crate::utils::error::{CatalogError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

/// Shortest dash run accepted as a block separator.
pub const SEPARATOR_PREFIX: &str = "-------------------------------";

const INSTALL_MARKER: &str = "$ sdk install";

static URI_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("valid homepage regex"));

static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([-\w.+! ]+)\)").expect("valid version regex"));

/// Parses every block of the listing, failing on the first malformed one.
pub fn parse_candidates(input: &str) -> Result<Vec<Candidate>> {
    split_blocks(input)?
        .into_iter()
        .enumerate()
        .map(|(index, block)| {
            block.parse::<Candidate>().map_err(|e| {
                CatalogError::parse("candidate listing", format!("block {}: {}", index + 1, e))
            })
        })
        .collect()
}

/// Parses the listing, skipping malformed blocks with a warning.
pub fn parse_candidates_lenient(input: &str) -> Result<Vec<Candidate>> {
    let blocks = split_blocks(input)?;
    let total = blocks.len();
    let mut candidates = Vec::with_capacity(total);

    for (index, block) in blocks.into_iter().enumerate() {
        match block.parse::<Candidate>() {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => tracing::warn!("Skipping candidate block {}: {}", index + 1, e),
        }
    }

    tracing::debug!("Parsed {} of {} candidate blocks", candidates.len(), total);
    Ok(candidates)
}

/// Case-insensitive match on display name, binary name or description.
pub fn filter_candidates(candidates: &[Candidate], query: &str) -> Vec<Candidate> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return candidates.to_vec();
    }

    candidates
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.binary_name.to_lowercase().contains(&needle)
                || c.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

fn split_blocks(input: &str) -> Result<Vec<&str>> {
    let start = input.find(SEPARATOR_PREFIX).ok_or_else(|| {
        CatalogError::parse("candidate listing", "no block separator found")
    })?;
    let rest = &input[start..];
    let pattern_len = rest.bytes().take_while(|b| *b == b'-').count();
    let pattern = &rest[..pattern_len];

    Ok(rest[pattern_len..]
        .split(pattern)
        .filter(|block| block.lines().any(|line| !is_filler(line)))
        .collect())
}

fn is_filler(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.bytes().all(|b| b == b'-')
}

struct Header {
    name: String,
    default_version: String,
    homepage: String,
}

fn parse_header(line: &str) -> Option<Header> {
    let url = URI_REGEX.find(line)?;
    let before = &line[..url.start()];

    let (name, default_version) = match VERSION_REGEX.captures_iter(before).last() {
        Some(caps) => match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(inner)) => (
                before[..whole.start()].trim().to_string(),
                inner.as_str().trim().to_string(),
            ),
            _ => (before.trim().to_string(), String::new()),
        },
        None => (before.trim().to_string(), String::new()),
    };

    Some(Header {
        name,
        default_version,
        homepage: url.as_str().to_string(),
    })
}

impl FromStr for Candidate {
    type Err = CatalogError;

    fn from_str(block: &str) -> Result<Self> {
        let mut header: Option<Header> = None;
        let mut binary_name: Option<String> = None;
        let mut description: Vec<&str> = Vec::new();

        for line in block.lines() {
            if is_filler(line) {
                continue;
            }

            if line.contains(INSTALL_MARKER) {
                binary_name = line.split_whitespace().last().map(str::to_string);
                continue;
            }

            if header.is_none() {
                if let Some(parsed) = parse_header(line) {
                    header = Some(parsed);
                    continue;
                }
            }

            description.push(line.trim());
        }

        let header = header
            .ok_or_else(|| CatalogError::parse("candidate", "missing name and homepage line"))?;
        let binary_name = binary_name
            .filter(|name| name != "install")
            .ok_or_else(|| {
                CatalogError::parse(
                    "candidate",
                    format!("missing install command for '{}'", header.name),
                )
            })?;

        Ok(Candidate::new(
            header.name,
            binary_name,
            description.join(" "),
            header.homepage,
            header.default_version,
        ))
    }
}
