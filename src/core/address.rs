//! City extraction from free-form postal addresses.
//!
//! Addresses are comma-separated. The first segment is inspected; when it
//! carries neither a city marker nor a plain alphabetic name, the next segment
//! is tried, up to `max_depth` levels.

use crate::domain::model::UNKNOWN_CITY;

pub const DEFAULT_MAX_DEPTH: usize = 3;

const CITY_MARKERS: [&str; 3] = ["г.", "город", "гор."];

/// Extracts a city name, falling back to [`UNKNOWN_CITY`]. Never fails.
pub fn extract_city(address: &str, depth: usize, max_depth: usize) -> String {
    if address.is_empty() || depth >= max_depth {
        return UNKNOWN_CITY.to_string();
    }

    let trimmed = address.trim();
    let (first, rest) = match trimmed.split_once(',') {
        Some((first, rest)) => (first.trim(), Some(rest)),
        None => (trimmed, None),
    };

    let lowered = first.to_lowercase();
    if CITY_MARKERS.iter().any(|m| lowered.contains(m)) {
        // The marker has to be the trailing word, with the city right before it.
        let words: Vec<&str> = first.split_whitespace().collect();
        return match words.as_slice() {
            [.., city, marker] if is_marker(marker) => city.to_string(),
            _ => UNKNOWN_CITY.to_string(),
        };
    }

    if !first.is_empty() && first.chars().all(char::is_alphabetic) {
        return first.to_string();
    }

    if depth < max_depth {
        return extract_city(rest.unwrap_or(""), depth + 1, max_depth);
    }

    UNKNOWN_CITY.to_string()
}

pub fn extract_city_default(address: &str) -> String {
    extract_city(address, 0, DEFAULT_MAX_DEPTH)
}

fn is_marker(word: &str) -> bool {
    let lowered = word.to_lowercase();
    CITY_MARKERS.contains(&lowered.as_str())
}

/// Extractor with a configured recursion bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityExtractor {
    max_depth: usize,
}

impl CityExtractor {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn extract(&self, address: Option<&str>) -> String {
        extract_city(address.unwrap_or(""), 0, self.max_depth)
    }
}

impl Default for CityExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
