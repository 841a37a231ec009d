// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame number extraction from extracted-frame file names.

use regex::Regex;
use std::sync::OnceLock;

fn frame_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"frame_(\d+)").expect("frame pattern is valid"))
}

/// Frame index encoded in a name like `IMG_1824_frame_000042.png`.
///
/// Names without a frame number map to frame 0.
pub fn frame_index(filename: &str) -> u64 {
    frame_pattern()
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_index() {
        assert_eq!(frame_index("frame_000000.jpg"), 0);
        assert_eq!(frame_index("IMG_1824_frame_000042.png"), 42);
        assert_eq!(frame_index("frame_12_frame_7.png"), 12);
    }

    #[test]
    fn test_frame_index_missing() {
        assert_eq!(frame_index("holiday.png"), 0);
        assert_eq!(frame_index("frame_.png"), 0);
        assert_eq!(frame_index("frame_99999999999999999999999.png"), 0);
    }
}
