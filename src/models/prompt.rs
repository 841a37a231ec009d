// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Point prompt payload for the segmentation model.

use super::point::{Point, PointKind};
use super::record::AnnotationRecord;
use serde::{Deserialize, Serialize};

/// Points and their labels in the order the model consumes them:
/// foreground points first, then background points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationPrompt {
    pub points: Vec<Point>,
    pub labels: Vec<u8>,
}

impl SegmentationPrompt {
    /// Build a prompt from the first `foreground_limit` foreground points and
    /// the first `background_limit` background points.
    pub fn from_points(
        foreground: &[Point],
        background: &[Point],
        foreground_limit: usize,
        background_limit: usize,
    ) -> Self {
        let foreground = &foreground[..foreground.len().min(foreground_limit)];
        let background = &background[..background.len().min(background_limit)];

        let mut points = Vec::with_capacity(foreground.len() + background.len());
        let mut labels = Vec::with_capacity(points.capacity());
        for point in foreground {
            points.push(*point);
            labels.push(PointKind::Foreground.label());
        }
        for point in background {
            points.push(*point);
            labels.push(PointKind::Background.label());
        }

        Self { points, labels }
    }

    pub fn from_record(record: &AnnotationRecord, foreground_limit: usize, background_limit: usize) -> Self {
        Self::from_points(
            &record.foreground_points,
            &record.background_points,
            foreground_limit,
            background_limit,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_order_and_labels() {
        let fg = vec![Point::new(1, 1), Point::new(2, 2)];
        let bg = vec![Point::new(9, 9)];
        let prompt = SegmentationPrompt::from_points(&fg, &bg, 3, 3);

        assert_eq!(prompt.points, vec![Point::new(1, 1), Point::new(2, 2), Point::new(9, 9)]);
        assert_eq!(prompt.labels, vec![1, 1, 0]);
    }

    #[test]
    fn test_prompt_limits_keep_earliest_points() {
        let fg = vec![Point::new(1, 1), Point::new(2, 2), Point::new(3, 3)];
        let bg = vec![Point::new(7, 7), Point::new(8, 8)];
        let prompt = SegmentationPrompt::from_points(&fg, &bg, 2, 1);

        assert_eq!(prompt.points, vec![Point::new(1, 1), Point::new(2, 2), Point::new(7, 7)]);
        assert_eq!(prompt.labels, vec![1, 1, 0]);
    }

    #[test]
    fn test_prompt_json_shape() {
        let prompt = SegmentationPrompt::from_points(&[Point::new(5, 6)], &[Point::new(7, 8)], 3, 3);
        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json, serde_json::json!({ "points": [[5, 6], [7, 8]], "labels": [1, 0] }));
    }
}
