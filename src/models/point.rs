// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Point annotation data structures.
//!
//! Points are stored in source-image pixel coordinates. They are grouped
//! into two ordered sets, foreground and background, whose insertion order
//! is the order the segmentation model receives them in.

use serde::{Deserialize, Serialize};

/// A 2D point in source-image pixel coordinates.
///
/// Serialized as a plain `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [i32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Which side of the object a point marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Foreground,
    Background,
}

impl PointKind {
    /// Numeric label expected by the segmentation model.
    pub fn label(self) -> u8 {
        match self {
            PointKind::Foreground => 1,
            PointKind::Background => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PointKind::Foreground => "foreground",
            PointKind::Background => "background",
        }
    }
}

/// Ordered sequence of points of a single kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Remove the most recently added point.
    pub fn pop(&mut self) -> Option<Point> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(200, 100)).unwrap();
        assert_eq!(json, "[200,100]");

        let point: Point = serde_json::from_str("[3,-4]").unwrap();
        assert_eq!(point, Point::new(3, -4));
    }

    #[test]
    fn test_point_rejects_non_integer() {
        assert!(serde_json::from_str::<Point>("[1.5,2]").is_err());
        assert!(serde_json::from_str::<Point>("[\"a\",2]").is_err());
        assert!(serde_json::from_str::<Point>("[1]").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(PointKind::Foreground.label(), 1);
        assert_eq!(PointKind::Background.label(), 0);
    }

    #[test]
    fn test_point_set_preserves_order() {
        let mut set = PointSet::new();
        set.push(Point::new(1, 1));
        set.push(Point::new(2, 2));
        set.push(Point::new(3, 3));

        assert_eq!(set.pop(), Some(Point::new(3, 3)));
        let remaining: Vec<_> = set.iter().copied().collect();
        assert_eq!(remaining, vec![Point::new(1, 1), Point::new(2, 2)]);
    }

    #[test]
    fn test_pop_empty() {
        let mut set = PointSet::new();
        assert_eq!(set.pop(), None);
        assert!(set.is_empty());
    }
}
