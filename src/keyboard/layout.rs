//! Grid-based keyboard layouts.

use std::collections::HashMap;

use crate::keyboard::KeyboardDistance;

/// One physical row of keys.
#[derive(Debug, Clone, Copy)]
pub struct KeyRow {
    /// Horizontal offset of the first key, in key widths.
    pub offset: f32,
    /// Characters typed without modifiers, left to right.
    pub keys: &'static str,
    /// Characters typed with shift on the same keys, if any.
    pub shifted: Option<&'static str>,
}

impl KeyRow {
    pub const fn new(offset: f32, keys: &'static str) -> Self {
        KeyRow {
            offset,
            keys,
            shifted: None,
        }
    }

    pub const fn with_shifted(mut self, shifted: &'static str) -> Self {
        self.shifted = Some(shifted);
        self
    }
}

/// A keyboard layout as key-centre coordinates.
///
/// Rows are one unit apart vertically; keys within a row one unit apart
/// horizontally, shifted right by the row offset. Distances are Euclidean.
/// Characters are looked up as typed, then by their lowercase form, so `A`
/// and `a` share a key. Characters the layout does not know are
/// `unmapped_distance` away from everything except themselves.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    name: String,
    positions: HashMap<char, (f32, f32)>,
    unmapped_distance: f32,
}

impl KeyboardLayout {
    /// Build a layout from rows listed top to bottom.
    pub fn from_rows(name: impl Into<String>, rows: &[KeyRow]) -> Self {
        let mut positions = HashMap::new();

        for (row_index, row) in rows.iter().enumerate() {
            let y = row_index as f32;
            let planes = std::iter::once(row.keys).chain(row.shifted);
            for plane in planes {
                for (column, ch) in plane.chars().enumerate() {
                    let x = row.offset + column as f32;
                    positions.entry(ch).or_insert((x, y));
                }
            }
        }

        let unmapped_distance = max_pairwise_distance(positions.values());

        KeyboardLayout {
            name: name.into(),
            positions,
            unmapped_distance,
        }
    }

    /// Key-centre coordinates of `ch`, if the layout has it.
    pub fn position(&self, ch: char) -> Option<(f32, f32)> {
        if let Some(pos) = self.positions.get(&ch) {
            return Some(*pos);
        }
        let mut lower = ch.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(single), None) => self.positions.get(&single).copied(),
            _ => None,
        }
    }

    /// Distance used for characters missing from the layout.
    pub fn unmapped_distance(&self) -> f32 {
        self.unmapped_distance
    }
}

impl KeyboardDistance for KeyboardLayout {
    fn distance(&self, a: char, b: char) -> f32 {
        if a == b {
            return 0.0;
        }
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => euclidean(pa, pb),
            _ => self.unmapped_distance,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn euclidean(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

fn max_pairwise_distance<'a>(points: impl Iterator<Item = &'a (f32, f32)>) -> f32 {
    let points: Vec<(f32, f32)> = points.copied().collect();
    let mut max = 0.0f32;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            max = max.max(euclidean(*a, *b));
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> KeyboardLayout {
        KeyboardLayout::from_rows(
            "tiny",
            &[KeyRow::new(0.0, "ab"), KeyRow::new(0.5, "cd").with_shifted("CD")],
        )
    }

    #[test]
    fn test_positions_follow_rows_and_offsets() {
        let layout = tiny();
        assert_eq!(layout.position('a'), Some((0.0, 0.0)));
        assert_eq!(layout.position('d'), Some((1.5, 1.0)));
        assert_eq!(layout.position('C'), Some((0.5, 1.0)));
        assert_eq!(layout.position('B'), Some((1.0, 0.0)));
        assert_eq!(layout.position('z'), None);
    }

    #[test]
    fn test_euclidean_distance() {
        let layout = tiny();
        assert_eq!(layout.distance('a', 'b'), 1.0);
        assert!((layout.distance('a', 'd') - (1.5f32 * 1.5 + 1.0).sqrt()).abs() < 1e-6);
        assert_eq!(layout.distance('c', 'C'), 0.0);
    }

    #[test]
    fn test_unmapped_characters() {
        let layout = tiny();
        let max = layout.unmapped_distance();
        assert!(max > 0.0);
        assert_eq!(layout.distance('a', '?'), max);
        assert_eq!(layout.distance('?', 'a'), max);
        assert_eq!(layout.distance('?', '?'), 0.0);
    }
}
