//! Keyboard layout geometry and point-to-key hit testing.
//!
//! A [`Layout`] is an immutable table of [`KeyDefinition`]s placed on a fixed
//! pitch grid.  Every key resolves to a pixel [`Rect`]:
//!
//! ```text
//! x      = start_x + column * (key_width  + gap)
//! y      = start_y + row    * (key_height + gap)
//! width  = key_width * width_multiplier
//! height = key_height
//! ```
//!
//! Hit testing is inclusive on all four edges and scans keys in row-major
//! order; the first rectangle containing the point wins.

use std::collections::HashSet;

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("key label must not be empty")]
    EmptyLabel,

    #[error("unsupported key label {0:?}: expected SPACE, ENTER, BACK, EXIT or a single character")]
    UnsupportedLabel(String),

    #[error("key {0:?} has a zero width multiplier")]
    ZeroWidth(String),

    #[error("key label {0:?} appears more than once")]
    DuplicateLabel(String),

    #[error("row {row}, column {column} is occupied by more than one key")]
    DuplicateCell { row: u32, column: u32 },
}

// ════════════════════════════════════════════════════════════════════════════
// KeyAction: label resolved once, at definition time
// ════════════════════════════════════════════════════════════════════════════

/// What a key does when it activates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Space,
    Enter,
    Back,
    Exit,
    /// A printable key; carries the label character as shown on the key.
    Char(char),
}

impl KeyAction {
    /// Resolve a key label.  Named keys are upper-case words; anything else
    /// must be exactly one character.
    pub fn from_label(label: &str) -> Result<Self, LayoutError> {
        match label {
            "SPACE" => Ok(KeyAction::Space),
            "ENTER" => Ok(KeyAction::Enter),
            "BACK"  => Ok(KeyAction::Back),
            "EXIT"  => Ok(KeyAction::Exit),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (None, _)          => Err(LayoutError::EmptyLabel),
                    (Some(c), None)    => Ok(KeyAction::Char(c)),
                    (Some(_), Some(_)) => Err(LayoutError::UnsupportedLabel(label.to_string())),
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeyDefinition
// ════════════════════════════════════════════════════════════════════════════

/// One entry of the static layout table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDefinition {
    pub label:            String,
    pub row:              u32,
    pub column:           u32,
    pub width_multiplier: u32,
    pub action:           KeyAction,
}

impl KeyDefinition {
    pub fn new(label: &str, row: u32, column: u32, width_multiplier: u32) -> Result<Self, LayoutError> {
        let action = KeyAction::from_label(label)?;
        if width_multiplier == 0 {
            return Err(LayoutError::ZeroWidth(label.to_string()));
        }
        Ok(KeyDefinition {
            label: label.to_string(),
            row,
            column,
            width_multiplier,
            action,
        })
    }
}

/// Index of a key inside its [`Layout`], in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub usize);

// ════════════════════════════════════════════════════════════════════════════
// Rect
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned pixel rectangle.  `contains` treats all edges as inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x:      i32,
    pub y:      i32,
    pub width:  i32,
    pub height: i32,
}

impl Rect {
    pub fn right(&self)  -> i32 { self.x + self.width }
    pub fn bottom(&self) -> i32 { self.y + self.height }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        self.x <= px && px <= self.right() && self.y <= py && py <= self.bottom()
    }

    /// True if the two rectangles share at least one point.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.right() && other.x <= self.right()
            && self.y <= other.bottom() && other.y <= self.bottom()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LayoutGeometry
// ════════════════════════════════════════════════════════════════════════════

/// Grid origin, base key size and spacing, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutGeometry {
    pub start_x:    i32,
    pub start_y:    i32,
    pub key_width:  i32,
    pub key_height: i32,
    pub gap:        i32,
}

impl Default for LayoutGeometry {
    fn default() -> Self {
        LayoutGeometry {
            start_x:    50,
            start_y:    350,   // leaves room for the typed-text band
            key_width:  60,
            key_height: 60,
            gap:        5,
        }
    }
}

impl LayoutGeometry {
    pub fn rect_for(&self, key: &KeyDefinition) -> Rect {
        Rect {
            x:      self.start_x + key.column as i32 * (self.key_width + self.gap),
            y:      self.start_y + key.row as i32 * (self.key_height + self.gap),
            width:  self.key_width * key.width_multiplier as i32,
            height: self.key_height,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Layout
// ════════════════════════════════════════════════════════════════════════════

/// Result of a successful hit test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub id:   KeyId,
    pub rect: Rect,
}

/// An immutable, validated key table with pre-resolved rectangles.
#[derive(Clone, Debug)]
pub struct Layout {
    geometry: LayoutGeometry,
    keys:     Vec<KeyDefinition>,
    rects:    Vec<Rect>,
}

/// The default QWERTY table.  Bottom-row columns advance by each key's width
/// so the wide keys sit side by side.
const QWERTY_ROWS: [&[(&str, u32, u32)]; 4] = [
    &[("Q", 0, 1), ("W", 1, 1), ("E", 2, 1), ("R", 3, 1), ("T", 4, 1),
      ("Y", 5, 1), ("U", 6, 1), ("I", 7, 1), ("O", 8, 1), ("P", 9, 1)],
    &[("A", 0, 1), ("S", 1, 1), ("D", 2, 1), ("F", 3, 1), ("G", 4, 1),
      ("H", 5, 1), ("J", 6, 1), ("K", 7, 1), ("L", 8, 1), (";", 9, 1)],
    &[("Z", 0, 1), ("X", 1, 1), ("C", 2, 1), ("V", 3, 1), ("B", 4, 1),
      ("N", 5, 1), ("M", 6, 1), (",", 7, 1), (".", 8, 1), ("/", 9, 1)],
    &[("SPACE", 0, 4), ("ENTER", 4, 2), ("BACK", 6, 2), ("EXIT", 8, 2)],
];

impl Layout {
    /// Build a layout.  Keys are stored in row-major order regardless of the
    /// order given.  Overlapping rectangles are allowed but logged; the
    /// row-major first-match rule decides which key such a point selects.
    pub fn new(geometry: LayoutGeometry, mut keys: Vec<KeyDefinition>) -> Result<Self, LayoutError> {
        keys.sort_by_key(|k| (k.row, k.column));

        let mut labels = HashSet::new();
        let mut cells  = HashSet::new();
        for key in &keys {
            if !labels.insert(key.label.as_str()) {
                return Err(LayoutError::DuplicateLabel(key.label.clone()));
            }
            if !cells.insert((key.row, key.column)) {
                return Err(LayoutError::DuplicateCell { row: key.row, column: key.column });
            }
        }

        let rects: Vec<Rect> = keys.iter().map(|k| geometry.rect_for(k)).collect();

        for (i, a) in rects.iter().enumerate() {
            for (j, b) in rects.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    log::warn!(
                        "layout keys {:?} and {:?} overlap; {:?} wins on shared points",
                        keys[i].label, keys[j].label, keys[i].label
                    );
                }
            }
        }

        Ok(Layout { geometry, keys, rects })
    }

    /// The standard four-row layout with SPACE, ENTER, BACK and EXIT.
    pub fn qwerty(geometry: LayoutGeometry) -> Result<Self, LayoutError> {
        let mut keys = Vec::new();
        for (row, entries) in QWERTY_ROWS.iter().enumerate() {
            for &(label, column, width) in entries.iter() {
                keys.push(KeyDefinition::new(label, row as u32, column, width)?);
            }
        }
        Self::new(geometry, keys)
    }

    /// Return the first key (row-major) whose rectangle contains the point.
    pub fn key_at(&self, px: i32, py: i32) -> Option<Hit> {
        self.rects.iter()
            .position(|r| r.contains(px, py))
            .map(|i| Hit { id: KeyId(i), rect: self.rects[i] })
    }

    pub fn key(&self, id: KeyId) -> &KeyDefinition { &self.keys[id.0] }
    pub fn rect(&self, id: KeyId) -> Rect           { self.rects[id.0] }
    pub fn geometry(&self) -> &LayoutGeometry       { &self.geometry }
    pub fn len(&self) -> usize                      { self.keys.len() }
    pub fn is_empty(&self) -> bool                  { self.keys.is_empty() }

    /// Look a key up by its label.
    pub fn find(&self, label: &str) -> Option<KeyId> {
        self.keys.iter().position(|k| k.label == label).map(KeyId)
    }

    /// All keys in row-major order with their rectangles.
    pub fn iter(&self) -> impl Iterator<Item = (KeyId, &KeyDefinition, Rect)> + '_ {
        self.keys.iter()
            .zip(self.rects.iter())
            .enumerate()
            .map(|(i, (k, r))| (KeyId(i), k, *r))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn qwerty() -> Layout {
        Layout::qwerty(LayoutGeometry::default()).unwrap()
    }

    // ── labels ───────────────────────────────────────────────────────────
    #[test]
    fn named_labels_resolve() {
        assert_eq!(KeyAction::from_label("SPACE"), Ok(KeyAction::Space));
        assert_eq!(KeyAction::from_label("ENTER"), Ok(KeyAction::Enter));
        assert_eq!(KeyAction::from_label("BACK"),  Ok(KeyAction::Back));
        assert_eq!(KeyAction::from_label("EXIT"),  Ok(KeyAction::Exit));
        assert_eq!(KeyAction::from_label(";"),     Ok(KeyAction::Char(';')));
    }

    #[test]
    fn bad_labels_rejected() {
        assert_eq!(KeyAction::from_label(""), Err(LayoutError::EmptyLabel));
        assert!(matches!(
            KeyAction::from_label("TAB"),
            Err(LayoutError::UnsupportedLabel(_))
        ));
        assert!(matches!(
            KeyDefinition::new("A", 0, 0, 0),
            Err(LayoutError::ZeroWidth(_))
        ));
    }

    #[test]
    fn duplicates_rejected() {
        let g = LayoutGeometry::default();
        let dup_label = vec![
            KeyDefinition::new("A", 0, 0, 1).unwrap(),
            KeyDefinition::new("A", 0, 1, 1).unwrap(),
        ];
        assert_eq!(
            Layout::new(g, dup_label).unwrap_err(),
            LayoutError::DuplicateLabel("A".into())
        );
        let dup_cell = vec![
            KeyDefinition::new("A", 1, 2, 1).unwrap(),
            KeyDefinition::new("B", 1, 2, 1).unwrap(),
        ];
        assert_eq!(
            Layout::new(g, dup_cell).unwrap_err(),
            LayoutError::DuplicateCell { row: 1, column: 2 }
        );
    }

    // ── geometry ─────────────────────────────────────────────────────────
    #[test]
    fn key_a_rect() {
        let l = qwerty();
        let a = l.find("A").unwrap();
        assert_eq!(l.rect(a), Rect { x: 50, y: 415, width: 60, height: 60 });
        let q = l.find("Q").unwrap();
        assert_eq!(l.rect(q), Rect { x: 50, y: 350, width: 60, height: 60 });
    }

    #[test]
    fn wide_keys() {
        let l = qwerty();
        assert_eq!(l.rect(l.find("SPACE").unwrap()).width, 240);
        assert_eq!(l.rect(l.find("ENTER").unwrap()).width, 120);
        assert_eq!(l.rect(l.find("BACK").unwrap()).width,  120);
        assert_eq!(l.rect(l.find("EXIT").unwrap()).width,  120);
    }

    #[test]
    fn default_layout_has_no_overlaps() {
        let l = qwerty();
        let rects: Vec<Rect> = l.iter().map(|(_, _, r)| r).collect();
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn keys_stored_row_major() {
        let g = LayoutGeometry::default();
        let l = Layout::new(g, vec![
            KeyDefinition::new("B", 1, 0, 1).unwrap(),
            KeyDefinition::new("Z", 0, 1, 1).unwrap(),
            KeyDefinition::new("A", 0, 0, 1).unwrap(),
        ]).unwrap();
        let order: Vec<&str> = l.iter().map(|(_, k, _)| k.label.as_str()).collect();
        assert_eq!(order, ["A", "Z", "B"]);
    }

    // ── hit testing ──────────────────────────────────────────────────────
    #[test]
    fn edges_are_inclusive() {
        let l = qwerty();
        let q = l.find("Q").unwrap();
        assert_eq!(l.key_at(50, 350).map(|h| h.id),  Some(q));
        assert_eq!(l.key_at(110, 410).map(|h| h.id), Some(q));
        assert_eq!(l.key_at(49, 350), None);
        assert_eq!(l.key_at(50, 349), None);
    }

    #[test]
    fn gap_between_keys_is_empty() {
        let l = qwerty();
        // Q ends at x=110, W starts at x=115.
        for x in 111..115 {
            assert_eq!(l.key_at(x, 380), None, "x={}", x);
        }
        // Row 0 ends at y=410, row 1 starts at y=415.
        for y in 411..415 {
            assert_eq!(l.key_at(80, y), None, "y={}", y);
        }
    }

    #[test]
    fn outside_everything_is_none() {
        let l = qwerty();
        assert_eq!(l.key_at(0, 0), None);
        assert_eq!(l.key_at(1279, 719), None);
        assert_eq!(l.key_at(-5, 400), None);
    }

    #[test]
    fn hit_reports_rect() {
        let l = qwerty();
        let hit = l.key_at(60, 360).unwrap();
        assert_eq!(l.key(hit.id).label, "Q");
        assert_eq!(hit.rect, Rect { x: 50, y: 350, width: 60, height: 60 });
    }

    #[test]
    fn overlap_resolved_row_major() {
        // SPACE (×4) spans x=50..290, ENTER on column 3 spans x=245..365.
        let g = LayoutGeometry::default();
        let l = Layout::new(g, vec![
            KeyDefinition::new("ENTER", 3, 3, 2).unwrap(),
            KeyDefinition::new("SPACE", 3, 0, 4).unwrap(),
        ]).unwrap();
        let enter = l.find("ENTER").unwrap();
        let y = l.rect(enter).center().1;
        let hit = l.key_at(260, y).unwrap();
        assert_eq!(l.key(hit.id).label, "SPACE");
        // Past SPACE's right edge ENTER is reachable.
        let hit = l.key_at(300, y).unwrap();
        assert_eq!(hit.id, enter);
    }

    proptest! {
        #[test]
        fn every_center_hits_its_key(idx in 0usize..34) {
            let l = qwerty();
            prop_assume!(idx < l.len());
            let id = KeyId(idx);
            let (cx, cy) = l.rect(id).center();
            prop_assert_eq!(l.key_at(cx, cy).map(|h| h.id), Some(id));
        }

        #[test]
        fn hit_always_contains_point(px in -100i32..1400, py in -100i32..800) {
            let l = qwerty();
            match l.key_at(px, py) {
                Some(hit) => {
                    prop_assert!(hit.rect.contains(px, py));
                    // No earlier key in row-major order also contains it.
                    for (id, _, r) in l.iter().take(hit.id.0) {
                        prop_assert!(!r.contains(px, py), "earlier key {:?}", id);
                    }
                }
                None => {
                    for (_, _, r) in l.iter() {
                        prop_assert!(!r.contains(px, py));
                    }
                }
            }
        }
    }
}
