//! Hit-testing index for checkable items.
//!
//! The presentation layer reports every checkable item together with its
//! bounds whenever the layout changes. The registry indexes them by checklist
//! key and by the bounds of their parent container, and is always rebuilt in
//! full.

use crate::objective::ObjectiveKey;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle. The right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Checks whether a point lies inside.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Grows the rectangle by `horizontal` and `vertical` on each side.
    #[must_use]
    pub const fn inflate(self, horizontal: i32, vertical: i32) -> Self {
        Self::new(
            self.x - horizontal,
            self.y - vertical,
            self.width + horizontal * 2,
            self.height + vertical * 2,
        )
    }
}

/// One checkable item reported by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckableItem {
    /// Checklist key toggled by this item.
    pub key: String,
    /// Objective shown by this item, if any.
    pub objective: Option<ObjectiveKey>,
    /// Bounds of the containing control, used as a coarse bucket.
    pub parent_bounds: Rect,
    /// Area that reacts to the pointer.
    pub check_bounds: Rect,
}

impl CheckableItem {
    /// Creates an item for an objective, keyed by its checklist key.
    #[must_use]
    pub fn for_objective(objective: ObjectiveKey, parent_bounds: Rect, check_bounds: Rect) -> Self {
        Self {
            key: objective.checklist_key(),
            objective: Some(objective),
            parent_bounds,
            check_bounds,
        }
    }
}

/// Key and bounds indexes over the current checkable items.
#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    items: Vec<CheckableItem>,
    by_key: AHashMap<String, usize>,
    buckets: Vec<(Rect, Vec<usize>)>,
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every item and rebuilds both indexes.
    pub fn rebuild(&mut self, items: Vec<CheckableItem>) {
        self.items = items;
        self.rebuild_key_lookups();
        self.rebuild_bounds_lookups();
    }

    fn rebuild_key_lookups(&mut self) {
        self.by_key.clear();
        for (slot, item) in self.items.iter().enumerate() {
            if item.objective.is_some() {
                self.by_key.insert(item.key.clone(), slot);
            }
        }
    }

    fn rebuild_bounds_lookups(&mut self) {
        let mut bucket_of: AHashMap<Rect, usize> = AHashMap::new();
        self.buckets.clear();
        for (slot, item) in self.items.iter().enumerate() {
            let bucket = *bucket_of.entry(item.parent_bounds).or_insert_with(|| {
                self.buckets.push((item.parent_bounds, Vec::new()));
                self.buckets.len() - 1
            });
            self.buckets[bucket].1.push(slot);
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct parent-bounds buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Looks up an objective item by checklist key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CheckableItem> {
        self.by_key.get(key).map(|&slot| &self.items[slot])
    }

    /// Item at a slot returned by [`Self::hit_slot`].
    #[must_use]
    pub fn item(&self, slot: usize) -> Option<&CheckableItem> {
        self.items.get(slot)
    }

    /// Slot of the item under the pointer.
    ///
    /// Buckets are searched in the order they were first seen; within a
    /// bucket the first item whose check bounds contain the point wins.
    #[must_use]
    pub fn hit_slot(&self, point: Point) -> Option<usize> {
        self.buckets
            .iter()
            .filter(|(bounds, _)| bounds.contains(point))
            .flat_map(|(_, slots)| slots.iter().copied())
            .find(|&slot| self.items[slot].check_bounds.contains(point))
    }

    /// Finds the item under the pointer.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&CheckableItem> {
        self.hit_slot(point).map(|slot| &self.items[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_state::CriterionKey;

    fn advancement(id: &str, parent: Rect, check: Rect) -> CheckableItem {
        CheckableItem::for_objective(ObjectiveKey::Advancement(id.to_string()), parent, check)
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10, 10, 5, 5);
        assert!(rect.contains(Point::new(10, 10)));
        assert!(rect.contains(Point::new(14, 14)));
        assert!(!rect.contains(Point::new(15, 10)));
        assert!(!rect.contains(Point::new(10, 15)));
        assert!(!rect.contains(Point::new(9, 12)));
    }

    #[test]
    fn test_rect_inflate() {
        assert_eq!(Rect::new(10, 10, 4, 4).inflate(3, 3), Rect::new(7, 7, 10, 10));
    }

    #[test]
    fn test_hit_test_uses_check_bounds() {
        let panel = Rect::new(0, 0, 100, 100);
        let mut registry = CheckRegistry::new();
        registry.rebuild(vec![
            advancement("minecraft:story/root", panel, Rect::new(0, 0, 10, 10)),
            advancement("minecraft:story/mine_stone", panel, Rect::new(20, 0, 10, 10)),
        ]);

        let hit = registry.hit_test(Point::new(25, 5)).expect("hit");
        assert_eq!(hit.key, "minecraft:story/mine_stone");
        assert!(registry.hit_test(Point::new(15, 5)).is_none());
        assert!(registry.hit_test(Point::new(150, 5)).is_none());
    }

    #[test]
    fn test_hit_slot_distinguishes_duplicate_keys() {
        let mut registry = CheckRegistry::new();
        registry.rebuild(vec![
            advancement("dup", Rect::new(0, 0, 50, 50), Rect::new(0, 0, 10, 10)),
            advancement("dup", Rect::new(100, 0, 50, 50), Rect::new(100, 0, 10, 10)),
        ]);

        let first = registry.hit_slot(Point::new(5, 5)).expect("hit");
        let second = registry.hit_slot(Point::new(105, 5)).expect("hit");
        assert_ne!(first, second);
        assert_eq!(
            registry.item(first).map(|i| i.check_bounds),
            Some(Rect::new(0, 0, 10, 10))
        );
        assert!(registry.item(99).is_none());
    }

    #[test]
    fn test_buckets_group_by_parent() {
        let left = Rect::new(0, 0, 50, 50);
        let right = Rect::new(50, 0, 50, 50);
        let mut registry = CheckRegistry::new();
        registry.rebuild(vec![
            advancement("a", left, Rect::new(0, 0, 10, 10)),
            advancement("b", right, Rect::new(50, 0, 10, 10)),
            advancement("c", left, Rect::new(10, 0, 10, 10)),
        ]);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.bucket_count(), 2);
        assert_eq!(registry.hit_test(Point::new(55, 5)).map(|i| i.key.as_str()), Some("b"));
    }

    #[test]
    fn test_rebuild_replaces_everything() {
        let panel = Rect::new(0, 0, 10, 10);
        let mut registry = CheckRegistry::new();
        registry.rebuild(vec![advancement("old", panel, panel)]);
        registry.rebuild(vec![CheckableItem::for_objective(
            ObjectiveKey::Criterion(CriterionKey::new("owner", "crit")),
            panel,
            panel,
        )]);

        assert!(registry.get("old").is_none());
        assert!(registry.get("ownercrit").is_some());
        assert_eq!(registry.bucket_count(), 1);
    }

    #[test]
    fn test_items_without_objective_not_keyed() {
        let panel = Rect::new(0, 0, 10, 10);
        let mut registry = CheckRegistry::new();
        registry.rebuild(vec![CheckableItem {
            key: "decoration".to_string(),
            objective: None,
            parent_bounds: panel,
            check_bounds: panel,
        }]);

        assert!(registry.get("decoration").is_none());
        assert!(registry.hit_test(Point::new(1, 1)).is_some());
    }
}
