use glam::Vec2;
use rustc_hash::FxHashMap;

use super::event::PointerId;

/// Active pointer contacts in arrival order with their last positions.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    order: Vec<PointerId>,
    positions: FxHashMap<PointerId, Vec2>,
}

impl PointerTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new contact. Re-adding a known id only moves it.
    pub fn add_contact(&mut self, id: PointerId, position: Vec2) {
        if !self.order.contains(&id) {
            self.order.push(id);
        }
        let _ = self.positions.insert(id, position);
    }

    /// Record a new position for a known contact. Unknown ids are ignored.
    pub fn update_contact(&mut self, id: PointerId, position: Vec2) {
        if let Some(slot) = self.positions.get_mut(&id) {
            *slot = position;
        }
    }

    /// Forget a contact. Returns false if it was not tracked.
    pub fn remove_contact(&mut self, id: PointerId) -> bool {
        let _ = self.positions.remove(&id);
        let Some(index) = self.order.iter().position(|&p| p == id) else {
            return false;
        };
        let _ = self.order.remove(index);
        true
    }

    /// Position of the contact that is not `excluding`. Only defined while
    /// exactly two contacts are active.
    #[must_use]
    pub fn second_contact_position(&self, excluding: PointerId) -> Option<Vec2> {
        if self.order.len() != 2 {
            return None;
        }
        let other = if self.order[0] == excluding {
            self.order[1]
        } else {
            self.order[0]
        };
        self.positions.get(&other).copied()
    }

    /// Number of active contacts.
    #[must_use]
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// True when no contact is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True when `id` is an active contact.
    #[must_use]
    pub fn contains(&self, id: PointerId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Last known position of `id`.
    #[must_use]
    pub fn position(&self, id: PointerId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    /// Active contact ids in arrival order.
    #[must_use]
    pub fn ids(&self) -> &[PointerId] {
        &self.order
    }

    /// Midpoint of the two active contacts.
    #[must_use]
    pub fn midpoint(&self) -> Option<Vec2> {
        let (a, b) = self.pair()?;
        Some((a + b) * 0.5)
    }

    /// Distance between the two active contacts.
    #[must_use]
    pub fn spread(&self) -> Option<f32> {
        let (a, b) = self.pair()?;
        Some(a.distance(b))
    }

    /// Single contact position, or the midpoint of two.
    #[must_use]
    pub fn centroid(&self) -> Option<Vec2> {
        match self.order.as_slice() {
            [only] => self.position(*only),
            [_, _] => self.midpoint(),
            _ => None,
        }
    }

    fn pair(&self) -> Option<(Vec2, Vec2)> {
        let [first, second] = self.order.as_slice() else {
            return None;
        };
        Some((self.position(*first)?, self.position(*second)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contacts_keep_arrival_order() {
        let mut tracker = PointerTracker::new();
        tracker.add_contact(PointerId(7), Vec2::new(1.0, 1.0));
        tracker.add_contact(PointerId(3), Vec2::new(5.0, 1.0));
        assert_eq!(tracker.ids(), &[PointerId(7), PointerId(3)]);

        tracker.update_contact(PointerId(3), Vec2::new(9.0, 1.0));
        assert_eq!(tracker.position(PointerId(3)), Some(Vec2::new(9.0, 1.0)));
        assert_eq!(tracker.midpoint(), Some(Vec2::new(5.0, 1.0)));
        assert_eq!(tracker.spread(), Some(8.0));
    }

    #[test]
    fn removing_unknown_contact_is_noop() {
        let mut tracker = PointerTracker::new();
        tracker.add_contact(PointerId(1), Vec2::ZERO);
        assert!(!tracker.remove_contact(PointerId(42)));
        assert_eq!(tracker.count(), 1);
        assert!(tracker.remove_contact(PointerId(1)));
        assert!(tracker.is_empty());
        assert!(!tracker.remove_contact(PointerId(1)));
    }

    #[test]
    fn update_ignores_unknown_contact() {
        let mut tracker = PointerTracker::new();
        tracker.update_contact(PointerId(1), Vec2::ONE);
        assert!(!tracker.contains(PointerId(1)));
        assert!(tracker.is_empty());
    }

    #[test]
    fn second_contact_requires_exactly_two() {
        let mut tracker = PointerTracker::new();
        tracker.add_contact(PointerId(1), Vec2::new(0.0, 0.0));
        assert_eq!(tracker.second_contact_position(PointerId(1)), None);

        tracker.add_contact(PointerId(2), Vec2::new(4.0, 0.0));
        assert_eq!(
            tracker.second_contact_position(PointerId(1)),
            Some(Vec2::new(4.0, 0.0))
        );
        assert_eq!(
            tracker.second_contact_position(PointerId(2)),
            Some(Vec2::new(0.0, 0.0))
        );

        tracker.add_contact(PointerId(3), Vec2::new(8.0, 0.0));
        assert_eq!(tracker.second_contact_position(PointerId(1)), None);
        assert_eq!(tracker.centroid(), None);
    }
}
