//! Per-session reservation cart
//!
//! Purely in-memory state scoped to one session: a mapping from item id to
//! requested quantity, insertion-ordered for display. Nothing here touches
//! the database; callers pass in the item snapshot they just fetched, and
//! every line is re-validated again at checkout time.

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use super::item::Item;

/// One cart line as shown to the user
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLine {
    pub item_id: i32,
    pub quantity: i32,
}

/// Reservation cart. Quantities default to 1 and are clamped into
/// `[1, available]` against the most recently seen item state.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: IndexMap<i32, i32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item with quantity 1. Silent no-op when the item is already
    /// present, has no available units, or its manual state disqualifies it.
    pub fn add(&mut self, item: &Item) {
        if self.lines.contains_key(&item.id) || !item.borrowable() {
            return;
        }
        self.lines.insert(item.id, 1);
    }

    /// Remove a line. No error if absent.
    pub fn remove(&mut self, item_id: i32) {
        self.lines.shift_remove(&item_id);
    }

    /// Set the requested quantity for a line already in the cart, clamped
    /// into `[1, available]`. When availability has dropped below the stored
    /// quantity since the line was added, the stored value is re-clamped
    /// down, never up.
    pub fn set_quantity(&mut self, item: &Item, quantity: i32) {
        if let Some(stored) = self.lines.get_mut(&item.id) {
            *stored = quantity.clamp(1, item.available().max(1));
        }
    }

    /// Re-clamp a stored line against a fresh item snapshot without raising it.
    pub fn reclamp(&mut self, item: &Item) {
        if let Some(stored) = self.lines.get_mut(&item.id) {
            if *stored > item.available() {
                *stored = item.available().max(1);
            }
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn quantity_of(&self, item_id: i32) -> Option<i32> {
        self.lines.get(&item_id).copied()
    }

    /// Lines in insertion order
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines
            .iter()
            .map(|(&item_id, &quantity)| CartLine { item_id, quantity })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{Category, ItemState};

    fn item(id: i32, total: i32, borrowed: i32, state: ItemState) -> Item {
        Item {
            id,
            name: format!("Item {}", id),
            category: Category::Tools as i16,
            location: None,
            total_quantity: total,
            borrowed_quantity: borrowed,
            state: state as i16,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn add_defaults_to_one() {
        let mut cart = Cart::new();
        cart.add(&item(1, 5, 0, ItemState::Normal));
        assert_eq!(cart.quantity_of(1), Some(1));
    }

    #[test]
    fn add_is_noop_when_already_present() {
        let mut cart = Cart::new();
        let it = item(1, 5, 0, ItemState::Normal);
        cart.add(&it);
        cart.set_quantity(&it, 3);
        cart.add(&it);
        assert_eq!(cart.quantity_of(1), Some(3));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn add_is_noop_when_out_of_stock() {
        // Scenario B: available == 0 means the cart stays empty
        let mut cart = Cart::new();
        cart.add(&item(1, 5, 5, ItemState::Normal));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_is_noop_when_state_disqualifies() {
        let mut cart = Cart::new();
        cart.add(&item(1, 5, 0, ItemState::UnderRepair));
        cart.add(&item(2, 5, 0, ItemState::Retired));
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_clamps_into_range() {
        let mut cart = Cart::new();
        let it = item(1, 5, 2, ItemState::Normal);
        cart.add(&it);

        cart.set_quantity(&it, 99);
        assert_eq!(cart.quantity_of(1), Some(3));

        cart.set_quantity(&it, 0);
        assert_eq!(cart.quantity_of(1), Some(1));

        cart.set_quantity(&it, -4);
        assert_eq!(cart.quantity_of(1), Some(1));
    }

    #[test]
    fn set_quantity_ignores_absent_lines() {
        let mut cart = Cart::new();
        cart.set_quantity(&item(1, 5, 0, ItemState::Normal), 2);
        assert!(cart.is_empty());
    }

    #[test]
    fn reclamp_moves_down_never_up() {
        let mut cart = Cart::new();
        let before = item(1, 5, 0, ItemState::Normal);
        cart.add(&before);
        cart.set_quantity(&before, 4);

        // Another borrower took 3 units in the meantime
        let after = item(1, 5, 3, ItemState::Normal);
        cart.reclamp(&after);
        assert_eq!(cart.quantity_of(1), Some(2));

        // Availability recovering does not raise the stored quantity
        cart.reclamp(&before);
        assert_eq!(cart.quantity_of(1), Some(2));
    }

    #[test]
    fn remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&item(1, 5, 0, ItemState::Normal));
        cart.add(&item(2, 5, 0, ItemState::Normal));

        cart.remove(99); // absent: no error
        cart.remove(1);
        assert_eq!(cart.len(), 1);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn lines_preserve_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&item(3, 5, 0, ItemState::Normal));
        cart.add(&item(1, 5, 0, ItemState::Normal));
        cart.add(&item(2, 5, 0, ItemState::Normal));

        let ids: Vec<i32> = cart.lines().iter().map(|l| l.item_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
