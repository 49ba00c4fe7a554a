//! Booking dialog state machine.
//!
//! ```text
//! closed ──open_generic──▶ open(none)
//! closed ──open_for(p)───▶ open(p)
//! open   ──close─────────▶ closed
//! ```
//!
//! Opening while already open replaces the subject. Whether a booking link
//! is configured is the caller's concern; the dialog opens either way.

use crate::catalog::Product;

/// State of the booking dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookingState {
    #[default]
    Closed,
    /// Open, optionally for a specific product.
    Open(Option<Product>),
}

/// Tracks which product, if any, a booking request is about.
#[derive(Debug, Clone, Default)]
pub struct BookingCoordinator {
    state: BookingState,
}

impl BookingCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog without a product ("Book now").
    pub fn open_generic(&mut self) {
        self.state = BookingState::Open(None);
    }

    /// Open the dialog for `product` ("Book a fitting" on a card).
    pub fn open_for(&mut self, product: Product) {
        self.state = BookingState::Open(Some(product));
    }

    pub fn close(&mut self) {
        self.state = BookingState::Closed;
    }

    #[must_use]
    pub const fn state(&self) -> &BookingState {
        &self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, BookingState::Open(_))
    }

    /// The subject of the open dialog.
    #[must_use]
    pub const fn product(&self) -> Option<&Product> {
        match &self.state {
            BookingState::Open(Some(product)) => Some(product),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::Catalog;

    fn gown() -> Product {
        Catalog::from_json(&json!([{"id": "1", "name": "Aria Gown", "price": 120}]))
            .unwrap()
            .catalog
            .get("1")
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_starts_closed() {
        let booking = BookingCoordinator::new();
        assert_eq!(booking.state(), &BookingState::Closed);
        assert!(!booking.is_open());
        assert!(booking.product().is_none());
    }

    #[test]
    fn test_open_generic_then_close() {
        let mut booking = BookingCoordinator::new();
        booking.open_generic();
        assert_eq!(booking.state(), &BookingState::Open(None));
        booking.close();
        assert_eq!(booking.state(), &BookingState::Closed);
    }

    #[test]
    fn test_open_for_product() {
        let mut booking = BookingCoordinator::new();
        booking.open_for(gown());
        assert!(booking.is_open());
        assert_eq!(booking.product().unwrap().name, "Aria Gown");
    }

    #[test]
    fn test_reopen_replaces_subject() {
        let mut booking = BookingCoordinator::new();
        booking.open_for(gown());
        booking.open_generic();
        assert_eq!(booking.state(), &BookingState::Open(None));
    }
}
