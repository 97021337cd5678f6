//! Case-insensitive substring search over view models.
//!
//! A record matches when any of its indexed fields contains the search term,
//! ignoring case. Filtering is stable: matches come back in input order, as
//! references to the input elements. An empty term matches everything.

use crate::model::{Order, Product, StockMovement};

/// A record with text fields a user can search by.
pub trait Searchable {
    /// The fields the search term is matched against.
    fn search_fields(&self) -> impl Iterator<Item = &str>;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        (**self).search_fields()
    }
}

/// Products are searched by name and code.
impl Searchable for Product {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.code.as_str()].into_iter()
    }
}

/// Orders are searched by order number, customer phone and customer name.
impl Searchable for Order {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.order_number.as_str()),
            Some(self.customer_phone.as_str()),
            self.customer_name.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Movements are searched by product name and reason.
impl Searchable for StockMovement {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.product_name.as_deref(), Some(self.reason.as_str())]
            .into_iter()
            .flatten()
    }
}

/// Whether `item` matches `term`.
#[must_use]
pub fn matches<T: Searchable + ?Sized>(item: &T, term: &str) -> bool {
    term.is_empty() || contains_lowercase(item, &term.to_lowercase())
}

/// Keep the items matching `term`, in input order.
#[must_use]
pub fn filter<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    if term.is_empty() {
        return items.iter().collect();
    }
    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|item| contains_lowercase(*item, &needle))
        .collect()
}

fn contains_lowercase<T: Searchable + ?Sized>(item: &T, needle: &str) -> bool {
    item.search_fields()
        .any(|field| field.to_lowercase().contains(needle))
}
