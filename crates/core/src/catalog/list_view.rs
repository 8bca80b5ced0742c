//! Pure search and paging over a product snapshot.

use crate::products::ProductItem;

/// Case-insensitive substring match on the product name. The term is used
/// as typed; only the empty term matches everything.
pub fn matches_search(product: &ProductItem, term: &str) -> bool {
    term.is_empty() || product.name.to_lowercase().contains(&term.to_lowercase())
}

pub fn filter_by_name<'a>(products: &'a [ProductItem], term: &str) -> Vec<&'a ProductItem> {
    products
        .iter()
        .filter(|product| matches_search(product, term))
        .collect()
}

/// Number of pages for `total` items; an empty list still has one page.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// The `page`-th window of `page_size` items, empty past the end.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
