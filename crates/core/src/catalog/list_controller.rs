//! Product list screen: fetch, search, paging and two-phase delete.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::list_view::{filter_by_name, page_count, page_slice};
use crate::config::CatalogConfig;
use crate::errors::{Error, Result};
use crate::navigation::{Navigator, Route};
use crate::notices::{OperationState, TransientNotice};
use crate::products::{ProductGatewayTrait, ProductItem};

pub const LOAD_ERROR_MESSAGE: &str = "Products could not be loaded";
pub const DELETE_SUCCESS_MESSAGE: &str = "Product deleted successfully";
pub const DELETE_ERROR_MESSAGE: &str = "An error occurred while deleting the product";

/// Lifecycle of the product snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Identifies one list fetch. Only the most recent ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

pub struct ProductListController {
    gateway: Arc<dyn ProductGatewayTrait>,
    navigator: Arc<dyn Navigator>,
    products: Vec<ProductItem>,
    load_state: LoadState,
    generation: u64,
    search_term: String,
    page_size: usize,
    page: usize,
    pending_delete: Option<ProductItem>,
    notice: TransientNotice,
}

impl ProductListController {
    pub fn new(
        gateway: Arc<dyn ProductGatewayTrait>,
        navigator: Arc<dyn Navigator>,
        config: &CatalogConfig,
    ) -> Self {
        Self {
            gateway,
            navigator,
            products: Vec::new(),
            load_state: LoadState::Idle,
            generation: 0,
            search_term: String::new(),
            page_size: config.page_size.max(1),
            page: 0,
            pending_delete: None,
            notice: TransientNotice::new(config.notice_delay),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fetching
    // ─────────────────────────────────────────────────────────────────────────

    /// Screen became visible: load the collection.
    pub async fn activate(&mut self) {
        self.refresh().await;
    }

    /// Screen is going away: in-flight fetches are ignored and timers stop.
    pub fn deactivate(&mut self) {
        self.generation += 1;
        if self.load_state == LoadState::Loading {
            self.load_state = LoadState::Idle;
        }
        self.notice.cancel_timer();
    }

    /// Start a fetch, superseding any fetch still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        FetchTicket(self.generation)
    }

    /// Apply a fetch result. Returns false when the ticket is stale and the
    /// result was dropped.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<ProductItem>>) -> bool {
        if ticket.0 != self.generation {
            debug!(
                "Discarding stale product fetch (ticket {}, current {})",
                ticket.0, self.generation
            );
            return false;
        }

        match result {
            Ok(products) => {
                debug!("Loaded {} products", products.len());
                self.products = products;
                self.load_state = LoadState::Ready;
                self.clamp_page();
            }
            Err(err) => {
                warn!("Failed to load products: {}", err);
                self.load_state = LoadState::Failed;
            }
        }
        true
    }

    /// Replace the snapshot with a fresh copy from the gateway.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.gateway.list_products().await;
        self.finish_fetch(ticket, result);
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Whether to render the loading placeholder.
    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn load_error(&self) -> Option<&'static str> {
        (self.load_state == LoadState::Failed).then_some(LOAD_ERROR_MESSAGE)
    }

    pub fn products(&self) -> &[ProductItem] {
        &self.products
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search & paging
    // ─────────────────────────────────────────────────────────────────────────

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Filter by name over the full snapshot, starting again from page one.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 0;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn page_count(&self) -> usize {
        page_count(self.result_count(), self.page_size)
    }

    fn clamp_page(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
    }

    /// Products matching the search term.
    pub fn result_count(&self) -> usize {
        filter_by_name(&self.products, &self.search_term).len()
    }

    /// The rows to render: matches for the search term, current page only.
    pub fn visible_products(&self) -> Vec<&ProductItem> {
        let matches = filter_by_name(&self.products, &self.search_term);
        page_slice(&matches, self.page, self.page_size).to_vec()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn add_product(&self) {
        self.navigator.navigate(Route::Add);
    }

    pub fn edit_product(&self, product: &ProductItem) {
        self.navigator.navigate(Route::Edit(product.clone()));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Delete
    // ─────────────────────────────────────────────────────────────────────────

    /// Open the confirmation prompt for `product`.
    pub fn request_delete(&mut self, product: &ProductItem) {
        self.pending_delete = Some(product.clone());
    }

    pub fn pending_delete(&self) -> Option<&ProductItem> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the pending product, then reload the list whatever the outcome.
    ///
    /// Gateway failures are reported through [`status`](Self::status), not the
    /// returned result; the result only fails when nothing was pending.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let product = self.pending_delete.take().ok_or(Error::NoPendingDelete)?;

        self.notice.pending();
        match self.gateway.delete_product(&product.id).await {
            Ok(()) => {
                info!("Deleted product '{}'", product.id);
                self.notice
                    .show(OperationState::Succeeded(DELETE_SUCCESS_MESSAGE.to_string()));
            }
            Err(err) => {
                warn!("Failed to delete product '{}': {}", product.id, err);
                self.notice
                    .show(OperationState::Failed(DELETE_ERROR_MESSAGE.to_string()));
            }
        }

        self.refresh().await;
        Ok(())
    }

    pub fn status(&self) -> OperationState {
        self.notice.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.notice.subscribe()
    }
}
