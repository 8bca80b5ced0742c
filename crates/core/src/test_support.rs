//! In-memory gateway and navigator doubles for unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::navigation::{Navigator, Route};
use crate::products::{ProductGatewayTrait, ProductItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    List,
    Create(String),
    Update(String),
    Delete(String),
    CheckId(String),
}

#[derive(Default)]
pub struct MockProductGateway {
    products: Mutex<Vec<ProductItem>>,
    existing_ids: Mutex<HashSet<String>>,
    calls: Mutex<Vec<GatewayCall>>,
    fail_lists: AtomicBool,
    fail_writes: AtomicBool,
    fail_id_checks: AtomicBool,
}

impl MockProductGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<ProductItem>) -> Self {
        let gateway = Self::new();
        *gateway.products.lock().unwrap() = products;
        gateway
    }

    /// Ids reported as taken in addition to the stored products.
    pub fn with_existing_ids(self, ids: &[&str]) -> Self {
        self.existing_ids
            .lock()
            .unwrap()
            .extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_id_checks(&self, fail: bool) {
        self.fail_id_checks.store(fail, Ordering::SeqCst);
    }

    /// Every call except list, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call != GatewayCall::List)
            .cloned()
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == GatewayCall::List)
            .count()
    }

    pub fn id_checks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::CheckId(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_flag(flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::gateway(Some(500), "mock failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductGatewayTrait for MockProductGateway {
    async fn list_products(&self) -> Result<Vec<ProductItem>> {
        self.record(GatewayCall::List);
        Self::check_flag(&self.fail_lists)?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn create_product(&self, product: &ProductItem) -> Result<ProductItem> {
        self.record(GatewayCall::Create(product.id.clone()));
        Self::check_flag(&self.fail_writes)?;
        self.products.lock().unwrap().push(product.clone());
        Ok(product.clone())
    }

    async fn update_product(&self, id: &str, product: &ProductItem) -> Result<ProductItem> {
        self.record(GatewayCall::Update(id.to_string()));
        Self::check_flag(&self.fail_writes)?;
        let mut products = self.products.lock().unwrap();
        match products.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(product.clone())
            }
            None => Err(Error::gateway(Some(404), "not found")),
        }
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        self.record(GatewayCall::Delete(id.to_string()));
        Self::check_flag(&self.fail_writes)?;
        self.products.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn product_id_exists(&self, id: &str) -> Result<bool> {
        self.record(GatewayCall::CheckId(id.to_string()));
        Self::check_flag(&self.fail_id_checks)?;
        let stored = self.products.lock().unwrap().iter().any(|p| p.id == id);
        Ok(stored || self.existing_ids.lock().unwrap().contains(id))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
