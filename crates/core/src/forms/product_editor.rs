//! Add/edit screen sessions: a form bound to the gateway and a status notice.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{info, warn};
use tokio::sync::watch;

use super::field_rules::FieldName;
use super::product_form::{FormMode, ProductForm};
use crate::config::CatalogConfig;
use crate::errors::{Error, Result};
use crate::navigation::{Navigator, Route};
use crate::notices::{OperationState, TransientNotice};
use crate::products::{ProductGatewayTrait, ProductItem};

pub const ADD_SUCCESS_MESSAGE: &str = "Product added successfully";
pub const ADD_ERROR_MESSAGE: &str = "An error occurred while adding the product";
pub const EDIT_SUCCESS_MESSAGE: &str = "Product updated successfully";
pub const EDIT_ERROR_MESSAGE: &str = "An error occurred while updating the product";

pub struct ProductEditor {
    gateway: Arc<dyn ProductGatewayTrait>,
    navigator: Arc<dyn Navigator>,
    form: ProductForm,
    notice: TransientNotice,
}

impl ProductEditor {
    /// Create screen, validating release dates against the local date.
    pub fn for_create(
        gateway: Arc<dyn ProductGatewayTrait>,
        navigator: Arc<dyn Navigator>,
        config: &CatalogConfig,
    ) -> Self {
        Self::for_create_on(gateway, navigator, config, Local::now().date_naive())
    }

    pub fn for_create_on(
        gateway: Arc<dyn ProductGatewayTrait>,
        navigator: Arc<dyn Navigator>,
        config: &CatalogConfig,
        today: NaiveDate,
    ) -> Self {
        Self {
            gateway,
            navigator,
            form: ProductForm::create(today, config.id_check_policy),
            notice: TransientNotice::new(config.notice_delay),
        }
    }

    pub fn for_edit(
        gateway: Arc<dyn ProductGatewayTrait>,
        navigator: Arc<dyn Navigator>,
        config: &CatalogConfig,
        product: &ProductItem,
    ) -> Self {
        Self {
            gateway,
            navigator,
            form: ProductForm::edit(product, Local::now().date_naive()),
            notice: TransientNotice::new(config.notice_delay),
        }
    }

    /// Open the screen a route points at. Only add and edit routes have one.
    pub fn from_route(
        gateway: Arc<dyn ProductGatewayTrait>,
        navigator: Arc<dyn Navigator>,
        config: &CatalogConfig,
        route: &Route,
    ) -> Result<Self> {
        match route {
            Route::Add => Ok(Self::for_create(gateway, navigator, config)),
            Route::Edit(product) => Ok(Self::for_edit(gateway, navigator, config, product)),
            Route::List => Err(Error::invalid_route("the list route has no editor")),
        }
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn status(&self) -> OperationState {
        self.notice.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.notice.subscribe()
    }

    pub fn set_value(&mut self, field: FieldName, value: impl Into<String>) -> Result<()> {
        self.form.set_value(field, value)
    }

    pub async fn blur(&mut self, field: FieldName) {
        self.form.blur(field, self.gateway.as_ref()).await;
    }

    /// Validate and send the product.
    ///
    /// Invalid forms never reach the gateway. On success the notice clears
    /// after the configured delay and the list route is opened; on failure the
    /// notice clears and the form stays open for another attempt.
    pub async fn submit(&mut self) -> Result<ProductItem> {
        self.form.check_id(self.gateway.as_ref()).await;
        let product = self.form.submit()?;

        self.notice.pending();
        let mode = self.form.mode();
        let result = match mode {
            FormMode::Create => self.gateway.create_product(&product).await,
            FormMode::Edit => self.gateway.update_product(&product.id, &product).await,
        };

        let (success_message, error_message) = match mode {
            FormMode::Create => (ADD_SUCCESS_MESSAGE, ADD_ERROR_MESSAGE),
            FormMode::Edit => (EDIT_SUCCESS_MESSAGE, EDIT_ERROR_MESSAGE),
        };

        match result {
            Ok(saved) => {
                info!("Saved product '{}' ({:?})", product.id, mode);
                let navigator = Arc::clone(&self.navigator);
                self.notice.show_then(
                    OperationState::Succeeded(success_message.to_string()),
                    move || navigator.navigate(Route::List),
                );
                Ok(saved)
            }
            Err(err) => {
                warn!("Failed to save product '{}': {}", product.id, err);
                self.notice
                    .show(OperationState::Failed(error_message.to_string()));
                Err(err)
            }
        }
    }

    /// Reset the form and drop any message on screen.
    pub fn restart(&mut self) {
        self.form.reset();
        self.notice.clear();
    }
}
