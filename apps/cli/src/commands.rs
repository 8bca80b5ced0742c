//! Subcommand handlers. Each one drives the same controllers a UI would.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use log::debug;

use prodcat_core::catalog::ProductListController;
use prodcat_core::forms::{FieldName, ProductEditor};
use prodcat_core::navigation::LogNavigator;
use prodcat_core::products::{ProductGatewayTrait, ProductItem};
use prodcat_core::{CatalogConfig, Error};
use prodcat_gateway::ProductApiClient;

use crate::args::Command;
use crate::render;

pub async fn run(command: Command, config: &CatalogConfig) -> Result<()> {
    debug!("Using product service at {}", config.api_base_url);
    let gateway: Arc<dyn ProductGatewayTrait> =
        Arc::new(ProductApiClient::new(&config.api_base_url));

    match command {
        Command::List {
            search,
            page_size: _,
            page,
        } => list(gateway, config, search, page).await,
        Command::Add {
            id,
            name,
            description,
            logo,
            release,
        } => {
            let fields = [
                (FieldName::Id, Some(id)),
                (FieldName::Name, Some(name)),
                (FieldName::Description, Some(description)),
                (FieldName::Logo, Some(logo)),
                (FieldName::DateRelease, Some(release)),
            ];
            let editor = ProductEditor::for_create(gateway, Arc::new(LogNavigator), config);
            save(editor, fields).await
        }
        Command::Edit {
            id,
            name,
            description,
            logo,
            release,
        } => {
            let product = find_product(&gateway, config, &id).await?;
            let fields = [
                (FieldName::Name, name),
                (FieldName::Description, description),
                (FieldName::Logo, logo),
                (FieldName::DateRelease, release),
            ];
            let editor =
                ProductEditor::for_edit(gateway, Arc::new(LogNavigator), config, &product);
            save(editor, fields).await
        }
        Command::Delete { id, yes } => delete(gateway, config, &id, yes).await,
        Command::CheckId { id } => {
            let taken = gateway
                .product_id_exists(&id)
                .await
                .context("Could not verify the id")?;
            println!(
                "{}: {}",
                id,
                if taken { "already exists" } else { "available" }
            );
            Ok(())
        }
    }
}

async fn load_list(
    gateway: Arc<dyn ProductGatewayTrait>,
    config: &CatalogConfig,
) -> Result<ProductListController> {
    let mut list = ProductListController::new(gateway, Arc::new(LogNavigator), config);
    list.activate().await;
    if let Some(message) = list.load_error() {
        bail!(message);
    }
    Ok(list)
}

async fn find_product(
    gateway: &Arc<dyn ProductGatewayTrait>,
    config: &CatalogConfig,
    id: &str,
) -> Result<ProductItem> {
    let list = load_list(Arc::clone(gateway), config).await?;
    list.products()
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("No product with id '{}'", id))
}

async fn list(
    gateway: Arc<dyn ProductGatewayTrait>,
    config: &CatalogConfig,
    search: Option<String>,
    page: usize,
) -> Result<()> {
    let mut list = load_list(gateway, config).await?;
    if let Some(term) = search {
        list.set_search_term(term);
    }
    list.set_page(page.saturating_sub(1));
    println!("{}", render::list_screen(&list));
    Ok(())
}

async fn save<const N: usize>(
    mut editor: ProductEditor,
    fields: [(FieldName, Option<String>); N],
) -> Result<()> {
    for (field, value) in fields {
        if let Some(value) = value {
            editor.set_value(field, value)?;
            editor.blur(field).await;
        }
    }

    match editor.submit().await {
        Ok(saved) => {
            if let Some(message) = editor.status().message() {
                println!("{}", message);
            }
            println!("{}", render::product_row(&saved));
            Ok(())
        }
        Err(Error::InvalidForm(_)) => {
            for line in render::form_errors(editor.form()) {
                eprintln!("  {}", line);
            }
            bail!("The product was not saved: fix the fields above")
        }
        Err(err) => {
            debug!("Save failed: {}", err);
            let message = editor
                .status()
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            bail!(message)
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn delete(
    gateway: Arc<dyn ProductGatewayTrait>,
    config: &CatalogConfig,
    id: &str,
    skip_prompt: bool,
) -> Result<()> {
    let mut list = load_list(gateway, config).await?;
    let product = list
        .products()
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("No product with id '{}'", id))?;

    list.request_delete(&product);
    let prompt = format!("Delete product '{}' ({})?", product.name, product.id);
    if !skip_prompt && !confirm(&prompt)? {
        list.cancel_delete();
        println!("Cancelled");
        return Ok(());
    }

    list.confirm_delete().await?;
    let status = list.status();
    let message = status.message().unwrap_or_default();
    if status.is_error() {
        bail!(message.to_string());
    }
    println!("{}", message);
    println!("{}", render::list_screen(&list));
    Ok(())
}
