//! In-app routes between the list, add and edit screens.
//!
//! The edit screen receives the selected product as JSON in the query string
//! instead of through shared state.

use std::fmt;

use log::debug;

use crate::errors::{Error, Result};
use crate::products::ProductItem;

pub const LIST_PATH: &str = "/products";
pub const ADD_PATH: &str = "/features/add";
pub const EDIT_PATH: &str = "/features/edit";
const PRODUCT_PARAM: &str = "product";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Add,
    Edit(ProductItem),
}

impl Route {
    /// Render the route as a path with its query string.
    pub fn to_path(&self) -> Result<String> {
        match self {
            Self::List => Ok(LIST_PATH.to_string()),
            Self::Add => Ok(ADD_PATH.to_string()),
            Self::Edit(product) => {
                let json = serde_json::to_string(product)?;
                Ok(format!(
                    "{}?{}={}",
                    EDIT_PATH,
                    PRODUCT_PARAM,
                    urlencoding::encode(&json)
                ))
            }
        }
    }

    /// Resolve a path. Empty and unknown paths redirect to the list.
    pub fn parse(path: &str) -> Result<Self> {
        let (location, query) = match path.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (path, None),
        };

        match location.trim_end_matches('/') {
            "" | LIST_PATH => Ok(Self::List),
            ADD_PATH => Ok(Self::Add),
            EDIT_PATH => {
                let raw = query
                    .and_then(|q| query_param(q, PRODUCT_PARAM))
                    .ok_or_else(|| Error::invalid_route("edit route requires a product"))?;
                let json = urlencoding::decode(raw)
                    .map_err(|e| Error::invalid_route(format!("bad product encoding: {}", e)))?;
                Ok(Self::Edit(serde_json::from_str(&json)?))
            }
            other => {
                debug!("Unknown route '{}', redirecting to list", other);
                Ok(Self::List)
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str(LIST_PATH),
            Self::Add => f.write_str(ADD_PATH),
            Self::Edit(product) => write!(f, "{} ({})", EDIT_PATH, product.id),
        }
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| match pair.split_once('=') {
        Some((key, value)) if key == name => Some(value),
        _ => None,
    })
}

/// Receives navigation intents from controllers and editors.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only records the intent in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        debug!("Navigate to {}", route);
    }
}
