//! Plain-text rendering of the list screen and form errors.

use prodcat_core::catalog::ProductListController;
use prodcat_core::forms::{FieldName, ProductForm};
use prodcat_core::products::{format_calendar_date, ProductItem};

const NAME_WIDTH: usize = 24;
const DESCRIPTION_WIDTH: usize = 40;

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn product_row(product: &ProductItem) -> String {
    format!(
        "{:<10}  {:<name_w$}  {:<desc_w$}  {}  {}",
        product.id,
        truncate(&product.name, NAME_WIDTH),
        truncate(&product.description, DESCRIPTION_WIDTH),
        format_calendar_date(product.date_release),
        format_calendar_date(product.date_revision),
        name_w = NAME_WIDTH,
        desc_w = DESCRIPTION_WIDTH,
    )
}

pub fn list_screen(list: &ProductListController) -> String {
    let mut out = format!(
        "{:<10}  {:<name_w$}  {:<desc_w$}  {:<10}  {}\n",
        "ID",
        "NAME",
        "DESCRIPTION",
        "RELEASE",
        "REVISION",
        name_w = NAME_WIDTH,
        desc_w = DESCRIPTION_WIDTH,
    );
    for product in list.visible_products() {
        out.push_str(&product_row(product));
        out.push('\n');
    }
    out.push_str(&format!(
        "{} results, page {}/{}",
        list.result_count(),
        list.page() + 1,
        list.page_count()
    ));
    out
}

/// One line per field that should display errors.
pub fn form_errors(form: &ProductForm) -> Vec<String> {
    FieldName::ALL
        .into_iter()
        .filter(|field| form.is_invalid(*field))
        .map(|field| {
            let errors = form.errors(field);
            let detail = if errors.is_empty() {
                "not verified yet".to_string()
            } else {
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            format!("{}: {}", field, detail)
        })
        .collect()
}
