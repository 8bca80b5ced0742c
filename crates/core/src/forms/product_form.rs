//! Structured form state for creating and editing products.

use std::str::FromStr;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::field_rules::*;
use crate::errors::{Error, Result};
use crate::products::{
    format_calendar_date, parse_calendar_date, revision_date_for, ProductGatewayTrait, ProductItem,
};

/// What to do when the id-uniqueness check cannot reach the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdCheckPolicy {
    /// Treat the id as invalid until it can be verified.
    #[default]
    FailClosed,
    /// Treat the id as available.
    FailOpen,
}

impl FromStr for IdCheckPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_closed" | "closed" => Ok(Self::FailClosed),
            "fail_open" | "open" => Ok(Self::FailOpen),
            other => Err(Error::config(format!("unknown id check policy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Result of the asynchronous id-uniqueness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdCheckStatus {
    Available,
    Taken,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IdCheck {
    id: String,
    status: IdCheckStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    value: String,
    touched: bool,
    dirty: bool,
    read_only: bool,
    errors: Vec<FieldError>,
}

impl FieldState {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Synchronous rule failures only.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

#[derive(Debug, Clone)]
pub struct ProductForm {
    mode: FormMode,
    fields: [FieldState; 6],
    today: NaiveDate,
    id_policy: IdCheckPolicy,
    id_check: Option<IdCheck>,
    original: Option<ProductItem>,
}

impl ProductForm {
    /// Empty create form. Every field starts touched so problems show at once.
    pub fn create(today: NaiveDate, id_policy: IdCheckPolicy) -> Self {
        let mut form = Self {
            mode: FormMode::Create,
            fields: Default::default(),
            today,
            id_policy,
            id_check: None,
            original: None,
        };
        form.fields[FieldName::DateRevision.index()].read_only = true;
        form.revalidate_all();
        form.mark_all_touched();
        form
    }

    /// Edit form prefilled from an existing product. The id cannot change.
    pub fn edit(product: &ProductItem, today: NaiveDate) -> Self {
        let mut form = Self {
            mode: FormMode::Edit,
            fields: Default::default(),
            today,
            id_policy: IdCheckPolicy::default(),
            id_check: None,
            original: Some(product.clone()),
        };
        form.fields[FieldName::Id.index()].read_only = true;
        form.fields[FieldName::DateRevision.index()].read_only = true;
        form.patch(product);
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn id_policy(&self) -> IdCheckPolicy {
        self.id_policy
    }

    pub fn field(&self, field: FieldName) -> &FieldState {
        &self.fields[field.index()]
    }

    pub fn value(&self, field: FieldName) -> &str {
        self.field(field).value()
    }

    fn rules(&self, field: FieldName) -> Vec<FieldRule> {
        match (field, self.mode) {
            (FieldName::Id, FormMode::Create) => vec![
                FieldRule::Required,
                FieldRule::MinLength(ID_MIN_LEN),
                FieldRule::MaxLength(ID_MAX_LEN),
            ],
            (FieldName::Id, FormMode::Edit) => vec![FieldRule::Required],
            (FieldName::Name, _) => vec![
                FieldRule::Required,
                FieldRule::MinLength(NAME_MIN_LEN),
                FieldRule::MaxLength(NAME_MAX_LEN),
            ],
            (FieldName::Description, _) => vec![
                FieldRule::Required,
                FieldRule::MinLength(DESCRIPTION_MIN_LEN),
                FieldRule::MaxLength(DESCRIPTION_MAX_LEN),
            ],
            (FieldName::Logo, _) => vec![FieldRule::Required],
            (FieldName::DateRelease, FormMode::Create) => vec![
                FieldRule::Required,
                FieldRule::CalendarDate,
                FieldRule::NotBefore(self.today),
            ],
            (FieldName::DateRelease, FormMode::Edit) => {
                vec![FieldRule::Required, FieldRule::CalendarDate]
            }
            (FieldName::DateRevision, _) => vec![FieldRule::Required, FieldRule::CalendarDate],
        }
    }

    fn revalidate(&mut self, field: FieldName) {
        let errors = check_rules(&self.rules(field), self.value(field));
        self.fields[field.index()].errors = errors;
    }

    fn revalidate_all(&mut self) {
        for field in FieldName::ALL {
            self.revalidate(field);
        }
    }

    /// Store a value without marking the field dirty; derived fields follow.
    ///
    /// Ids are stored trimmed so the length rules, the uniqueness check and
    /// the submitted product all see the same string.
    fn write(&mut self, field: FieldName, value: String) {
        let value = match field {
            FieldName::Id => value.trim().to_string(),
            _ => value,
        };
        if field == FieldName::Id && self.value(FieldName::Id) != value {
            self.id_check = None;
        }
        self.fields[field.index()].value = value;
        self.revalidate(field);
        if field == FieldName::DateRelease {
            self.derive_revision_date();
        }
    }

    fn derive_revision_date(&mut self) {
        let revision = parse_calendar_date(self.value(FieldName::DateRelease))
            .map(|release| format_calendar_date(revision_date_for(release)))
            .unwrap_or_default();
        self.fields[FieldName::DateRevision.index()].value = revision;
        self.revalidate(FieldName::DateRevision);
    }

    /// User input. Read-only fields (id on edit, revision date) reject writes.
    pub fn set_value(&mut self, field: FieldName, value: impl Into<String>) -> Result<()> {
        if self.field(field).read_only {
            return Err(Error::ReadOnlyField(field));
        }
        self.write(field, value.into());
        self.fields[field.index()].dirty = true;
        Ok(())
    }

    /// Overwrite every field from a product, recomputing the revision date.
    pub fn patch(&mut self, product: &ProductItem) {
        self.write(FieldName::Id, product.id.clone());
        self.write(FieldName::Name, product.name.clone());
        self.write(FieldName::Description, product.description.clone());
        self.write(FieldName::Logo, product.logo.clone());
        self.write(
            FieldName::DateRelease,
            format_calendar_date(product.date_release),
        );
    }

    pub fn touch(&mut self, field: FieldName) {
        self.fields[field.index()].touched = true;
    }

    pub fn mark_all_touched(&mut self) {
        for state in self.fields.iter_mut() {
            state.touched = true;
        }
    }

    /// Id value awaiting a uniqueness check, if one is needed.
    ///
    /// Only the create form checks, and only ids that already pass their
    /// synchronous rules.
    pub fn pending_id_check(&self) -> Option<&str> {
        if self.mode != FormMode::Create {
            return None;
        }
        let id = self.field(FieldName::Id);
        if !id.errors.is_empty() || id.value.is_empty() {
            return None;
        }
        match &self.id_check {
            Some(check) if check.id == id.value => None,
            _ => Some(id.value.as_str()),
        }
    }

    /// Record the outcome of a uniqueness check for `id`.
    ///
    /// Results for an id that is no longer in the field are discarded.
    pub fn apply_id_check(&mut self, id: &str, outcome: Result<bool>) {
        if self.value(FieldName::Id) != id {
            debug!("Discarding id check for '{}': field changed", id);
            return;
        }
        let status = match outcome {
            Ok(true) => IdCheckStatus::Taken,
            Ok(false) => IdCheckStatus::Available,
            Err(err) => {
                warn!("Id check for '{}' failed ({:?}): {}", id, self.id_policy, err);
                IdCheckStatus::Unreachable
            }
        };
        self.id_check = Some(IdCheck {
            id: id.to_string(),
            status,
        });
    }

    pub fn id_check_status(&self) -> Option<IdCheckStatus> {
        self.id_check
            .as_ref()
            .filter(|check| check.id == self.value(FieldName::Id))
            .map(|check| check.status)
    }

    /// Run the uniqueness check against the gateway when one is pending.
    pub async fn check_id(&mut self, gateway: &dyn ProductGatewayTrait) {
        let Some(id) = self.pending_id_check().map(str::to_string) else {
            return;
        };
        debug!("Checking whether product id '{}' exists", id);
        let outcome = gateway.product_id_exists(&id).await;
        self.apply_id_check(&id, outcome);
    }

    /// Focus left `field`: mark it touched and run its async rule.
    pub async fn blur(&mut self, field: FieldName, gateway: &dyn ProductGatewayTrait) {
        self.touch(field);
        if field == FieldName::Id {
            self.check_id(gateway).await;
        }
    }

    fn async_error(&self, field: FieldName) -> Option<FieldError> {
        if field != FieldName::Id {
            return None;
        }
        match (self.id_check_status()?, self.id_policy) {
            (IdCheckStatus::Taken, _) => Some(FieldError::IdExists),
            (IdCheckStatus::Unreachable, IdCheckPolicy::FailClosed) => {
                Some(FieldError::IdUnverified)
            }
            _ => None,
        }
    }

    /// All conditions currently attached to a field.
    pub fn errors(&self, field: FieldName) -> Vec<FieldError> {
        let mut errors = self.field(field).errors.clone();
        errors.extend(self.async_error(field));
        errors
    }

    pub fn is_field_valid(&self, field: FieldName) -> bool {
        if !self.errors(field).is_empty() {
            return false;
        }
        // An unchecked id is not yet known to be unique.
        !(field == FieldName::Id && self.mode == FormMode::Create && self.id_check_status().is_none())
    }

    /// Whether the field should display its errors.
    pub fn is_invalid(&self, field: FieldName) -> bool {
        let state = self.field(field);
        !self.is_field_valid(field) && (state.dirty || state.touched)
    }

    pub fn invalid_fields(&self) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|f| !self.is_field_valid(*f))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_fields().is_empty()
    }

    /// Produce the product to send, or reject and surface every error.
    pub fn submit(&mut self) -> Result<ProductItem> {
        let invalid = self.invalid_fields();
        if !invalid.is_empty() {
            self.mark_all_touched();
            return Err(Error::InvalidForm(invalid));
        }
        self.to_product()
            .ok_or_else(|| Error::InvalidForm(vec![FieldName::DateRelease]))
    }

    fn to_product(&self) -> Option<ProductItem> {
        let date_release = parse_calendar_date(self.value(FieldName::DateRelease))?;
        let date_revision = parse_calendar_date(self.value(FieldName::DateRevision))?;
        Some(ProductItem {
            id: self.value(FieldName::Id).to_string(),
            name: self.value(FieldName::Name).to_string(),
            description: self.value(FieldName::Description).to_string(),
            logo: self.value(FieldName::Logo).to_string(),
            date_release,
            date_revision,
        })
    }

    /// Restart the form: the create form empties and shows its errors again,
    /// the edit form goes back to the product it was opened with.
    pub fn reset(&mut self) {
        let read_only: Vec<bool> = self.fields.iter().map(|f| f.read_only).collect();
        self.fields = Default::default();
        for (state, read_only) in self.fields.iter_mut().zip(read_only) {
            state.read_only = read_only;
        }
        self.id_check = None;
        match self.original.clone() {
            Some(product) => self.patch(&product),
            None => {
                self.revalidate_all();
                self.mark_all_touched();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProductGateway;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn fill_valid(form: &mut ProductForm, id: &str) {
        form.set_value(FieldName::Id, id).unwrap();
        form.set_value(FieldName::Name, "Tarjeta Credito").unwrap();
        form.set_value(FieldName::Description, "Tarjeta de consumo").unwrap();
        form.set_value(FieldName::Logo, "logo.png").unwrap();
        form.set_value(FieldName::DateRelease, "2026-11-01").unwrap();
    }

    #[test]
    fn create_form_starts_touched_and_invalid() {
        let form = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        for field in FieldName::ALL {
            assert!(form.field(field).is_touched(), "{} not touched", field);
            assert!(form.is_invalid(field), "{} should show errors", field);
        }
        assert!(form.field(FieldName::DateRevision).is_read_only());
        assert!(!form.field(FieldName::Id).is_read_only());
    }

    #[test]
    fn release_date_drives_revision_date() {
        let mut form = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        form.set_value(FieldName::DateRelease, "2028-02-29").unwrap();
        assert_eq!(form.value(FieldName::DateRevision), "2029-02-28");

        form.set_value(FieldName::DateRelease, "not a date").unwrap();
        assert_eq!(form.value(FieldName::DateRevision), "");
        assert_eq!(form.errors(FieldName::DateRelease), vec![FieldError::InvalidDate]);
    }

    #[test]
    fn revision_date_is_not_writable() {
        let mut form = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        let err = form.set_value(FieldName::DateRevision, "2030-01-01").unwrap_err();
        assert!(matches!(err, Error::ReadOnlyField(FieldName::DateRevision)));
    }

    #[test]
    fn release_date_before_today_is_rejected_on_create() {
        let mut form = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        form.set_value(FieldName::DateRelease, "2026-10-17").unwrap();
        assert_eq!(
            form.errors(FieldName::DateRelease),
            vec![FieldError::DateInPast { earliest: today() }]
        );
    }

    #[test]
    fn submit_with_empty_fields_marks_everything_touched() {
        let product = ProductItem::new("abc", "Savings plus", "A savings account", "logo.png", today());
        let mut form = ProductForm::edit(&product, today());
        form.set_value(FieldName::Name, "").unwrap();
        assert!(!form.field(FieldName::Logo).is_touched());

        let err = form.submit().unwrap_err();
        assert!(matches!(err, Error::InvalidForm(ref fields) if fields == &vec![FieldName::Name]));
        for field in FieldName::ALL {
            assert!(form.field(field).is_touched());
        }
    }

    #[tokio::test]
    async fn taken_id_marks_field_invalid() {
        let gateway = MockProductGateway::new().with_existing_ids(&["DUP1"]);
        let mut form = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        fill_valid(&mut form, "DUP1");

        form.blur(FieldName::Id, &gateway).await;
        assert_eq!(form.id_check_status(), Some(IdCheckStatus::Taken));
        assert_eq!(form.errors(FieldName::Id), vec![FieldError::IdExists]);
        assert!(form.is_invalid(FieldName::Id));
        assert!(matches!(form.submit(), Err(Error::InvalidForm(_))));
    }

    #[tokio::test]
    async fn available_id_allows_submit() {
        let gateway = MockProductGateway::new().with_existing_ids(&["DUP1"]);
        let mut form = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        fill_valid(&mut form, "NEW1");

        form.blur(FieldName::Id, &gateway).await;
        let product = form.submit().unwrap();
        assert_eq!(product.id, "NEW1");
        assert_eq!(product.date_revision, NaiveDate::from_ymd_opt(2027, 11, 1).unwrap());
        assert_eq!(gateway.id_checks(), vec!["NEW1".to_string()]);
    }

    #[tokio::test]
    async fn id_check_skipped_for_short_ids_and_cached_per_value() {
        let gateway = MockProductGateway::new();
        let mut form = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        form.set_value(FieldName::Id, "ab").unwrap();
        form.blur(FieldName::Id, &gateway).await;
        assert!(gateway.id_checks().is_empty());

        form.set_value(FieldName::Id, "abc").unwrap();
        form.blur(FieldName::Id, &gateway).await;
        form.blur(FieldName::Id, &gateway).await;
        assert_eq!(gateway.id_checks(), vec!["abc".to_string()]);

        form.set_value(FieldName::Id, "abcd").unwrap();
        assert_eq!(form.pending_id_check(), Some("abcd"));
    }

    #[tokio::test]
    async fn unreachable_gateway_follows_policy() {
        let gateway = MockProductGateway::new();
        gateway.fail_id_checks(true);

        let mut closed = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        fill_valid(&mut closed, "NEW1");
        closed.blur(FieldName::Id, &gateway).await;
        assert_eq!(closed.errors(FieldName::Id), vec![FieldError::IdUnverified]);
        assert!(!closed.is_valid());

        let mut open = ProductForm::create(today(), IdCheckPolicy::FailOpen);
        fill_valid(&mut open, "NEW1");
        open.blur(FieldName::Id, &gateway).await;
        assert!(open.errors(FieldName::Id).is_empty());
        assert!(open.is_valid());
    }

    #[tokio::test]
    async fn padded_id_is_measured_and_submitted_trimmed() {
        let gateway = MockProductGateway::new();
        let mut short = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        fill_valid(&mut short, "ab ");
        assert_eq!(short.value(FieldName::Id), "ab");
        assert_eq!(
            short.errors(FieldName::Id),
            vec![FieldError::MinLength { min: 3, actual: 2 }]
        );
        short.blur(FieldName::Id, &gateway).await;
        assert!(gateway.id_checks().is_empty());
        assert!(matches!(short.submit(), Err(Error::InvalidForm(ref f)) if f == &vec![FieldName::Id]));

        let mut full = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        fill_valid(&mut full, " abcdefghij ");
        assert!(full.errors(FieldName::Id).is_empty());
        full.blur(FieldName::Id, &gateway).await;
        assert_eq!(full.submit().unwrap().id, "abcdefghij");
        assert_eq!(gateway.id_checks(), vec!["abcdefghij".to_string()]);
    }

    #[test]
    fn stale_id_check_is_discarded() {
        let mut form = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        form.set_value(FieldName::Id, "first").unwrap();
        form.set_value(FieldName::Id, "second").unwrap();
        form.apply_id_check("first", Ok(true));
        assert_eq!(form.id_check_status(), None);
        assert_eq!(form.pending_id_check(), Some("second"));
    }

    #[test]
    fn edit_form_keeps_id_immutable_and_allows_past_release() {
        let release = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
        let product = ProductItem::new("trj-crd", "Tarjeta Credito", "Tarjeta de consumo", "logo.png", release);
        let mut form = ProductForm::edit(&product, today());

        assert!(matches!(
            form.set_value(FieldName::Id, "other"),
            Err(Error::ReadOnlyField(FieldName::Id))
        ));
        assert!(form.is_valid());
        assert_eq!(form.value(FieldName::DateRevision), "2021-01-15");
        assert_eq!(form.pending_id_check(), None);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut create = ProductForm::create(today(), IdCheckPolicy::FailClosed);
        create.set_value(FieldName::Name, "Something").unwrap();
        create.reset();
        assert_eq!(create.value(FieldName::Name), "");
        assert!(!create.field(FieldName::Name).is_dirty());
        assert!(create.field(FieldName::Name).is_touched());
        assert!(create.field(FieldName::DateRevision).is_read_only());

        let product = ProductItem::new("abc", "Savings plus", "A savings account", "logo.png", today());
        let mut edit = ProductForm::edit(&product, today());
        edit.set_value(FieldName::Name, "Changed name").unwrap();
        edit.reset();
        assert_eq!(edit.value(FieldName::Name), "Savings plus");
        assert!(edit.field(FieldName::Id).is_read_only());
    }

    #[test]
    fn id_check_policy_parses_config_values() {
        assert_eq!("fail-open".parse::<IdCheckPolicy>().unwrap(), IdCheckPolicy::FailOpen);
        assert_eq!(" FAIL_CLOSED ".parse::<IdCheckPolicy>().unwrap(), IdCheckPolicy::FailClosed);
        assert!("maybe".parse::<IdCheckPolicy>().is_err());
    }
}
