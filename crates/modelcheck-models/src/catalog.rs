use std::collections::BTreeMap;
use std::sync::Arc;

use modelcheck_core::{Error, RecordSpec, Result, ValidationReport};
use modelcheck_validate::{ValidatedRecord, ValidationContext, Validator, ValidatorRegistry};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::books::Book;
use crate::customers::{Address, Customer};
use crate::model::{Model, ModelError};
use crate::orders::{Order, OrderItem};
use crate::params::{
    ItemDetailsQuery, ItemPath, ItemsFilter, ModelPath, Pagination, RequiredQuery, SquareParams,
    UserItemPath,
};
use crate::products::{Item, Product};
use crate::users::{User, UserDraft};

/// Named set of record specs with their validators.
///
/// Read-only once built; share it behind a reference or an `Arc`.
#[derive(Debug, Default)]
pub struct ModelCatalog {
    specs: BTreeMap<&'static str, Arc<RecordSpec>>,
    registry: ValidatorRegistry,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every standard model.
    pub fn standard() -> Result<Self> {
        let mut catalog = Self::new();
        catalog.add::<User>()?;
        catalog.add::<UserDraft>()?;
        catalog.add::<Item>()?;
        catalog.add::<Product>()?;
        catalog.add::<Book>()?;
        catalog.add::<Address>()?;
        catalog.add::<Customer>()?;
        catalog.add::<OrderItem>()?;
        catalog.add::<Order>()?;
        catalog.add::<ItemPath>()?;
        catalog.add::<ItemsFilter>()?;
        catalog.add::<UserItemPath>()?;
        catalog.add::<ModelPath>()?;
        catalog.add::<Pagination>()?;
        catalog.add::<ItemDetailsQuery>()?;
        catalog.add::<RequiredQuery>()?;
        catalog.add::<SquareParams>()?;
        catalog.check_registrations()?;
        debug!(event = "catalog_built", models = catalog.specs.len());
        Ok(catalog)
    }

    /// Build `M`'s spec and register its validators.
    pub fn add<M: Model>(&mut self) -> Result<()> {
        let spec = M::spec()?;
        if spec.name() != M::NAME {
            return Err(Error::InvalidSpec(format!(
                "model {} builds spec named {}",
                M::NAME,
                spec.name()
            )));
        }
        if self.specs.contains_key(M::NAME) {
            return Err(Error::InvalidSpec(format!("duplicate model: {}", M::NAME)));
        }
        self.specs.insert(M::NAME, Arc::new(spec));
        M::register(&mut self.registry);
        Ok(())
    }

    /// Every validator must target a declared field of a known record.
    pub fn check_registrations(&self) -> Result<()> {
        for (record, field) in self.registry.field_targets() {
            let declared = self
                .specs
                .get(record)
                .is_some_and(|spec| spec.field(field).is_some());
            if !declared {
                return Err(Error::InvalidSpec(format!(
                    "validator registered for unknown field {record}.{field}"
                )));
            }
        }
        for record in self.registry.record_targets() {
            if !self.specs.contains_key(record) {
                return Err(Error::InvalidSpec(format!(
                    "validator registered for unknown record {record}"
                )));
            }
        }
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.keys().copied()
    }

    pub fn spec(&self, name: &str) -> Result<&Arc<RecordSpec>> {
        self.specs
            .get(name)
            .ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    pub fn validator(&self, context: ValidationContext) -> Validator<'_> {
        Validator::new(&self.registry, context)
    }

    /// Validate `input` against the named model.
    ///
    /// The outer `Result` fails only for an unknown model name.
    pub fn validate(
        &self,
        name: &str,
        input: &JsonValue,
        context: ValidationContext,
    ) -> Result<std::result::Result<ValidatedRecord, ValidationReport>> {
        let spec = self.spec(name)?;
        Ok(self.validator(context).validate(spec, input))
    }

    /// Validate `input` and build the typed model.
    pub fn parse<M: Model>(
        &self,
        input: &JsonValue,
        context: ValidationContext,
    ) -> std::result::Result<M, ModelError> {
        let record = self.validate(M::NAME, input, context)??;
        Ok(M::from_record(&record)?)
    }
}
