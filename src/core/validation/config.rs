//! Declarative validation configuration for an entity payload

use crate::core::error::FieldValidationError;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

type Validator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type Filter = Arc<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;

#[derive(Default, Clone)]
struct FieldRules {
    filters: Vec<Filter>,
    validators: Vec<Validator>,
}

/// Filters and validators for every accepted field of one operation
///
/// Fields are processed in declaration order, which is also the order in
/// which errors are reported. Fields that were not declared are dropped from
/// the payload.
#[derive(Clone)]
pub struct EntityValidationConfig {
    entity_type: String,
    partial: bool,
    fields: IndexMap<String, FieldRules>,
}

impl EntityValidationConfig {
    /// Configuration where every declared field is checked, present or not
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            partial: false,
            fields: IndexMap::new(),
        }
    }

    /// Configuration for partial updates: absent fields are skipped entirely
    pub fn partial(entity_type: impl Into<String>) -> Self {
        Self {
            partial: true,
            ..Self::new(entity_type)
        }
    }

    /// Append a filter to a field's filter chain
    pub fn add_filter<F>(&mut self, field: &str, filter: F)
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.rules_mut(field).filters.push(Arc::new(filter));
    }

    /// Append a validator to a field's validator chain
    pub fn add_validator<V>(&mut self, field: &str, validator: V)
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules_mut(field).validators.push(Arc::new(validator));
    }

    fn rules_mut(&mut self, field: &str) -> &mut FieldRules {
        self.fields.entry(field.to_string()).or_default()
    }

    /// Run the filters, then the validators, over a JSON payload
    ///
    /// Returns the filtered object (declared, non-null fields only) or every
    /// field error found. Each field reports at most its first failure.
    pub fn validate_and_filter(
        &self,
        payload: Value,
    ) -> Result<Value, Vec<FieldValidationError>> {
        let Value::Object(mut input) = payload else {
            return Err(vec![FieldValidationError::new(
                "body",
                format!("{} payload must be a JSON object", self.entity_type),
            )]);
        };

        let mut output = Map::new();
        let mut errors = Vec::new();

        for (field, rules) in &self.fields {
            let present = input.contains_key(field);
            if self.partial && !present {
                continue;
            }

            let mut value = input.remove(field).unwrap_or(Value::Null);

            let mut filter_failed = false;
            for filter in &rules.filters {
                match filter(field, value.clone()) {
                    Ok(filtered) => value = filtered,
                    Err(e) => {
                        errors.push(FieldValidationError::new(field, e.to_string()));
                        filter_failed = true;
                        break;
                    }
                }
            }
            if filter_failed {
                continue;
            }

            if let Some(message) = rules
                .validators
                .iter()
                .find_map(|validate| validate(field, &value).err())
            {
                errors.push(FieldValidationError::new(field, message));
                continue;
            }

            if !value.is_null() {
                output.insert(field.clone(), value);
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(errors)
        }
    }
}
