//! Model description store
//!
//! Holds the variables and units of a parsed model description and answers
//! lookups by value reference and by name. This is the variable-resolution
//! provider used when expanding log messages.

use crate::counts::ModelCounts;
use crate::model::units::{DisplayUnit, Unit};
use crate::model::VariableResolver;
use crate::types::{
    AliasKind, BaseType, Causality, ModelError, ValueReference, Variability,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A model variable definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Variable name (unique within the model)
    pub name: String,
    /// Value reference, unique per base type among non-alias variables
    pub value_reference: ValueReference,
    /// Base type
    #[serde(rename = "type")]
    pub base_type: BaseType,
    pub variability: Variability,
    pub causality: Causality,
    /// Alias relation to the variable owning this value reference
    #[serde(default)]
    pub alias: AliasKind,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Unit name (must be declared in the unit definitions)
    #[serde(default)]
    pub unit: Option<String>,
    /// Display unit name (must belong to `unit`)
    #[serde(default)]
    pub display_unit: Option<String>,
}

impl VariableDefinition {
    /// Create a non-alias variable without unit information
    pub fn new(
        name: impl Into<String>,
        base_type: BaseType,
        value_reference: ValueReference,
        variability: Variability,
        causality: Causality,
    ) -> Self {
        Self {
            name: name.into(),
            value_reference,
            base_type,
            variability,
            causality,
            alias: AliasKind::NoAlias,
            description: None,
            unit: None,
            display_unit: None,
        }
    }

    /// Builder method: set the alias relation
    pub fn with_alias(mut self, alias: AliasKind) -> Self {
        self.alias = alias;
        self
    }

    /// Builder method: set unit and optional display unit
    pub fn with_unit(mut self, unit: impl Into<String>, display_unit: Option<&str>) -> Self {
        self.unit = Some(unit.into());
        self.display_unit = display_unit.map(str::to_string);
        self
    }

    pub fn is_alias(&self) -> bool {
        self.alias != AliasKind::NoAlias
    }
}

/// The model description store
#[derive(Debug, Default)]
pub struct ModelDescription {
    /// All variables in original declaration order
    variables: Vec<VariableDefinition>,

    /// Key: (base type, value reference), Value: index into `variables`
    vr_lookup: HashMap<(BaseType, ValueReference), usize>,

    /// Key: variable name, Value: index into `variables`
    name_lookup: HashMap<String, usize>,

    /// Unit definitions in declaration order
    units: Vec<Unit>,

    /// Key: unit name, Value: index into `units`
    unit_lookup: HashMap<String, usize>,
}

impl ModelDescription {
    /// Create a new empty model description
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit definition. Units must be added before the variables that
    /// reference them.
    pub fn add_unit(&mut self, unit: Unit) -> Result<(), ModelError> {
        if self.unit_lookup.contains_key(&unit.name) {
            return Err(ModelError::DuplicateUnit(unit.name));
        }
        if let Some(du) = unit.display_units.iter().find(|du| du.factor == 0.0) {
            return Err(ModelError::ZeroFactor(du.name.clone()));
        }

        log::debug!(
            "Adding unit {} with {} display unit(s)",
            unit.name,
            unit.display_units.len()
        );
        self.unit_lookup.insert(unit.name.clone(), self.units.len());
        self.units.push(unit);
        Ok(())
    }

    /// Add a variable definition
    pub fn add_variable(&mut self, variable: VariableDefinition) -> Result<(), ModelError> {
        if self.name_lookup.contains_key(&variable.name) {
            return Err(ModelError::DuplicateVariable(variable.name));
        }
        self.check_units(&variable)?;

        let index = self.variables.len();
        let key = (variable.base_type, variable.value_reference);

        // The non-alias variable owns the value reference; among aliases the
        // first declared one wins.
        match self.vr_lookup.get(&key).copied() {
            Some(existing) if self.variables[existing].is_alias() && !variable.is_alias() => {
                self.vr_lookup.insert(key, index);
            }
            Some(_) => {
                log::trace!(
                    "Value reference {} ({}) already owned, {} kept as secondary",
                    variable.value_reference,
                    variable.base_type,
                    variable.name
                );
            }
            None => {
                self.vr_lookup.insert(key, index);
            }
        }

        self.name_lookup.insert(variable.name.clone(), index);
        self.variables.push(variable);
        Ok(())
    }

    fn check_units(&self, variable: &VariableDefinition) -> Result<(), ModelError> {
        match (&variable.unit, &variable.display_unit) {
            (None, None) => Ok(()),
            (None, Some(display_unit)) => Err(ModelError::UnknownDisplayUnit {
                variable: variable.name.clone(),
                display_unit: display_unit.clone(),
            }),
            (Some(unit_name), display_unit) => {
                let unit = self.unit_by_name(unit_name).ok_or_else(|| ModelError::UnknownUnit {
                    variable: variable.name.clone(),
                    unit: unit_name.clone(),
                })?;
                match display_unit {
                    Some(du) if unit.display_unit_by_name(du).is_none() => {
                        Err(ModelError::UnknownDisplayUnit {
                            variable: variable.name.clone(),
                            display_unit: du.clone(),
                        })
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    /// Get the variable owning a value reference of the given base type
    pub fn variable_by_vr(
        &self,
        base_type: BaseType,
        value_reference: ValueReference,
    ) -> Option<&VariableDefinition> {
        self.vr_lookup
            .get(&(base_type, value_reference))
            .and_then(|idx| self.variables.get(*idx))
    }

    /// Get a variable by name
    pub fn variable_by_name(&self, name: &str) -> Option<&VariableDefinition> {
        self.name_lookup.get(name).and_then(|idx| self.variables.get(*idx))
    }

    /// All variables in original declaration order
    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    /// All unit definitions in declaration order
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Get a unit by index
    pub fn unit(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    /// Get a unit by name
    pub fn unit_by_name(&self, name: &str) -> Option<&Unit> {
        self.unit_lookup.get(name).and_then(|idx| self.units.get(*idx))
    }

    /// Get the unit a display unit is defined on
    pub fn base_unit(&self, display_unit: &DisplayUnit) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.owns(display_unit))
    }

    /// Get the unit of a variable
    pub fn variable_unit(&self, variable: &VariableDefinition) -> Option<&Unit> {
        variable.unit.as_deref().and_then(|name| self.unit_by_name(name))
    }

    /// Get the display unit of a variable
    pub fn variable_display_unit(&self, variable: &VariableDefinition) -> Option<&DisplayUnit> {
        let unit = self.variable_unit(variable)?;
        variable
            .display_unit
            .as_deref()
            .and_then(|name| unit.display_unit_by_name(name))
    }

    /// Count variables by variability, causality and base type
    pub fn counts(&self) -> ModelCounts {
        ModelCounts::collect(&self.variables)
    }

    /// Get model statistics
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            num_variables: self.variables.len(),
            num_aliases: self.variables.iter().filter(|v| v.is_alias()).count(),
            num_units: self.units.len(),
            num_display_units: self.units.iter().map(Unit::display_unit_count).sum(),
        }
    }
}

impl VariableResolver for ModelDescription {
    fn resolve(&self, base_type: BaseType, value_reference: ValueReference) -> Option<&str> {
        self.variable_by_vr(base_type, value_reference)
            .map(|var| var.name.as_str())
    }
}

/// Model statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelStats {
    /// Total number of variables, aliases included
    pub num_variables: usize,
    /// Number of alias and negated alias variables
    pub num_aliases: usize,
    /// Number of unit definitions
    pub num_units: usize,
    /// Number of display units over all units
    pub num_display_units: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(name: &str, vr: u32) -> VariableDefinition {
        VariableDefinition::new(name, BaseType::Real, vr, Variability::Continuous, Causality::Local)
    }

    #[test]
    fn test_empty_model() {
        let md = ModelDescription::new();
        let stats = md.stats();
        assert_eq!(stats.num_variables, 0);
        assert_eq!(stats.num_units, 0);
        assert!(md.resolve(BaseType::Real, 0).is_none());
    }

    #[test]
    fn test_add_variable() {
        let mut md = ModelDescription::new();
        md.add_variable(real("Temperature", 42)).unwrap();

        let var = md.variable_by_vr(BaseType::Real, 42).unwrap();
        assert_eq!(var.name, "Temperature");
        assert_eq!(md.resolve(BaseType::Real, 42), Some("Temperature"));

        // Same reference under another base type is a different variable
        assert!(md.resolve(BaseType::Integer, 42).is_none());
        assert!(md.variable_by_name("Temperature").is_some());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut md = ModelDescription::new();
        md.add_variable(real("x", 1)).unwrap();
        let err = md.add_variable(real("x", 2)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateVariable(name) if name == "x"));
    }

    #[test]
    fn test_alias_resolution_prefers_base_variable() {
        let mut md = ModelDescription::new();
        md.add_variable(real("der_x_alias", 7).with_alias(AliasKind::Alias)).unwrap();
        md.add_variable(real("der_x", 7)).unwrap();
        md.add_variable(real("neg_der_x", 7).with_alias(AliasKind::NegatedAlias)).unwrap();

        assert_eq!(md.resolve(BaseType::Real, 7), Some("der_x"));
        assert_eq!(md.stats().num_aliases, 2);
        // Declaration order is preserved
        let names: Vec<&str> = md.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["der_x_alias", "der_x", "neg_der_x"]);
    }

    #[test]
    fn test_first_declared_wins_without_base_variable() {
        let mut md = ModelDescription::new();
        md.add_variable(real("a", 3)).unwrap();
        md.add_variable(real("b", 3)).unwrap();
        assert_eq!(md.resolve(BaseType::Real, 3), Some("a"));
    }

    #[test]
    fn test_units() {
        let mut md = ModelDescription::new();
        md.add_unit(Unit::new("K").with_display_unit(DisplayUnit::new("degC", 1.0, -273.15)))
            .unwrap();
        md.add_variable(real("T", 1).with_unit("K", Some("degC"))).unwrap();

        let var = md.variable_by_name("T").unwrap();
        let du = md.variable_display_unit(var).unwrap();
        assert_eq!(du.name(), "degC");
        assert_eq!(md.base_unit(du).map(Unit::name), Some("K"));
        assert_eq!(md.unit(0).map(Unit::name), Some("K"));

        let stats = md.stats();
        assert_eq!(stats.num_units, 1);
        assert_eq!(stats.num_display_units, 1);
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let mut md = ModelDescription::new();
        let err = md.add_variable(real("T", 1).with_unit("K", None)).unwrap_err();
        assert!(matches!(err, ModelError::UnknownUnit { .. }));

        md.add_unit(Unit::new("K")).unwrap();
        let err = md.add_variable(real("T", 1).with_unit("K", Some("degF"))).unwrap_err();
        assert!(matches!(err, ModelError::UnknownDisplayUnit { .. }));
    }

    #[test]
    fn test_zero_factor_rejected() {
        let mut md = ModelDescription::new();
        let err = md
            .add_unit(Unit::new("m").with_display_unit(DisplayUnit::new("broken", 0.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, ModelError::ZeroFactor(name) if name == "broken"));
    }
}
