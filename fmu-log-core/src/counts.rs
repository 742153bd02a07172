//! Model variable counts
//!
//! Tallies the variables of a model by variability, causality and base type.
//! The classifications are closed enums, so every variable lands in exactly
//! one bucket of each group.

use crate::model::VariableDefinition;
use crate::types::{BaseType, Causality, Variability};
use serde::Serialize;

/// Number of variables with specific properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelCounts {
    pub num_constants: usize,
    pub num_fixed: usize,
    pub num_tunable: usize,
    pub num_discrete: usize,
    pub num_continuous: usize,

    pub num_parameters: usize,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_local: usize,

    pub num_real_vars: usize,
    pub num_integer_vars: usize,
    pub num_bool_vars: usize,
    pub num_string_vars: usize,
    pub num_enum_vars: usize,
}

impl ModelCounts {
    /// Count all variables in a single pass
    pub fn collect<'a, I>(variables: I) -> Self
    where
        I: IntoIterator<Item = &'a VariableDefinition>,
    {
        let mut counts = Self::default();
        for var in variables {
            counts.add(var);
        }
        counts
    }

    fn add(&mut self, var: &VariableDefinition) {
        match var.variability {
            Variability::Constant => self.num_constants += 1,
            Variability::Fixed => self.num_fixed += 1,
            Variability::Tunable => self.num_tunable += 1,
            Variability::Discrete => self.num_discrete += 1,
            Variability::Continuous => self.num_continuous += 1,
        }

        match var.causality {
            Causality::Parameter | Causality::CalculatedParameter => self.num_parameters += 1,
            Causality::Input => self.num_inputs += 1,
            Causality::Output => self.num_outputs += 1,
            Causality::Local | Causality::Independent => self.num_local += 1,
        }

        match var.base_type {
            BaseType::Real => self.num_real_vars += 1,
            BaseType::Integer => self.num_integer_vars += 1,
            BaseType::Boolean => self.num_bool_vars += 1,
            BaseType::String => self.num_string_vars += 1,
            BaseType::Enumeration => self.num_enum_vars += 1,
        }
    }

    /// Total number of variables counted
    pub fn total(&self) -> usize {
        self.num_real_vars
            + self.num_integer_vars
            + self.num_bool_vars
            + self.num_string_vars
            + self.num_enum_vars
    }
}
