//! Model file loading and parsing

use anyhow::{Context, Result};
use fmu_log_core::{ExpanderConfig, ModelDescription, Unit, VariableDefinition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Model file contents (TOML or JSON)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelFile {
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub logging: ExpanderConfig,
}

impl ModelFile {
    /// Build the model description store. Units go in first so variables can
    /// reference them.
    pub fn build_model(&self) -> Result<ModelDescription> {
        let mut model = ModelDescription::new();
        for unit in &self.units {
            model
                .add_unit(unit.clone())
                .with_context(|| format!("Invalid unit definition: {}", unit.name))?;
        }
        for variable in &self.variables {
            model
                .add_variable(variable.clone())
                .with_context(|| format!("Invalid variable definition: {}", variable.name))?;
        }
        Ok(model)
    }
}

/// Load a model file; `.json` files are read as JSON, everything else as TOML
pub fn load_model_file(path: &Path) -> Result<ModelFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file: {:?}", path))?;

    let is_json = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let model_file: ModelFile = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse model file: {:?}", path))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse model file: {:?}", path))?
    };

    log::debug!(
        "Model file {:?}: {} unit(s), {} variable(s)",
        path,
        model_file.units.len(),
        model_file.variables.len()
    );
    Ok(model_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmu_log_core::{BaseType, LogLevel, VariableResolver};
    use std::io::Write;

    const TOML_MODEL: &str = r#"
        [logging]
        min_level = "warning"
        max_message_size = 256

        [[units]]
        name = "K"
        display_units = [{ name = "degC", offset = -273.15 }]

        [[variables]]
        name = "Temperature"
        value_reference = 42
        type = "real"
        variability = "continuous"
        causality = "output"
        unit = "K"
        display_unit = "degC"

        [[variables]]
        name = "Temperature_alias"
        value_reference = 42
        type = "real"
        variability = "continuous"
        causality = "output"
        alias = "alias"

        [[variables]]
        name = "k"
        value_reference = 1
        type = "real"
        variability = "fixed"
        causality = "calculatedParameter"
    "#;

    #[test]
    fn test_toml_model_deserialization() {
        let model_file: ModelFile = toml::from_str(TOML_MODEL).unwrap();
        assert_eq!(model_file.units.len(), 1);
        assert_eq!(model_file.units[0].display_units[0].factor, 1.0);
        assert_eq!(model_file.variables.len(), 3);
        assert_eq!(model_file.logging.min_level, LogLevel::Warning);
        assert_eq!(model_file.logging.max_message_size, 256);
        assert_eq!(model_file.logging.reserve_slack, 100);

        let model = model_file.build_model().unwrap();
        assert_eq!(model.resolve(BaseType::Real, 42), Some("Temperature"));
        assert_eq!(model.counts().num_parameters, 1);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"variables": [{{"name": "n", "value_reference": 3, "type": "integer",
                "variability": "discrete", "causality": "input"}}]}}"#
        )
        .unwrap();

        let model_file = load_model_file(file.path()).unwrap();
        let model = model_file.build_model().unwrap();
        assert_eq!(model.resolve(BaseType::Integer, 3), Some("n"));
        assert_eq!(model_file.logging, ExpanderConfig::default());
    }

    #[test]
    fn test_unknown_unit_reported() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
            [[variables]]
            name = "T"
            value_reference = 1
            type = "real"
            variability = "continuous"
            causality = "local"
            unit = "K"
            "#
        )
        .unwrap();

        let model_file = load_model_file(file.path()).unwrap();
        let err = model_file.build_model().unwrap_err();
        assert!(format!("{:#}", err).contains("unknown unit"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_model_file(Path::new("does/not/exist.toml"));
        assert!(result.is_err());
    }
}
