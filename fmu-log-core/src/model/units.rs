//! Unit definitions and display unit conversion

use serde::{Deserialize, Serialize};

/// A display unit: an affine transform of its base unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayUnit {
    /// Display unit name (e.g., "degC")
    pub name: String,
    /// Gain applied to a base unit value
    #[serde(default = "default_factor")]
    pub factor: f64,
    /// Offset added after the gain
    #[serde(default)]
    pub offset: f64,
}

fn default_factor() -> f64 {
    1.0
}

impl DisplayUnit {
    /// Create a display unit with the given gain and offset
    pub fn new(name: impl Into<String>, factor: f64, offset: f64) -> Self {
        Self {
            name: name.into(),
            factor,
            offset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// A base unit together with its display units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unit name (e.g., "K")
    pub name: String,
    /// Display units defined on top of this unit
    #[serde(default)]
    pub display_units: Vec<DisplayUnit>,
}

impl Unit {
    /// Create a unit without display units
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_units: Vec::new(),
        }
    }

    /// Builder method: attach a display unit
    pub fn with_display_unit(mut self, display_unit: DisplayUnit) -> Self {
        self.display_units.push(display_unit);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of display units defined for this unit
    pub fn display_unit_count(&self) -> usize {
        self.display_units.len()
    }

    /// Get a display unit by index
    pub fn display_unit(&self, index: usize) -> Option<&DisplayUnit> {
        self.display_units.get(index)
    }

    /// Get a display unit by name
    pub fn display_unit_by_name(&self, name: &str) -> Option<&DisplayUnit> {
        self.display_units.iter().find(|du| du.name == name)
    }

    /// Check whether `display_unit` belongs to this unit
    pub fn owns(&self, display_unit: &DisplayUnit) -> bool {
        self.display_units
            .iter()
            .any(|du| std::ptr::eq(du, display_unit))
    }
}

/// Convert a base unit value into the display unit.
///
/// Relative quantities (differences) ignore the offset.
pub fn convert_to_display_unit(value: f64, display_unit: &DisplayUnit, is_relative: bool) -> f64 {
    if is_relative {
        value * display_unit.factor
    } else {
        value * display_unit.factor + display_unit.offset
    }
}

/// Convert a display unit value back into the base unit.
pub fn convert_from_display_unit(value: f64, display_unit: &DisplayUnit, is_relative: bool) -> f64 {
    if is_relative {
        value / display_unit.factor
    } else {
        (value - display_unit.offset) / display_unit.factor
    }
}
