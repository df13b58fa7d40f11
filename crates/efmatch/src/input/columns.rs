//! Which CSV columns feed the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{EfmatchError, Result};

/// Default name of the label column.
pub const DEFAULT_NAME_COLUMN: &str = "name";

/// Column names holding an activity amount and its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityColumns {
    pub value: String,
    pub unit: String,
}

/// Mapping from record fields to CSV column names.
///
/// The activity columns are configured as a pair or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column with the label to resolve. Always required.
    pub name: String,

    /// Column with the region filter.
    pub region: Option<String>,

    /// Columns with the activity amount and unit.
    pub activity: Option<ActivityColumns>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_COLUMN)
    }
}

impl ColumnConfig {
    /// Create a config that only reads the label column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            activity: None,
        }
    }

    /// Read the region from `column`.
    pub fn with_region(mut self, column: impl Into<String>) -> Self {
        self.region = Some(column.into());
        self
    }

    /// Read the activity amount and unit from `value` and `unit`.
    pub fn with_activity(mut self, value: impl Into<String>, unit: impl Into<String>) -> Self {
        self.activity = Some(ActivityColumns {
            value: value.into(),
            unit: unit.into(),
        });
        self
    }

    /// Build a config from independently supplied column names.
    ///
    /// Fails when only one of the activity columns is given.
    pub fn from_parts(
        name: impl Into<String>,
        region: Option<String>,
        activity_value: Option<String>,
        activity_unit: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EfmatchError::Config(
                "name column must not be blank".to_string(),
            ));
        }

        let activity = match (activity_value, activity_unit) {
            (Some(value), Some(unit)) => Some(ActivityColumns { value, unit }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(EfmatchError::Config(
                    "activity value column given without an activity unit column".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(EfmatchError::Config(
                    "activity unit column given without an activity value column".to_string(),
                ));
            }
        };

        Ok(Self {
            name,
            region,
            activity,
        })
    }

    /// Fields every row must carry, in column-config order.
    pub fn required_fields(&self) -> Vec<String> {
        let mut fields = vec![self.name.clone()];
        if let Some(ref region) = self.region {
            fields.push(region.clone());
        }
        if let Some(ref activity) = self.activity {
            fields.push(activity.value.clone());
            fields.push(activity.unit.clone());
        }
        fields
    }

    /// Whether rows can carry an activity amount.
    pub fn has_activity(&self) -> bool {
        self.activity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_name_only() {
        assert_eq!(ColumnConfig::default().required_fields(), vec!["name"]);
    }

    #[test]
    fn test_required_fields_all_columns() {
        let config = ColumnConfig::new("label")
            .with_region("country")
            .with_activity("spend", "currency");

        assert_eq!(
            config.required_fields(),
            vec!["label", "country", "spend", "currency"]
        );
        assert!(config.has_activity());
    }

    #[test]
    fn test_from_parts_complete_pair() {
        let config = ColumnConfig::from_parts(
            "name",
            Some("region".to_string()),
            Some("amount".to_string()),
            Some("unit".to_string()),
        )
        .unwrap();

        let expected = ColumnConfig::new("name")
            .with_region("region")
            .with_activity("amount", "unit");
        assert_eq!(config, expected);
    }

    #[test]
    fn test_from_parts_half_pair_is_config_error() {
        let err = ColumnConfig::from_parts("name", None, Some("amount".to_string()), None)
            .unwrap_err();
        assert!(matches!(err, EfmatchError::Config(_)));

        let err = ColumnConfig::from_parts("name", None, None, Some("unit".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("without an activity value column"));
    }

    #[test]
    fn test_from_parts_blank_name() {
        assert!(ColumnConfig::from_parts(" ", None, None, None).is_err());
    }
}
