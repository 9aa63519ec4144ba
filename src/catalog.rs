//! Logical field catalog: the prioritized alias table that absorbs
//! year-to-year schema drift.
//!
//! Each [`FieldSpec`] names one stable logical field together with the column
//! names releases have used for it, in priority order. The resolver and the
//! projector both consume the same catalog, so presence checks happen in one
//! place. The built-in catalog covers the STATS19 extract fields; a YAML file
//! can replace it when a new release invents yet another spelling.

use std::{fmt, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

/// Canonical name the outcome column carries in the tidy output, whatever the
/// source release called it.
pub const OUTCOME_FIELD: &str = "severity";

/// Logical name of the collision date field; the derived year/month columns
/// ride along with it through the projection.
pub const DATE_FIELD: &str = "date";

/// Which source table a field is read from once the tables are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Casualty,
    Vehicle,
    Collision,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRole::Casualty => write!(f, "casualty"),
            FieldRole::Vehicle => write!(f, "vehicle"),
            FieldRole::Collision => write!(f, "collision"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Logical field name; doubles as the only alias when none are listed.
    pub name: String,
    /// Column names to try, highest priority first.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Required fields must resolve or the run aborts; optional fields are
    /// silently omitted from the projection when absent.
    #[serde(default)]
    pub required: bool,
    pub role: FieldRole,
}

impl FieldSpec {
    fn new(name: &str, aliases: &[&str], required: bool, role: FieldRole) -> Self {
        FieldSpec {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            required,
            role,
        }
    }

    /// Alias list consulted during resolution. Falls back to the logical name
    /// so simple fields need no alias entry.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        let fallback = std::slice::from_ref(&self.name);
        let list = if self.aliases.is_empty() {
            fallback
        } else {
            self.aliases.as_slice()
        };
        list.iter().map(|s| s.as_str())
    }

    /// First candidate present among `headers`, or `None` when the field is
    /// absent from this release. When several candidates are present the
    /// earlier one wins and the rest are ignored.
    pub fn resolve<'a>(&self, headers: &'a [String]) -> Option<&'a str> {
        self.candidates()
            .find_map(|alias| headers.iter().find(|h| h.as_str() == alias))
            .map(|h| h.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub fields: Vec<FieldSpec>,
}

impl FieldCatalog {
    /// Catalog order is projection order.
    pub fn builtin() -> Self {
        use FieldRole::{Casualty, Collision, Vehicle};
        FieldCatalog {
            fields: vec![
                FieldSpec::new("accident_index", &[], true, Casualty),
                FieldSpec::new("vehicle_reference", &[], true, Casualty),
                FieldSpec::new(OUTCOME_FIELD, &["severity", "casualty_severity"], false, Casualty),
                FieldSpec::new("casualty_class", &[], false, Casualty),
                FieldSpec::new("sex_of_casualty", &[], false, Casualty),
                FieldSpec::new("age_band_of_casualty", &[], false, Casualty),
                FieldSpec::new("sex_of_driver", &[], false, Vehicle),
                FieldSpec::new("age_band_of_driver", &[], false, Vehicle),
                FieldSpec::new("vehicle_type", &[], false, Vehicle),
                FieldSpec::new("date", &["date", "accident_date"], false, Collision),
                FieldSpec::new("light_conditions", &[], false, Collision),
                FieldSpec::new("weather_conditions", &[], false, Collision),
                FieldSpec::new("road_type", &[], false, Collision),
                FieldSpec::new("speed_limit", &[], false, Collision),
                FieldSpec::new("local_authority_(district)", &[], false, Collision),
                FieldSpec::new("police_force", &[], false, Collision),
                FieldSpec::new("number_of_vehicles", &[], false, Collision),
                FieldSpec::new("number_of_casualties", &[], false, Collision),
                FieldSpec::new("longitude", &[], false, Collision),
                FieldSpec::new("latitude", &[], false, Collision),
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Opening field catalog {path:?}"))?;
        let reader = BufReader::new(file);
        let catalog: FieldCatalog =
            serde_yaml::from_reader(reader).context("Parsing field catalog YAML")?;
        catalog.ensure_valid()?;
        Ok(catalog)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn resolve<'a>(&self, name: &str, headers: &'a [String]) -> Option<&'a str> {
        self.field(name).and_then(|field| field.resolve(headers))
    }

    fn ensure_valid(&self) -> Result<()> {
        ensure!(!self.fields.is_empty(), "Field catalog defines no fields");
        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            ensure!(
                !field.name.trim().is_empty(),
                "Field catalog contains a field without a name"
            );
            if !seen.insert(field.name.as_str()) {
                bail!("Field catalog defines '{}' more than once", field.name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn resolve_returns_first_candidate_in_priority_order() {
        let spec = FieldSpec::new(
            OUTCOME_FIELD,
            &["severity", "casualty_severity"],
            false,
            FieldRole::Casualty,
        );
        let both = headers(&["casualty_severity", "severity"]);
        assert_eq!(spec.resolve(&both), Some("severity"));

        let second_only = headers(&["accident_index", "casualty_severity"]);
        assert_eq!(spec.resolve(&second_only), Some("casualty_severity"));
    }

    #[test]
    fn resolve_returns_none_when_no_candidate_present() {
        let spec = FieldSpec::new("date", &["date", "accident_date"], false, FieldRole::Collision);
        assert_eq!(spec.resolve(&headers(&["accident_index", "time"])), None);
    }

    #[test]
    fn name_is_the_fallback_candidate() {
        let spec = FieldSpec::new("vehicle_type", &[], false, FieldRole::Vehicle);
        assert_eq!(spec.candidates().collect::<Vec<_>>(), vec!["vehicle_type"]);
        assert_eq!(
            spec.resolve(&headers(&["vehicle_type"])),
            Some("vehicle_type")
        );
    }

    #[test]
    fn builtin_catalog_starts_with_the_casualty_keys() {
        let catalog = FieldCatalog::builtin();
        let names: Vec<_> = catalog.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names[0], "accident_index");
        assert_eq!(names[1], "vehicle_reference");
        assert!(catalog.field("accident_index").unwrap().required);
        assert!(!catalog.field(OUTCOME_FIELD).unwrap().required);
    }

    #[test]
    fn ensure_valid_rejects_duplicate_fields() {
        let catalog = FieldCatalog {
            fields: vec![
                FieldSpec::new("date", &[], false, FieldRole::Collision),
                FieldSpec::new("date", &[], false, FieldRole::Collision),
            ],
        };
        assert!(catalog.ensure_valid().is_err());
    }
}
