//! Insurer rate configs and salesperson override rates.

use super::DEFAULT_SALESPERSON_RATE;
use crate::config::Config;
use crate::domain::{Decimal, RateConfig};
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read rate table {path}: {message}")]
    Io { path: String, message: String },
    #[error("csv parse error: {0}")]
    Csv(String),
    #[error("rate for {owner} must be within [0, 1], got {rate}")]
    RateOutOfRange { owner: String, rate: Decimal },
}

/// Immutable lookup tables consulted by the calculator.
///
/// Insurer configs are kept as an ordered list: when two active configs share
/// a name, the one registered first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRegistry {
    insurers: Vec<RateConfig>,
    salesperson_rates: BTreeMap<String, Decimal>,
    default_salesperson_rate: Decimal,
}

impl RateRegistry {
    /// Build a registry from explicit tables, rejecting rates outside [0, 1].
    pub fn new(
        insurers: Vec<RateConfig>,
        salesperson_rates: BTreeMap<String, Decimal>,
    ) -> Result<Self, RegistryError> {
        for config in &insurers {
            check_rate(&config.insurer_name, config.first_year_rate)?;
            check_rate(&config.insurer_name, config.recurring_rate)?;
        }
        for (name, rate) in &salesperson_rates {
            check_rate(name, *rate)?;
        }

        Ok(RateRegistry {
            insurers,
            salesperson_rates,
            default_salesperson_rate: DEFAULT_SALESPERSON_RATE,
        })
    }

    /// Replace the fallback rate for salespersons without an override.
    pub fn with_default_salesperson_rate(mut self, rate: Decimal) -> Result<Self, RegistryError> {
        check_rate("default salesperson rate", rate)?;
        self.default_salesperson_rate = rate;
        Ok(self)
    }

    /// The compiled-in tables.
    pub fn builtin() -> Self {
        let now = Utc::now();
        let insurers = vec![
            RateConfig::new(
                "spvie",
                "SPVIE",
                Decimal::from_scaled(30, 2),
                Decimal::from_scaled(15, 2),
                now,
            ),
            RateConfig::new(
                "april",
                "APRIL",
                Decimal::from_scaled(28, 2),
                Decimal::from_scaled(14, 2),
                now,
            ),
            RateConfig::new(
                "neoliane",
                "NÉOLIANE",
                Decimal::from_scaled(32, 2),
                Decimal::from_scaled(16, 2),
                now,
            ),
        ];

        let salesperson_rates = [
            ("SNOUSSI ZOUH", 306),
            ("Radhia MAATOUG", 274),
            ("Qualite premunia", 263),
            ("KHRIBI Mariem", 279),
            ("HADIR SFAR", 332),
            ("Gestion PREM", 287),
            ("DAHMANI Mouna", 269),
            ("CHAOUABI CH", 300),
        ]
        .into_iter()
        .map(|(name, millis)| (name.to_string(), Decimal::from_scaled(millis, 3)))
        .collect();

        RateRegistry {
            insurers,
            salesperson_rates,
            default_salesperson_rate: DEFAULT_SALESPERSON_RATE,
        }
    }

    /// Build the registry described by the configuration: rate files when
    /// configured, built-in tables otherwise.
    pub fn load(config: &Config) -> Result<Self, RegistryError> {
        let builtin = Self::builtin();

        let insurers = match &config.insurer_rates_file {
            Some(path) => {
                let configs = parse_insurers_csv(&read_file(path)?)?;
                info!(path = %path.display(), count = configs.len(), "Loaded insurer rate table");
                configs
            }
            None => builtin.insurers,
        };

        let salesperson_rates = match &config.salesperson_rates_file {
            Some(path) => {
                let rates = parse_salesperson_csv(&read_file(path)?)?;
                info!(path = %path.display(), count = rates.len(), "Loaded salesperson rate table");
                rates
            }
            None => builtin.salesperson_rates,
        };

        let registry = Self::new(insurers, salesperson_rates)?;
        match config.default_salesperson_rate {
            Some(rate) => registry.with_default_salesperson_rate(rate),
            None => Ok(registry),
        }
    }

    /// First active config whose name matches case-insensitively.
    pub fn lookup_insurer_config(&self, name: &str) -> Option<&RateConfig> {
        self.insurers
            .iter()
            .find(|config| config.active && config.matches_name(name))
    }

    /// Active configs in registration order.
    pub fn list_active_configs(&self) -> impl Iterator<Item = &RateConfig> + '_ {
        self.insurers.iter().filter(|config| config.active)
    }

    /// Override rate for an exact (case-sensitive) salesperson name, or the
    /// default fallback rate.
    pub fn lookup_salesperson_rate(&self, name: &str) -> Decimal {
        self.salesperson_override(name)
            .unwrap_or(self.default_salesperson_rate)
    }

    /// Override rate without the fallback.
    pub fn salesperson_override(&self, name: &str) -> Option<Decimal> {
        self.salesperson_rates.get(name).copied()
    }

    /// All overrides, sorted by salesperson name.
    pub fn list_salesperson_overrides(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.salesperson_rates
            .iter()
            .map(|(name, rate)| (name.as_str(), *rate))
    }

    pub fn default_salesperson_rate(&self) -> Decimal {
        self.default_salesperson_rate
    }
}

fn check_rate(owner: &str, rate: Decimal) -> Result<(), RegistryError> {
    if rate.is_negative() || rate > Decimal::from(1) {
        return Err(RegistryError::RateOutOfRange {
            owner: owner.to_string(),
            rate,
        });
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>, RegistryError> {
    std::fs::read(path).map_err(|e| RegistryError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, RegistryError> {
    Decimal::from_str_canonical(value)
        .map_err(|e| RegistryError::Csv(format!("invalid {}: {}", field, e)))
}

fn parse_optional_decimal(field: &str, value: Option<&str>) -> Result<Option<Decimal>, RegistryError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_decimal(field, s))
        .transpose()
}

fn parse_active(value: &str) -> Result<bool, RegistryError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(RegistryError::Csv(format!("invalid active flag: {}", other))),
    }
}

/// Parse an insurer rate table.
///
/// Columns: `insurer_id,insurer_name,first_year_rate,recurring_rate,active`
/// with optional `min_premium,max_premium`. Row order is registration order.
pub fn parse_insurers_csv(csv_bytes: &[u8]) -> Result<Vec<RateConfig>, RegistryError> {
    #[derive(Debug, serde::Deserialize)]
    struct Row {
        insurer_id: String,
        insurer_name: String,
        first_year_rate: String,
        recurring_rate: String,
        active: String,
        min_premium: Option<String>,
        max_premium: Option<String>,
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_bytes);

    let now = Utc::now();
    let mut configs = Vec::new();
    for record in reader.deserialize::<Row>() {
        let row = record.map_err(|e| RegistryError::Csv(e.to_string()))?;
        configs.push(RateConfig {
            first_year_rate: parse_decimal("first_year_rate", &row.first_year_rate)?,
            recurring_rate: parse_decimal("recurring_rate", &row.recurring_rate)?,
            active: parse_active(&row.active)?,
            created_at: now,
            min_premium: parse_optional_decimal("min_premium", row.min_premium.as_deref())?,
            max_premium: parse_optional_decimal("max_premium", row.max_premium.as_deref())?,
            insurer_id: row.insurer_id,
            insurer_name: row.insurer_name,
        });
    }

    Ok(configs)
}

/// Parse a salesperson override table with columns `salesperson,rate`.
///
/// Names are kept verbatim (apart from surrounding whitespace) since lookups
/// are case-sensitive. A repeated name keeps its last rate.
pub fn parse_salesperson_csv(csv_bytes: &[u8]) -> Result<BTreeMap<String, Decimal>, RegistryError> {
    #[derive(Debug, serde::Deserialize)]
    struct Row {
        salesperson: String,
        rate: String,
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_bytes);

    let mut rates = BTreeMap::new();
    for record in reader.deserialize::<Row>() {
        let row = record.map_err(|e| RegistryError::Csv(e.to_string()))?;
        let rate = parse_decimal("rate", &row.rate)?;
        rates.insert(row.salesperson, rate);
    }

    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_builtin_lists_three_active_insurers_in_order() {
        let registry = RateRegistry::builtin();
        let names: Vec<&str> = registry
            .list_active_configs()
            .map(|c| c.insurer_name.as_str())
            .collect();
        assert_eq!(names, vec!["SPVIE", "APRIL", "NÉOLIANE"]);
    }

    #[test]
    fn test_list_active_configs_is_restartable() {
        let registry = RateRegistry::builtin();
        assert_eq!(registry.list_active_configs().count(), 3);
        assert_eq!(registry.list_active_configs().count(), 3);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = RateRegistry::builtin();
        let config = registry.lookup_insurer_config("spvie").unwrap();
        assert_eq!(config.insurer_id, "spvie");
        assert_eq!(config.first_year_rate, dec("0.30"));
        assert_eq!(config.recurring_rate, dec("0.15"));

        assert!(registry.lookup_insurer_config("Néoliane").is_some());
        assert!(registry.lookup_insurer_config("UNKNOWN_CO").is_none());
    }

    #[test]
    fn test_inactive_configs_are_invisible() {
        let now = Utc::now();
        let registry = RateRegistry::new(
            vec![
                RateConfig::new("a", "ACME", dec("0.2"), dec("0.1"), now).deactivated(),
                RateConfig::new("b", "OTHER", dec("0.2"), dec("0.1"), now),
            ],
            BTreeMap::new(),
        )
        .unwrap();

        assert!(registry.lookup_insurer_config("acme").is_none());
        assert_eq!(registry.list_active_configs().count(), 1);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_active() {
        let now = Utc::now();
        let registry = RateRegistry::new(
            vec![
                RateConfig::new("old", "ACME", dec("0.1"), dec("0.05"), now).deactivated(),
                RateConfig::new("first", "Acme", dec("0.2"), dec("0.1"), now),
                RateConfig::new("second", "ACME", dec("0.4"), dec("0.2"), now),
            ],
            BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(registry.lookup_insurer_config("acme").unwrap().insurer_id, "first");
    }

    #[test]
    fn test_salesperson_rate_and_fallback() {
        let registry = RateRegistry::builtin();
        assert_eq!(registry.lookup_salesperson_rate("SNOUSSI ZOUH"), dec("0.306"));
        assert_eq!(registry.lookup_salesperson_rate("unknown person"), dec("0.03"));
        // Exact match only.
        assert_eq!(registry.lookup_salesperson_rate("snoussi zouh"), dec("0.03"));
        assert_eq!(registry.salesperson_override("snoussi zouh"), None);
    }

    #[test]
    fn test_custom_default_salesperson_rate() {
        let registry = RateRegistry::builtin()
            .with_default_salesperson_rate(dec("0.05"))
            .unwrap();
        assert_eq!(registry.lookup_salesperson_rate("nobody"), dec("0.05"));
        assert!(RateRegistry::builtin()
            .with_default_salesperson_rate(dec("1.5"))
            .is_err());
    }

    #[test]
    fn test_rates_out_of_range_rejected() {
        let now = Utc::now();
        let err = RateRegistry::new(
            vec![RateConfig::new("x", "X", dec("1.2"), dec("0.1"), now)],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::RateOutOfRange { .. }));

        let mut overrides = BTreeMap::new();
        overrides.insert("Someone".to_string(), dec("-0.1"));
        assert!(RateRegistry::new(Vec::new(), overrides).is_err());
    }

    #[test]
    fn test_parse_insurers_csv() {
        let csv = "insurer_id,insurer_name,first_year_rate,recurring_rate,active,min_premium,max_premium\n\
                   acme,ACME,0.25,0.12,true,,\n\
                   beta,Beta Assurances,0.2,0.1,false,10,5000\n";
        let configs = parse_insurers_csv(csv.as_bytes()).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].insurer_name, "ACME");
        assert_eq!(configs[0].first_year_rate, dec("0.25"));
        assert!(configs[0].active);
        assert_eq!(configs[0].min_premium, None);
        assert!(!configs[1].active);
        assert_eq!(configs[1].max_premium, Some(dec("5000")));
    }

    #[test]
    fn test_parse_insurers_csv_without_threshold_columns() {
        let csv = "insurer_id,insurer_name,first_year_rate,recurring_rate,active\nacme,ACME,0.25,0.12,1\n";
        let configs = parse_insurers_csv(csv.as_bytes()).unwrap();
        assert_eq!(configs.len(), 1);
        assert!(configs[0].active);
    }

    #[test]
    fn test_parse_insurers_csv_invalid_rate_errors() {
        let csv = "insurer_id,insurer_name,first_year_rate,recurring_rate,active\nacme,ACME,lots,0.12,true\n";
        let err = parse_insurers_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::Csv(_)));
    }

    #[test]
    fn test_parse_salesperson_csv() {
        let csv = "salesperson,rate\nJane DOE,0.31\nJohn Roe,0.25\n";
        let rates = parse_salesperson_csv(csv.as_bytes()).unwrap();
        assert_eq!(rates.get("Jane DOE"), Some(&dec("0.31")));
        assert_eq!(rates.len(), 2);
    }

    fn load_config(
        insurers: Option<std::path::PathBuf>,
        salespersons: Option<std::path::PathBuf>,
        default_rate: Option<Decimal>,
    ) -> Config {
        Config {
            port: 8080,
            database_path: "unused.db".to_string(),
            insurer_rates_file: insurers,
            salesperson_rates_file: salespersons,
            default_salesperson_rate: default_rate,
        }
    }

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_without_files_uses_builtin_tables() {
        let registry = RateRegistry::load(&load_config(None, None, None)).unwrap();
        let builtin = RateRegistry::builtin();

        let names: Vec<&str> = registry
            .list_active_configs()
            .map(|c| c.insurer_name.as_str())
            .collect();
        assert_eq!(names, vec!["SPVIE", "APRIL", "NÉOLIANE"]);
        assert!(registry
            .list_salesperson_overrides()
            .eq(builtin.list_salesperson_overrides()));
        assert_eq!(registry.default_salesperson_rate(), dec("0.03"));
    }

    #[test]
    fn test_load_insurer_file_replaces_builtin_insurers() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "insurers.csv",
            "insurer_id,insurer_name,first_year_rate,recurring_rate,active\n\
             acme,ACME,0.25,0.10,true\n\
             old,OLD,0.20,0.10,false\n",
        );

        let registry = RateRegistry::load(&load_config(Some(path), None, None)).unwrap();
        assert!(registry.lookup_insurer_config("SPVIE").is_none());
        assert!(registry.lookup_insurer_config("OLD").is_none());
        assert_eq!(
            registry.lookup_insurer_config("acme").unwrap().first_year_rate,
            dec("0.25")
        );
        // Salesperson table untouched.
        assert_eq!(registry.salesperson_override("SNOUSSI ZOUH"), Some(dec("0.306")));
    }

    #[test]
    fn test_load_salesperson_file_and_default_rate() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_csv(&dir, "salespersons.csv", "salesperson,rate\nJane DOE,0.2\n");

        let registry =
            RateRegistry::load(&load_config(None, Some(path), Some(dec("0.05")))).unwrap();
        assert_eq!(registry.lookup_salesperson_rate("Jane DOE"), dec("0.2"));
        assert_eq!(registry.lookup_salesperson_rate("SNOUSSI ZOUH"), dec("0.05"));
        assert_eq!(registry.default_salesperson_rate(), dec("0.05"));
        assert!(registry.lookup_insurer_config("SPVIE").is_some());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.csv");

        let err = RateRegistry::load(&load_config(Some(missing), None, None)).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_load_rejects_out_of_range_rates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_csv(&dir, "salespersons.csv", "salesperson,rate\nGreedy,1.5\n");

        let err = RateRegistry::load(&load_config(None, Some(path), None)).unwrap_err();
        assert!(matches!(err, RegistryError::RateOutOfRange { ref owner, .. } if owner == "Greedy"));

        let err = RateRegistry::load(&load_config(None, None, Some(dec("-0.01")))).unwrap_err();
        assert!(matches!(err, RegistryError::RateOutOfRange { .. }));
    }
}
