use planning_core::{InvalidInput, RampSchedule};
use serde::Deserialize;
use std::fs;

/// Analyst-editable planning parameters.
///
/// Both fields fall back to the documented defaults when omitted from the
/// config file, so a bare `[params]` table (or none at all) is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanParams {
    /// Average consumption per unit, ㎥ per month.
    #[serde(default = "default_unit_consumption")]
    pub unit_consumption: f64,
    /// Comma-separated move-in ramp percentages, one per month offset.
    #[serde(default = "default_ramp")]
    pub ramp: String,
}

fn default_unit_consumption() -> f64 {
    30.0
}

fn default_ramp() -> String {
    "30,60,85,100".to_string()
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            unit_consumption: default_unit_consumption(),
            ramp: default_ramp(),
        }
    }
}

impl PlanParams {
    pub fn ramp_schedule(&self) -> Result<RampSchedule, InvalidInput> {
        self.ramp.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub params: PlanParams,
    pub api: ApiConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("PLANNING_CONFIG").unwrap_or_else(|_| "planning-config.toml".to_string());
        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_when_table_omitted() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [api]
            bind_addr = "0.0.0.0:8080"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.params.unit_consumption, 30.0);
        assert_eq!(cfg.params.ramp, "30,60,85,100");
        assert!(cfg.metrics.is_none());
        assert!(cfg.params.ramp_schedule().is_ok());
    }

    #[test]
    fn params_override_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [params]
            unit_consumption = 28.5
            ramp = "25,50,75,100,100"

            [api]
            bind_addr = "127.0.0.1:9090"

            [metrics]
            bind_addr = "127.0.0.1:9100"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.params.unit_consumption, 28.5);
        assert_eq!(cfg.params.ramp_schedule().unwrap().len(), 5);
        assert!(cfg.metrics.is_some());
    }
}
