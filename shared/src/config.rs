use anyhow::{bail, Context, Result};
use std::{path::PathBuf, str::FromStr};
use strum::{Display, EnumString};

pub struct AppConfig {
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
    pub assistant: AssistantConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // 環境変数の読み出し元を差し替えられるようにしておく（テストでは HashMap を渡す）
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port: parse_or(&lookup, "SERVER_PORT", 8080)?,
        };

        let locations = match lookup("OFFICE_LOCATIONS") {
            Some(raw) => parse_locations(&raw)?,
            None => parse_locations(DEFAULT_LOCATIONS)?,
        };

        let ledger = LedgerConfig {
            locations,
            waitlist_cap: parse_or(&lookup, "WAITLIST_CAP", DEFAULT_WAITLIST_CAP)?,
            weekly_minimum_days: parse_or(&lookup, "WEEKLY_MINIMUM_DAYS", 3)?,
            compliance_threshold: parse_or(&lookup, "COMPLIANCE_THRESHOLD", 10)?,
            admission: parse_or(&lookup, "ADMISSION_POLICY", AdmissionPolicy::Strict)?,
            event_buffer: parse_or(&lookup, "EVENT_BUFFER", 256)?,
        };
        if ledger.event_buffer == 0 {
            bail!("EVENT_BUFFER must be greater than zero");
        }

        let assistant = AssistantConfig {
            endpoint: lookup("ASSISTANT_ENDPOINT").filter(|s| !s.trim().is_empty()),
            api_key: lookup("ASSISTANT_API_KEY").filter(|s| !s.trim().is_empty()),
            model: lookup("ASSISTANT_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
            timeout_secs: parse_or(&lookup, "ASSISTANT_TIMEOUT_SECS", 20)?,
        };

        let seed = SeedConfig {
            users_csv: lookup("SEED_USERS_CSV").map(PathBuf::from),
        };

        Ok(Self {
            server,
            ledger,
            assistant,
            seed,
        })
    }
}

const DEFAULT_LOCATIONS: &str = "Bengaluru:120,Chennai:80,Hyderabad:60";
pub const DEFAULT_WAITLIST_CAP: usize = 20;

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSeed {
    pub name: String,
    pub capacity: u32,
}

/// 定員に達した日への予約をどう扱うか。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AdmissionPolicy {
    /// 定員到達後の予約・繰り上げを拒否する
    #[default]
    Strict,
    /// 定員は参考値として扱い、常に確定させる
    Advisory,
}

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub locations: Vec<LocationSeed>,
    pub waitlist_cap: usize,
    pub weekly_minimum_days: usize,
    pub compliance_threshold: usize,
    pub admission: AdmissionPolicy,
    pub event_buffer: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            waitlist_cap: DEFAULT_WAITLIST_CAP,
            weekly_minimum_days: 3,
            compliance_threshold: 10,
            admission: AdmissionPolicy::Strict,
            event_buffer: 256,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

pub struct SeedConfig {
    pub users_csv: Option<PathBuf>,
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
    }
}

// "Bengaluru:120,Chennai:80" 形式
fn parse_locations(raw: &str) -> Result<Vec<LocationSeed>> {
    let mut seeds = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((name, capacity)) = item.rsplit_once(':') else {
            bail!("location entry {item:?} must look like name:capacity");
        };
        let capacity: u32 = capacity
            .trim()
            .parse()
            .with_context(|| format!("invalid capacity in location entry {item:?}"))?;
        if capacity == 0 {
            bail!("location {name:?} must have a capacity greater than zero");
        }
        let name = name.trim();
        if seeds.iter().any(|s: &LocationSeed| s.name.eq_ignore_ascii_case(name)) {
            bail!("location {name:?} is listed twice");
        }
        seeds.push(LocationSeed {
            name: name.to_string(),
            capacity,
        });
    }
    if seeds.is_empty() {
        bail!("at least one office location must be configured");
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() -> Result<()> {
        let config = config_from(&[])?;
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ledger.waitlist_cap, 20);
        assert_eq!(config.ledger.weekly_minimum_days, 3);
        assert_eq!(config.ledger.compliance_threshold, 10);
        assert_eq!(config.ledger.admission, AdmissionPolicy::Strict);
        assert_eq!(config.ledger.locations.len(), 3);
        assert!(config.assistant.endpoint.is_none());
        assert!(config.seed.users_csv.is_none());
        Ok(())
    }

    #[test]
    fn locations_and_policy_are_parsed() -> Result<()> {
        let config = config_from(&[
            ("OFFICE_LOCATIONS", "Pune:5, Kochi : 2"),
            ("ADMISSION_POLICY", "advisory"),
            ("SERVER_PORT", "9000"),
        ])?;
        assert_eq!(
            config.ledger.locations,
            vec![
                LocationSeed {
                    name: "Pune".into(),
                    capacity: 5
                },
                LocationSeed {
                    name: "Kochi".into(),
                    capacity: 2
                },
            ]
        );
        assert_eq!(config.ledger.admission, AdmissionPolicy::Advisory);
        assert_eq!(config.server.port, 9000);
        Ok(())
    }

    #[test]
    fn zero_capacity_and_bad_numbers_are_rejected() {
        assert!(config_from(&[("OFFICE_LOCATIONS", "Pune:0")]).is_err());
        assert!(config_from(&[("OFFICE_LOCATIONS", "Pune")]).is_err());
        assert!(config_from(&[("OFFICE_LOCATIONS", "Pune:3,pune:4")]).is_err());
        assert!(config_from(&[("WAITLIST_CAP", "many")]).is_err());
        assert!(config_from(&[("ADMISSION_POLICY", "lenient")]).is_err());
    }
}
