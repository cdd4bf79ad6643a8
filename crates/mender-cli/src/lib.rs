use anyhow::Result;
use clap::ValueEnum;
use mender_core::{FallbackTable, PersistPolicy, ResolverConfig, Session, WeightStore};
use std::path::PathBuf;
use std::time::Duration;

pub mod commands;

pub const DEFAULT_WEIGHT_FILE: &str = "selectors_weight.json";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Table,
}

/// When `resolve` and `login` write learned weights back
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PersistMode {
    /// Once, after every requested field resolved
    End,
    /// After each successful resolution
    Every,
}

impl From<PersistMode> for PersistPolicy {
    fn from(mode: PersistMode) -> Self {
        match mode {
            PersistMode::End => PersistPolicy::OnSessionEnd,
            PersistMode::Every => PersistPolicy::EveryUpdate,
        }
    }
}

/// Everything needed to open a resolution session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub weights: PathBuf,
    pub fallback: Option<PathBuf>,
    pub timeout_ms: u64,
    pub persist: PersistMode,
}

impl SessionOptions {
    /// Built-in fallback table unless a replacement file was given
    pub fn fallback_table(&self) -> Result<FallbackTable> {
        match &self.fallback {
            Some(path) => Ok(FallbackTable::from_file(path)?),
            None => Ok(FallbackTable::builtin()),
        }
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new()
            .with_probe_timeout(Duration::from_millis(self.timeout_ms))
            .with_persist(self.persist.into())
    }

    pub fn open(&self) -> Result<Session> {
        let session = Session::open(
            WeightStore::new(&self.weights),
            self.fallback_table()?,
            self.resolver_config(),
        )?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_options_defaults() {
        let options = SessionOptions {
            weights: PathBuf::from(DEFAULT_WEIGHT_FILE),
            fallback: None,
            timeout_ms: mender_core::resolver::DEFAULT_PROBE_TIMEOUT_MS,
            persist: PersistMode::End,
        };
        let config = options.resolver_config();

        assert_eq!(config.probe_timeout, Duration::from_millis(2000));
        assert_eq!(config.persist, PersistPolicy::OnSessionEnd);
        assert_eq!(
            options.fallback_table().unwrap(),
            FallbackTable::builtin()
        );
    }

    #[test]
    fn test_persist_mode_maps_to_policy() {
        assert_eq!(PersistPolicy::from(PersistMode::Every), PersistPolicy::EveryUpdate);
        assert_eq!(PersistPolicy::from(PersistMode::End), PersistPolicy::OnSessionEnd);
    }
}
