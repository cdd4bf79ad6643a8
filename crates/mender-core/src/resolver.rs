use crate::fallback::FallbackTable;
use crate::probe::{Probe, ProbeError};
use crate::rank::{RankedSelector, rank};
use crate::weights::WeightTable;
use crate::{Error, Result};
use std::time::Duration;

/// Default bounded wait per learned selector
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;

/// When reinforced weights reach the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistPolicy {
    /// Commit once when the session ends; a crash loses the run's reinforcement
    #[default]
    OnSessionEnd,
    /// Save after every successful resolution
    EveryUpdate,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub probe_timeout: Duration,
    pub persist: PersistPolicy,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_persist(mut self, persist: PersistPolicy) -> Self {
        self.persist = persist;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            persist: PersistPolicy::default(),
        }
    }
}

/// Which tier produced the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Learned,
    Fallback,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSource::Learned => "learned",
            MatchSource::Fallback => "fallback",
        }
    }
}

/// A located element and how it was found
#[derive(Debug)]
pub struct Resolution<E> {
    pub element: E,
    pub field_type: String,
    pub selector: String,
    /// Score after reinforcement
    pub score: u64,
    pub source: MatchSource,
}

/// Learned-then-static element resolution
///
/// Learned selectors are tried in rank order, each with a bounded wait and a
/// visibility check. If none match, the fallback table is probed for mere
/// existence. Whichever selector wins is reinforced in the weight table, which
/// is how fallback selectors become learned ones.
pub struct Resolver<'a> {
    fallback: &'a FallbackTable,
    config: &'a ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(fallback: &'a FallbackTable, config: &'a ResolverConfig) -> Self {
        Self { fallback, config }
    }

    /// Resolve `field_type` against the page behind `probe`
    ///
    /// On success the winning selector's score is incremented in `table`. On
    /// exhaustion `table` is left untouched and `Error::ElementNotFound` names
    /// the field-type. Adapter failures abort immediately without reinforcement.
    pub fn resolve<P: Probe>(
        &self,
        table: &mut WeightTable,
        field_type: &str,
        probe: &mut P,
    ) -> Result<Resolution<P::Element>> {
        let ranked = rank(table, field_type);
        tracing::debug!(
            "Resolving {} with {} learned selector(s)",
            field_type,
            ranked.len()
        );

        for candidate in &ranked {
            if let Some(element) = self.probe_learned(probe, field_type, candidate)? {
                let score = table.reinforce(field_type, &candidate.selector);
                tracing::info!(
                    "{} found: {} ({})",
                    field_type,
                    candidate.selector,
                    candidate.score
                );

                return Ok(Resolution {
                    element,
                    field_type: field_type.to_string(),
                    selector: candidate.selector.clone(),
                    score,
                    source: MatchSource::Learned,
                });
            }
        }

        tracing::warn!("Falling back to static selectors for {}", field_type);

        for selector in self.fallback.candidates(field_type) {
            match probe.query(selector) {
                Ok(Some(element)) => {
                    let score = table.reinforce(field_type, selector);
                    tracing::info!("{} found via fallback: {}", field_type, selector);

                    return Ok(Resolution {
                        element,
                        field_type: field_type.to_string(),
                        selector: selector.clone(),
                        score,
                        source: MatchSource::Fallback,
                    });
                }
                Ok(None) => {
                    tracing::debug!("Fallback selector {} matched nothing", selector);
                }
                Err(e) if e.is_miss() => {
                    tracing::debug!("Fallback selector {} missed: {}", selector, e);
                }
                Err(e) => return Err(Error::Adapter(e)),
            }
        }

        Err(Error::ElementNotFound {
            field_type: field_type.to_string(),
        })
    }

    /// Locate one learned selector and gate it on visibility.
    /// `Ok(None)` is a recoverable miss.
    fn probe_learned<P: Probe>(
        &self,
        probe: &mut P,
        field_type: &str,
        candidate: &RankedSelector,
    ) -> Result<Option<P::Element>> {
        tracing::debug!(
            "Probing {} for {} (score {})",
            candidate.selector,
            field_type,
            candidate.score
        );

        let element = match probe.locate(&candidate.selector, self.config.probe_timeout) {
            Ok(element) => element,
            Err(e) => return miss_or_abort(e),
        };

        match probe.is_visible(&element) {
            Ok(true) => Ok(Some(element)),
            Ok(false) => {
                tracing::warn!(
                    "{} matched a hidden element for {}, skipping",
                    candidate.selector,
                    field_type
                );
                Ok(None)
            }
            Err(e) => miss_or_abort(e),
        }
    }
}

fn miss_or_abort<T>(err: ProbeError) -> Result<Option<T>> {
    if err.is_miss() {
        tracing::debug!("Probe missed: {}", err);
        Ok(None)
    } else {
        Err(Error::Adapter(err))
    }
}
