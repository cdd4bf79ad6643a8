use crate::fallback::FallbackTable;
use crate::probe::Probe;
use crate::resolver::{PersistPolicy, Resolution, Resolver, ResolverConfig};
use crate::weights::{WeightStore, WeightTable};
use crate::Result;

/// One run of resolutions against a weight store
///
/// The table is loaded when the session opens and written back by
/// [`Session::commit`]. With [`PersistPolicy::EveryUpdate`] it is also saved
/// after each successful resolution. Dropping a session without committing
/// discards whatever the run learned since the last save.
pub struct Session {
    store: WeightStore,
    table: WeightTable,
    fallback: FallbackTable,
    config: ResolverConfig,
}

impl Session {
    pub fn open(store: WeightStore, fallback: FallbackTable, config: ResolverConfig) -> Result<Self> {
        let table = store.load()?;
        Ok(Self {
            store,
            table,
            fallback,
            config,
        })
    }

    pub fn resolve<P: Probe>(&mut self, field_type: &str, probe: &mut P) -> Result<Resolution<P::Element>> {
        let resolution =
            Resolver::new(&self.fallback, &self.config).resolve(&mut self.table, field_type, probe)?;

        if self.config.persist == PersistPolicy::EveryUpdate {
            self.store.save(&self.table)?;
        }

        Ok(resolution)
    }

    pub fn table(&self) -> &WeightTable {
        &self.table
    }

    /// Persist the table and end the session
    pub fn commit(self) -> Result<WeightTable> {
        self.store.save(&self.table)?;
        Ok(self.table)
    }
}
