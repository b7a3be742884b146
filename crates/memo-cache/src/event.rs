use crate::key::CacheKey;
use std::fmt;
use std::time::Duration;

/// Tracing target for observability records and internal diagnostics.
pub const TRACING_TARGET: &str = "memo.cache";

/// Whether an entry existed before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Hit,
    Miss,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::Miss => "miss",
        }
    }

    pub fn is_hit(self) -> bool {
        self == Outcome::Hit
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observability record for a single `get_or_compute` call.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEvent<'a> {
    pub namespace: &'a str,
    pub outcome: Outcome,
    pub key: &'a CacheKey,
    /// Cumulative hit rate in percent, including this call.
    pub hit_rate: f64,
    /// Only present when `log_time` is enabled.
    pub elapsed: Option<Duration>,
}

impl fmt::Display for CacheEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} hit_rate={:.2}%",
            self.namespace, self.outcome, self.key, self.hit_rate
        )?;
        if let Some(elapsed) = self.elapsed {
            write!(f, " elapsed_time={elapsed:?}")?;
        }
        Ok(())
    }
}

/// Receives observability records from a store.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &CacheEvent<'_>);
}

impl<F> EventSink for F
where
    F: Fn(&CacheEvent<'_>) + Send + Sync,
{
    fn record(&self, event: &CacheEvent<'_>) {
        self(event)
    }
}

/// Emits records as `info` events on the [`TRACING_TARGET`] target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &CacheEvent<'_>) {
        let hit_rate = format!("{:.2}%", event.hit_rate);
        match event.elapsed {
            Some(elapsed) => tracing::info!(
                target: TRACING_TARGET,
                namespace = event.namespace,
                outcome = event.outcome.as_str(),
                key = %event.key,
                hit_rate = %hit_rate,
                elapsed = ?elapsed,
                "file cache {}",
                event.outcome
            ),
            None => tracing::info!(
                target: TRACING_TARGET,
                namespace = event.namespace,
                outcome = event.outcome.as_str(),
                key = %event.key,
                hit_rate = %hit_rate,
                "file cache {}",
                event.outcome
            ),
        }
    }
}

/// Prints each record's `Display` form on its own line of stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn record(&self, event: &CacheEvent<'_>) {
        println!("{event}");
    }
}
