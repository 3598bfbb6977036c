//! Optimistic timezone updates with bounded retry.
//!
//! Photos may hold its own database open while we write, and there is no
//! cross-process lock to take. Each write is attempted optimistically and
//! retried with exponential backoff when the file is busy.

use std::time::Duration;

use rusqlite::{params, Connection};

use super::asset::AssetRecord;
use super::PhotosDb;
use crate::error::Error;
use crate::photo::PhotoHandle;
use crate::timezone::Timezone;

/// Backoff schedule for contended writes.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first; floored at 1, since the write
    /// always runs at least once.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given failed attempt (1-based): doubles from the
    /// initial delay, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Run `op` until it succeeds or the retry budget is spent.
///
/// `sleep` is injected so tests can record delays instead of waiting them
/// out. The last underlying error rides along in `UpdateExhausted`.
fn run_with_retry<T>(
    policy: &RetryPolicy,
    sleep: &mut dyn FnMut(Duration),
    mut op: impl FnMut() -> rusqlite::Result<T>,
) -> Result<T, Error> {
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(source) if attempt >= policy.max_attempts => {
                return Err(Error::UpdateExhausted {
                    attempts: attempt,
                    source,
                });
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "write attempt failed, backing off");
                sleep(policy.delay_for(attempt));
                attempt += 1;
            }
        }
    }
}

/// Write the counter and both timezone columns in one statement.
///
/// The counter write is unconditional by default, matching how Photos'
/// own peers behave: a concurrent writer between our read and this
/// statement wins silently. With `conditioned` set, the statement only
/// applies while the counter still holds the value we read, and a lost
/// race surfaces as a retryable failure.
fn write_timezone(
    conn: &Connection,
    record: &AssetRecord,
    tz: &Timezone,
    conditioned: bool,
) -> rusqlite::Result<()> {
    let next_counter = record.counter + 1;
    let changed = if conditioned {
        conn.execute(
            "UPDATE ZADDITIONALASSETATTRIBUTES
             SET Z_OPT = ?1, ZTIMEZONEOFFSET = ?2, ZTIMEZONENAME = ?3
             WHERE Z_PK = ?4 AND Z_OPT = ?5",
            params![
                next_counter,
                tz.offset_secs(),
                tz.name(),
                record.pk,
                record.counter
            ],
        )?
    } else {
        conn.execute(
            "UPDATE ZADDITIONALASSETATTRIBUTES
             SET Z_OPT = ?1, ZTIMEZONEOFFSET = ?2, ZTIMEZONENAME = ?3
             WHERE Z_PK = ?4",
            params![next_counter, tz.offset_secs(), tz.name(), record.pk],
        )?
    };
    if changed == 0 {
        return Err(rusqlite::Error::StatementChangedRows(changed));
    }
    Ok(())
}

/// Notification sink for per-photo progress messages.
pub type VerboseSink = Box<dyn Fn(&str)>;

/// Applies one configured timezone to photos, one at a time.
///
/// Owns the database session; the timezone and retry policy are fixed for
/// the updater's lifetime. Per-photo failures are reported through the
/// sink so a batch keeps going.
pub struct TimezoneUpdater {
    db: PhotosDb,
    timezone: Timezone,
    policy: RetryPolicy,
    conditioned: bool,
    verbose: VerboseSink,
}

impl TimezoneUpdater {
    pub fn new(db: PhotosDb, timezone: Timezone) -> Self {
        Self {
            db,
            timezone,
            policy: RetryPolicy::default(),
            conditioned: false,
            verbose: Box::new(|_| {}),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_verbose(mut self, sink: VerboseSink) -> Self {
        self.verbose = sink;
        self
    }

    /// Condition each write on the counter value read beforehand. A lost
    /// race then fails the photo instead of silently overwriting.
    pub fn with_conditioned_writes(mut self, conditioned: bool) -> Self {
        self.conditioned = conditioned;
        self
    }

    pub fn db(&self) -> &PhotosDb {
        &self.db
    }

    /// Update one photo, reporting any failure through the sink instead of
    /// returning it.
    pub fn update_photo(&self, photo: &PhotoHandle) {
        if let Err(e) = self.try_update(photo) {
            tracing::error!(uuid = %photo.uuid, error = %e, "timezone update failed");
            (self.verbose)(&format!("Error updating {}: {e}", photo.uuid));
        }
    }

    /// Update one photo, surfacing the error to the caller.
    pub fn try_update(&self, photo: &PhotoHandle) -> Result<(), Error> {
        let record = self.db.locate(&photo.uuid)?;
        self.apply(&record, &mut std::thread::sleep)?;

        let old_name = record.tz_name.as_deref().unwrap_or("None");
        let old_offset = record
            .tz_offset
            .map(|v| v.to_string())
            .unwrap_or_else(|| "None".into());
        (self.verbose)(&format!(
            "Updated timezone for photo {} ({}) from {}, offset={} to {}, offset={}",
            photo.filename,
            photo.uuid,
            old_name,
            old_offset,
            self.timezone.name(),
            self.timezone.offset_secs(),
        ));
        Ok(())
    }

    pub(crate) fn apply(
        &self,
        record: &AssetRecord,
        sleep: &mut dyn FnMut(Duration),
    ) -> Result<(), Error> {
        run_with_retry(&self.policy, sleep, || {
            write_timezone(self.db.conn(), record, &self.timezone, self.conditioned)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(6), Duration::from_millis(3200));
        // 6.4s and beyond clamp to the 5s cap
        assert_eq!(policy.delay_for(7), Duration::from_secs(5));
        assert_eq!(policy.delay_for(9), Duration::from_secs(5));
    }

    #[test]
    fn test_retry_succeeds_without_sleeping() {
        let policy = RetryPolicy::default();
        let mut slept = Vec::new();
        let result = run_with_retry(&policy, &mut |d| slept.push(d), || Ok(7));
        assert_eq!(result.unwrap(), 7);
        assert!(slept.is_empty());
    }

    #[test]
    fn test_retry_recovers_after_transient_failures() {
        let policy = RetryPolicy::default();
        let mut slept = Vec::new();
        let mut calls = 0;
        let result = run_with_retry(
            &policy,
            &mut |d| slept.push(d),
            || {
                calls += 1;
                if calls < 4 {
                    Err(rusqlite::Error::StatementChangedRows(0))
                } else {
                    Ok(())
                }
            },
        );
        assert!(result.is_ok());
        assert_eq!(calls, 4);
        assert_eq!(
            slept,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
            ]
        );
    }

    #[test]
    fn test_retry_exhaustion_surfaces_last_error() {
        let policy = RetryPolicy::default();
        let mut slept = Vec::new();
        let mut calls = 0u32;
        let result: Result<(), Error> = run_with_retry(
            &policy,
            &mut |d| slept.push(d),
            || {
                calls += 1;
                Err(rusqlite::Error::StatementChangedRows(0))
            },
        );
        assert_eq!(calls, 10);
        // one sleep between each pair of attempts
        assert_eq!(slept.len(), 9);
        for pair in slept.windows(2) {
            assert!(pair[1] >= pair[0], "delays must be non-decreasing");
        }
        assert!(slept.iter().all(|d| *d <= Duration::from_secs(5)));
        match result {
            Err(Error::UpdateExhausted { attempts, .. }) => assert_eq!(attempts, 10),
            other => panic!("expected UpdateExhausted, got {other:?}"),
        }
    }
}
