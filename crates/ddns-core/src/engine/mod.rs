//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Running the update workflow for one address family
//! - Driving that workflow for every enabled family on a fixed cadence
//!
//! ## Update Workflow
//!
//! ```text
//! ┌─────────────┐  current IP   ┌──────────────┐  published IP  ┌─────────────┐
//! │  IpSource   │──────────────▶│  DdnsEngine  │◀───────────────│ DnsProvider │
//! └─────────────┘               └──────────────┘                └─────────────┘
//!                                       │ differs?                     ▲
//!                                       └──────── update_record ───────┘
//! ```
//!
//! 1. Resolve the current public IP of the family
//! 2. Read the published value of the family's record (A or AAAA)
//! 3. Equal (exact string match): log "up to date", stop
//! 4. Different: write the new value, log the old and new values
//!    (in dry-run mode, log what would have been written instead)
//!
//! Every step that fails is logged and ends the cycle for that family only.
//! No step is retried; the next tick is the retry.
//!
//! ## Scheduling
//!
//! Each tick spawns one task per family and then sleeps for the interval.
//! Tasks are never joined or cancelled. If a task outlives the interval
//! (slow network, hung echo service) the next tick starts new tasks anyway,
//! so two in-flight writes to the same record can overlap. The provider
//! applies them last-write-wins; nothing orders them on this side.
//!
//! ## Logging
//!
//! The engine owns a [`Dispatch`] and attaches it to every future it runs,
//! so log lines go to the logger built at startup and never to a
//! process-wide default.

use crate::config::{DdnsConfig, DnsTarget};
use crate::error::{Error, Result};
use crate::traits::{AddressFamily, DnsProvider, IpSource, RecordWrite};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument, debug, error, info, info_span};

/// What one update cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Published value already matched; nothing written
    UpToDate,

    /// Published value replaced with the current IP
    Updated,

    /// Published value differs, but the provider is in dry-run mode and
    /// nothing was written
    DryRun,

    /// The cycle was aborted
    Failed {
        /// Error description
        reason: String,
        /// HTTP status, when the provider rejected the request
        status: Option<u16>,
    },
}

/// Result of one update cycle for one address family
///
/// Returned to the caller and logged; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Family the cycle ran for
    pub family: AddressFamily,
    /// Public IP, if it was resolved
    pub current_ip: Option<String>,
    /// Published record value, if it was read
    pub published_ip: Option<String>,
    /// What happened
    pub action: UpdateAction,
}

impl UpdateOutcome {
    fn failed(
        family: AddressFamily,
        current_ip: Option<String>,
        published_ip: Option<String>,
        error: &Error,
    ) -> Self {
        Self {
            family,
            current_ip,
            published_ip,
            action: UpdateAction::Failed {
                reason: error.to_string(),
                status: error.status(),
            },
        }
    }

    /// Whether the cycle was aborted
    pub fn is_failed(&self) -> bool {
        matches!(self.action, UpdateAction::Failed { .. })
    }
}

/// Core DDNS engine
///
/// Cheap to clone: every spawned task holds its own clone.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`] (never returns) or
///    [`DdnsEngine::run_with_shutdown()`]
#[derive(Clone)]
pub struct DdnsEngine {
    /// IP source for the current public address
    ip_source: Arc<dyn IpSource>,

    /// DNS provider for reading and writing the record
    provider: Arc<dyn DnsProvider>,

    /// Record to keep up to date
    target: Arc<DnsTarget>,

    /// Families updated on each tick
    families: Arc<[AddressFamily]>,

    /// Sleep between ticks
    interval: Duration,

    /// Logger every task writes to
    dispatch: Dispatch,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: DDNS configuration (validated here)
    /// - `dispatch`: Logger for every log line the engine emits
    pub fn new(
        ip_source: Arc<dyn IpSource>,
        provider: Arc<dyn DnsProvider>,
        config: &DdnsConfig,
        dispatch: Dispatch,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            target: Arc::new(config.target.clone()),
            families: config.engine.enabled_families().into(),
            interval: config.engine.interval(),
            dispatch,
        })
    }

    /// Override the tick period
    ///
    /// Configuration only allows whole seconds; embedders and tests may
    /// need finer control.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Tick period
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one update cycle for `family`
    ///
    /// Never fails: every error is logged and reported as
    /// [`UpdateAction::Failed`].
    pub async fn update_family(&self, family: AddressFamily) -> UpdateOutcome {
        async {
            let span = info_span!("update", family = %family, record = %self.target);
            self.run_cycle(family).instrument(span).await
        }
        .with_subscriber(self.dispatch.clone())
        .await
    }

    async fn run_cycle(&self, family: AddressFamily) -> UpdateOutcome {
        let record_type = family.record_type();

        // Step 1: Resolve the current public IP
        let current_ip = match self.ip_source.current(family).await {
            Ok(ip) => ip,
            Err(e) => {
                error!(kind = ?e.kind(), "Failed to resolve public {} address: {}", family, e);
                return UpdateOutcome::failed(family, None, None, &e);
            }
        };
        debug!("Public {} address: {}", family, current_ip);

        // Step 2: Read the published value
        let published_ip = match self.provider.get_record(&self.target, record_type).await {
            Ok(value) => value,
            Err(e) => {
                error!(
                    kind = ?e.kind(),
                    "Failed to read {} record of {} from {}: {}",
                    record_type,
                    self.target,
                    self.provider.provider_name(),
                    e
                );
                return UpdateOutcome::failed(family, Some(current_ip), None, &e);
            }
        };

        // Step 3: Compare
        if published_ip == current_ip {
            info!("The {} ({}) is up to date", self.target, current_ip);
            return UpdateOutcome {
                family,
                current_ip: Some(current_ip),
                published_ip: Some(published_ip),
                action: UpdateAction::UpToDate,
            };
        }

        // Step 4: Write
        match self
            .provider
            .update_record(&self.target, record_type, &current_ip)
            .await
        {
            Ok(write) => {
                let action = match write {
                    RecordWrite::Written => {
                        info!(
                            "Successfully updated {} from {} to {}",
                            self.target, published_ip, current_ip
                        );
                        UpdateAction::Updated
                    }
                    RecordWrite::DryRun => {
                        info!(
                            "[DRY-RUN] Would update {} from {} to {}",
                            self.target, published_ip, current_ip
                        );
                        UpdateAction::DryRun
                    }
                };
                UpdateOutcome {
                    family,
                    current_ip: Some(current_ip),
                    published_ip: Some(published_ip),
                    action,
                }
            }
            Err(e) => {
                match e.status() {
                    Some(status) => error!(
                        status,
                        "Failed to update {} to {}: HTTP status code {}",
                        self.target,
                        current_ip,
                        status
                    ),
                    None => error!(
                        kind = ?e.kind(),
                        "Failed to update {} to {}: {}",
                        self.target,
                        current_ip,
                        e
                    ),
                }
                UpdateOutcome::failed(family, Some(current_ip), Some(published_ip), &e)
            }
        }
    }

    /// Start one update task per enabled family
    ///
    /// The tasks run unsupervised. The scheduler drops the returned
    /// handles; callers that want the outcomes may await them.
    pub fn spawn_tick(&self) -> Vec<JoinHandle<UpdateOutcome>> {
        self.families
            .iter()
            .map(|&family| {
                let engine = self.clone();
                tokio::spawn(async move { engine.update_family(family).await })
            })
            .collect()
    }

    /// Run the scheduler forever
    ///
    /// Returns only if the surrounding task is dropped or aborted.
    pub async fn run(&self) {
        self.run_internal(None).await
    }

    /// Run the scheduler until `shutdown_rx` fires
    ///
    /// Tasks already in flight keep running after this returns.
    pub async fn run_with_shutdown(&self, shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>) {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(&self, shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>) {
        async {
            info!(
                interval_secs = self.interval.as_secs(),
                families = ?self.families,
                "Keeping {} up to date via {}",
                self.target,
                self.provider.provider_name()
            );

            let mut tick: u64 = 0;
            match shutdown_rx {
                Some(mut rx) => loop {
                    tick += 1;
                    self.start_tick(tick);

                    tokio::select! {
                        _ = tokio::time::sleep(self.interval) => {}
                        _ = &mut rx => {
                            info!("Shutdown signal received, scheduler stopped");
                            break;
                        }
                    }
                },
                None => loop {
                    tick += 1;
                    self.start_tick(tick);
                    tokio::time::sleep(self.interval).await;
                },
            }
        }
        .with_subscriber(self.dispatch.clone())
        .await
    }

    fn start_tick(&self, tick: u64) {
        // Detached: dropping a JoinHandle does not cancel the task.
        let handles = self.spawn_tick();
        debug!(tick, "Started {} update task(s)", handles.len());
    }
}

impl std::fmt::Debug for DdnsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdnsEngine")
            .field("provider", &self.provider.provider_name())
            .field("target", &self.target)
            .field("families", &self.families)
            .field("interval", &self.interval)
            .finish()
    }
}
