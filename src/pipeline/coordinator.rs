//! Pipeline coordinator
//!
//! Owns the queue, launches every producer and consumer as a tokio task, and
//! turns a shutdown request into exactly one `close` followed by a join of
//! every unit.
//!
//! ```text
//!   start() ──► supervisor task
//!                 ├── producers ──► join ──► producers_done
//!                 ├── consumers ──► join ──► (all gone, queue open) shutdown.trigger()
//!                 ├── shutdown.triggered() ──► queue.close()
//!                 └── report ──► watch channel
//!
//!   stop() ──► shutdown.trigger() ──► wait for report (any number of callers)
//! ```
//!
//! The report is published through a `watch` channel, so waiting for it is
//! cancel safe and every caller of `stop` observes the same value.

use crate::core::shutdown::ShutdownToken;
use crate::core::sync::handle_mutex_poison;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::consumer::{Consumer, ConsumerReport};
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::item::WorkItem;
use crate::pipeline::processor::{DelayProcessor, ItemProcessor};
use crate::pipeline::producer::{Producer, ProducerReport};
use crate::pipeline::report::{
    PipelinePhase, PipelineReport, PipelineStatus, UnitFailure, UnitKind,
};
use crate::pipeline::state::{ConsumerState, ProducerState, UnitState};
use crate::queue::{BoundedQueue, QueueStats};
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

/// Units waiting to be launched
enum Lifecycle {
    Idle {
        producers: Vec<Producer>,
        consumers: Vec<Consumer>,
    },
    Started,
}

/// Bounded multi-producer/multi-consumer pipeline
pub struct Pipeline {
    config: PipelineConfig,
    queue: Arc<BoundedQueue<WorkItem>>,
    shutdown: ShutdownToken,
    producers_done: ShutdownToken,
    lifecycle: Mutex<Lifecycle>,
    producer_states: Vec<Arc<UnitState<ProducerState>>>,
    consumer_states: Vec<Arc<UnitState<ConsumerState>>>,
    report_tx: Arc<watch::Sender<Option<PipelineReport>>>,
}

impl Pipeline {
    /// Build a pipeline whose consumers sleep for the configured processing time
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        let processor = Arc::new(DelayProcessor::new(config.processing_time()));
        Self::with_processor(config, processor)
    }

    /// Build a pipeline with a caller-supplied processor shared by every consumer
    pub fn with_processor(
        config: PipelineConfig,
        processor: Arc<dyn ItemProcessor>,
    ) -> PipelineResult<Self> {
        config.validate()?;
        let queue = Arc::new(BoundedQueue::new(config.capacity)?);

        let producers: Vec<Producer> = (0..config.producers)
            .map(|id| Producer::new(id, config.items_per_producer, config.think_time()))
            .collect();
        let consumers: Vec<Consumer> = (0..config.consumers)
            .map(|id| Consumer::new(id, Arc::clone(&processor)))
            .collect();

        let producer_states = producers.iter().map(Producer::state_handle).collect();
        let consumer_states = consumers.iter().map(Consumer::state_handle).collect();
        let (report_tx, _) = watch::channel(None);

        Ok(Self {
            config,
            queue,
            shutdown: ShutdownToken::new(),
            producers_done: ShutdownToken::new(),
            lifecycle: Mutex::new(Lifecycle::Idle {
                producers,
                consumers,
            }),
            producer_states,
            consumer_states,
            report_tx: Arc::new(report_tx),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn lock_lifecycle(&self) -> PipelineResult<MutexGuard<'_, Lifecycle>> {
        handle_mutex_poison(self.lifecycle.lock(), |message| PipelineError::Internal {
            message,
        })
    }

    /// Launch every producer and consumer
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> PipelineResult<()> {
        let (producers, consumers) = {
            let mut lifecycle = self.lock_lifecycle()?;
            match std::mem::replace(&mut *lifecycle, Lifecycle::Started) {
                Lifecycle::Idle {
                    producers,
                    consumers,
                } => (producers, consumers),
                Lifecycle::Started => return Err(PipelineError::AlreadyStarted),
            }
        };

        log::info!(
            "Starting pipeline: capacity {}, {} producers x {} items, {} consumers",
            self.config.capacity,
            producers.len(),
            self.config.items_per_producer,
            consumers.len()
        );

        let started_at = Instant::now();
        let producer_handles = producers
            .into_iter()
            .map(|producer| tokio::spawn(producer.run(Arc::clone(&self.queue))))
            .collect();
        let consumer_handles = consumers
            .into_iter()
            .map(|consumer| tokio::spawn(consumer.run(Arc::clone(&self.queue))))
            .collect();

        let supervisor = Supervisor {
            queue: Arc::clone(&self.queue),
            shutdown: self.shutdown.clone(),
            producers_done: self.producers_done.clone(),
            started_at,
        };
        let report_tx = Arc::clone(&self.report_tx);
        tokio::spawn(async move {
            let report = supervisor.run(producer_handles, consumer_handles).await;
            report_tx.send_replace(Some(report));
        });

        Ok(())
    }

    /// Close the queue now and wait for every unit to finish
    ///
    /// Idempotent and safe to call concurrently; every caller receives the
    /// same report. Buffered items are still processed before consumers stop.
    pub async fn stop_now(&self) -> PipelineResult<PipelineReport> {
        if !self.is_started() {
            return Err(PipelineError::NotStarted);
        }

        if self.shutdown.trigger() {
            log::info!("Stopping pipeline");
        }
        self.wait_for_report().await
    }

    /// Same as [`Pipeline::stop_now`]
    pub async fn stop(&self) -> PipelineResult<PipelineReport> {
        self.stop_now().await
    }

    /// Wait for `duration` (or an earlier shutdown request), then stop
    pub async fn stop_after(&self, duration: Duration) -> PipelineResult<PipelineReport> {
        if !self.is_started() {
            return Err(PipelineError::NotStarted);
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => {
                log::debug!("Stop timer of {:?} elapsed", duration);
            }
            _ = self.shutdown.triggered() => {}
        }
        self.stop_now().await
    }

    /// Let every producer emit all of its items, then stop
    ///
    /// An earlier shutdown request still cuts production short.
    pub async fn run_to_completion(&self) -> PipelineResult<PipelineReport> {
        if !self.is_started() {
            return Err(PipelineError::NotStarted);
        }

        tokio::select! {
            _ = self.producers_done.triggered() => {
                log::debug!("All producers finished");
            }
            _ = self.shutdown.triggered() => {}
        }
        self.stop_now().await
    }

    /// Start, then stop according to the configured stop policy
    pub async fn run(&self) -> PipelineResult<PipelineReport> {
        self.start()?;
        match self.config.stop_after() {
            Some(duration) => self.stop_after(duration).await,
            None => self.run_to_completion().await,
        }
    }

    async fn wait_for_report(&self) -> PipelineResult<PipelineReport> {
        let mut rx = self.report_tx.subscribe();
        let report = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| PipelineError::Internal {
                message: "pipeline supervisor ended without a report".to_string(),
            })?;

        (*report).clone().ok_or_else(|| PipelineError::Internal {
            message: "pipeline report missing".to_string(),
        })
    }

    /// Token that stops the pipeline when raised from anywhere
    pub fn shutdown_token(&self) -> ShutdownToken {
        self.shutdown.clone()
    }

    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    pub fn is_started(&self) -> bool {
        self.lock_lifecycle()
            .map(|lifecycle| matches!(*lifecycle, Lifecycle::Started))
            .unwrap_or(true)
    }

    /// Every unit has been joined and the report is available
    pub fn is_stopped(&self) -> bool {
        self.report_tx.borrow().is_some()
    }

    /// The final report, if the pipeline has stopped
    pub fn report(&self) -> Option<PipelineReport> {
        self.report_tx.borrow().clone()
    }

    pub fn phase(&self) -> PipelinePhase {
        if self.is_stopped() {
            PipelinePhase::Stopped
        } else if !self.is_started() {
            PipelinePhase::Idle
        } else if self.shutdown.is_triggered() || self.queue.is_closed() {
            PipelinePhase::Stopping
        } else {
            PipelinePhase::Running
        }
    }

    /// Snapshot of every unit's state and the queue counters
    pub fn status(&self) -> PipelineStatus {
        PipelineStatus {
            phase: self.phase(),
            producers: self.producer_states.iter().map(|s| s.get()).collect(),
            consumers: self.consumer_states.iter().map(|s| s.get()).collect(),
            queue: self.queue.stats(),
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        // Detached units must not outlive their owner blocked on the queue
        self.shutdown.trigger();
        self.queue.close();
    }
}

/// Everything the supervisor task needs, detached from the `Pipeline` borrow
struct Supervisor {
    queue: Arc<BoundedQueue<WorkItem>>,
    shutdown: ShutdownToken,
    producers_done: ShutdownToken,
    started_at: Instant,
}

impl Supervisor {
    async fn run(
        self,
        producer_handles: Vec<JoinHandle<ProducerReport>>,
        consumer_handles: Vec<JoinHandle<ConsumerReport>>,
    ) -> PipelineReport {
        let mut failures = Vec::new();

        let join_producers = async {
            let results = join_all(producer_handles).await;
            self.producers_done.trigger();
            results
        };
        // Consumers only end on their own once the queue is closed; if they all
        // end while it is still open they have failed, and blocked producers
        // must be released.
        let join_consumers = async {
            let results = join_all(consumer_handles).await;
            if !self.queue.is_closed() {
                log::error!("Every consumer stopped while the queue was open; shutting down");
                self.shutdown.trigger();
            }
            results
        };
        let close_on_shutdown = async {
            self.shutdown.triggered().await;
            if self.queue.close() {
                log::debug!("Queue closed");
            }
        };
        let (producer_results, consumer_results, ()) =
            tokio::join!(join_producers, join_consumers, close_on_shutdown);

        let mut producers = Vec::with_capacity(producer_results.len());
        for (id, result) in producer_results.into_iter().enumerate() {
            match result {
                Ok(report) => producers.push(report),
                Err(err) => failures.push(unit_failure(UnitKind::Producer, id, err)),
            }
        }

        let mut consumers = Vec::with_capacity(consumer_results.len());
        for (id, result) in consumer_results.into_iter().enumerate() {
            match result {
                Ok(report) => consumers.push(report),
                Err(err) => failures.push(unit_failure(UnitKind::Consumer, id, err)),
            }
        }

        let report = PipelineReport {
            producers,
            consumers,
            queue: self.queue.stats(),
            failures,
            elapsed_ms: u64::try_from(self.started_at.elapsed().as_millis())
                .unwrap_or(u64::MAX),
        };

        log::info!(
            "Pipeline stopped after {}ms: {} delivered, {} processed, {} failures",
            report.elapsed_ms,
            report.total_delivered(),
            report.total_processed(),
            report.failures.len()
        );
        report
    }
}

fn unit_failure(kind: UnitKind, id: usize, err: JoinError) -> UnitFailure {
    let panicked = err.is_panic();
    let message = if panicked {
        let payload = err.into_panic();
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panicked".to_string())
    } else {
        err.to_string()
    };

    let failure = UnitFailure {
        kind,
        id,
        message,
        panicked,
    };
    log::error!("{}", failure);
    failure
}
