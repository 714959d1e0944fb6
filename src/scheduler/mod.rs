//! Periodic task supervision.
//!
//! Every registered task gets its own repeated job. A tick runs the task only
//! when its previous run has finished and the record store answers a ping.
//! Errors and panics stay inside the tick that produced them.

pub mod shutdown;
pub mod tasks;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, scheduler::shutdown::Shutdown};

pub type TaskFuture = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send>>;
type TaskFn = Arc<dyn Fn(Shutdown) -> TaskFuture + Send + Sync>;

/// Reachability check run before every tick.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn check(&self) -> Result<(), AppError>;
}

#[async_trait]
impl StoreHealth for DatabaseConnection {
    async fn check(&self) -> Result<(), AppError> {
        self.ping().await?;
        Ok(())
    }
}

/// What happened on one tick of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Completed,
    Failed,
    Panicked,
    /// The previous run was still in progress.
    Overlapped,
    StoreUnavailable,
    ShuttingDown,
}

/// One named task and the lock that keeps it single-flight.
#[derive(Clone)]
pub struct TaskRunner {
    name: &'static str,
    interval: Duration,
    run: TaskFn,
    in_flight: Arc<Mutex<()>>,
    store: Arc<dyn StoreHealth>,
    shutdown: Shutdown,
}

impl TaskRunner {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the task once unless it is already running, the store is down or
    /// shutdown has started.
    pub async fn tick(&self) -> TickOutcome {
        if self.shutdown.is_requested() {
            return TickOutcome::ShuttingDown;
        }

        let Ok(guard) = self.in_flight.clone().try_lock_owned() else {
            tracing::warn!("{}: previous run still in progress, skipping tick", self.name);
            return TickOutcome::Overlapped;
        };

        if let Err(e) = self.store.check().await {
            tracing::warn!("{}: record store unreachable, skipping tick: {}", self.name, e);
            return TickOutcome::StoreUnavailable;
        }

        let run = (self.run)(self.shutdown.clone());
        let handle = tokio::spawn(async move {
            let _guard = guard;
            run.await
        });

        match handle.await {
            Ok(Ok(())) => {
                tracing::debug!("{}: run completed", self.name);
                TickOutcome::Completed
            }
            Ok(Err(e)) => {
                tracing::error!("{}: run failed: {}", self.name, e);
                TickOutcome::Failed
            }
            Err(e) if e.is_panic() => {
                tracing::error!("{}: run panicked", self.name);
                TickOutcome::Panicked
            }
            Err(e) => {
                tracing::error!("{}: run was cancelled: {}", self.name, e);
                TickOutcome::Failed
            }
        }
    }

    /// Waits for an in-flight run to finish.
    async fn wait_idle(&self) {
        let _idle = self.in_flight.lock().await;
    }
}

pub struct Scheduler {
    store: Arc<dyn StoreHealth>,
    shutdown: Shutdown,
    tasks: Vec<TaskRunner>,
}

impl Scheduler {
    pub fn new(store: Arc<dyn StoreHealth>, shutdown: Shutdown) -> Self {
        Self {
            store,
            shutdown,
            tasks: Vec::new(),
        }
    }

    /// Registers a task to run every `interval`.
    ///
    /// `task` receives the shutdown signal so its sweep can stop between records.
    pub fn register<F, Fut>(&mut self, name: &'static str, interval: Duration, task: F)
    where
        F: Fn(Shutdown) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        self.tasks.push(TaskRunner {
            name,
            interval,
            run: Arc::new(move |shutdown| Box::pin(task(shutdown)) as TaskFuture),
            in_flight: Arc::new(Mutex::new(())),
            store: self.store.clone(),
            shutdown: self.shutdown.clone(),
        });
    }

    pub fn runner(&self, name: &str) -> Option<&TaskRunner> {
        self.tasks.iter().find(|task| task.name == name)
    }

    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|task| task.name).collect()
    }

    /// Runs every task on its interval until shutdown is requested, then waits
    /// for in-flight runs to finish.
    pub async fn run(self) -> Result<(), AppError> {
        let mut jobs = JobScheduler::new().await?;

        for runner in &self.tasks {
            let job_runner = runner.clone();
            let job = Job::new_repeated_async(runner.interval, move |_uuid, _lock| {
                let runner = job_runner.clone();

                Box::pin(async move {
                    runner.tick().await;
                })
            })?;

            jobs.add(job).await?;
        }

        jobs.start().await?;

        tracing::info!("Scheduler started with {} tasks", self.tasks.len());

        let mut shutdown = self.shutdown.clone();
        shutdown.requested().await;

        tracing::info!("Shutdown requested, waiting for in-flight tasks");

        jobs.shutdown().await?;
        for runner in &self.tasks {
            runner.wait_idle().await;
        }

        tracing::info!("Scheduler stopped");

        Ok(())
    }
}
