//! Cooperative trace playback.
//!
//! One [`Animator`] plays at most one trace at a time. Steps are handed to
//! the caller strictly in order; the only suspension points are the waits
//! between steps, which is where pause, resume and cancellation act.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use algoscope_trace::TraceStep;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Notify};
use tracing::{debug, trace, warn};

use crate::config::AnimatorConfig;

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing playing
    Idle,
    /// Handing out steps
    Running,
    /// Holding the next step until resumed
    Paused,
}

/// How a call to [`Animator::animate`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackOutcome {
    /// Every step was played and the completion callback ran.
    Completed,
    /// Stopped by [`Animator::cancel`].
    Cancelled,
    /// Replaced by a newer `animate` call.
    Superseded,
}

/// Point-in-time view for a progress display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatorStatus {
    pub phase: Phase,
    /// Steps handed out so far in the current (or last) run.
    pub current_step: usize,
    pub total_steps: usize,
    /// 0.0 - 1.0
    pub progress: f64,
    pub step_delay_ms: u64,
}

/// `Err` means playback must stop, for the given reason.
type Flow = Result<(), PlaybackOutcome>;

#[derive(Debug)]
struct RunState {
    phase: Phase,
    cancelled: bool,
    current_step: usize,
    total_steps: usize,
    /// Held while parked in a paused wait. Resume sends, cancel drops.
    pending: Option<oneshot::Sender<()>>,
    step_delay: Duration,
}

#[derive(Debug)]
struct Inner {
    run: Mutex<RunState>,
    /// Wakes an in-progress delay on cancel or supersede.
    interrupt: Notify,
    /// Held by the playing run for its whole duration.
    playback: tokio::sync::Mutex<()>,
    /// Bumped by every `animate` call; a run whose generation is stale stops.
    generation: AtomicU64,
}

/// Animation scheduler handle. Clones share the same scheduler.
#[derive(Debug, Clone)]
pub struct Animator {
    inner: Arc<Inner>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimatorConfig::default())
    }
}

impl Animator {
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                run: Mutex::new(RunState {
                    phase: Phase::Idle,
                    cancelled: false,
                    current_step: 0,
                    total_steps: 0,
                    pending: None,
                    step_delay: config.step_delay,
                }),
                interrupt: Notify::new(),
                playback: tokio::sync::Mutex::new(()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Play a trace, awaiting `on_step(step, index, total)` for each step.
    pub async fn animate<A, F, Fut>(&self, steps: Vec<TraceStep<A>>, on_step: F) -> PlaybackOutcome
    where
        F: FnMut(TraceStep<A>, usize, usize) -> Fut,
        Fut: Future<Output = ()>,
    {
        self.animate_with(steps, on_step, || {}).await
    }

    /// Like [`animate`](Self::animate), calling `on_complete` only if every
    /// step was played.
    ///
    /// A run already in progress is cancelled and awaited first, so two
    /// traces never interleave. An empty trace completes at once.
    pub async fn animate_with<A, F, Fut, C>(
        &self,
        steps: Vec<TraceStep<A>>,
        mut on_step: F,
        on_complete: C,
    ) -> PlaybackOutcome
    where
        F: FnMut(TraceStep<A>, usize, usize) -> Fut,
        Fut: Future<Output = ()>,
        C: FnOnce(),
    {
        let generation = {
            let mut run = self.lock();
            if run.phase != Phase::Idle {
                warn!("Force-cancelling running animation");
            }
            // Cleared here rather than after the playback lock so a cancel
            // issued while the previous run unwinds still applies to this one.
            run.cancelled = false;
            self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        self.interrupt();

        let _playing = self.inner.playback.lock().await;
        if let Err(stopped) = self.check(generation) {
            debug!(generation, ?stopped, "Animation stopped before it started");
            return stopped;
        }

        let total = steps.len();
        {
            let mut run = self.lock();
            run.phase = Phase::Running;
            run.current_step = 0;
            run.total_steps = total;
            run.pending = None;
        }
        debug!(generation, total, "Animation started");

        let outcome = match self.play(generation, steps, &mut on_step).await {
            Ok(()) => PlaybackOutcome::Completed,
            Err(stopped) => stopped,
        };

        {
            let mut run = self.lock();
            run.phase = Phase::Idle;
            run.pending = None;
        }
        debug!(generation, ?outcome, "Animation finished");

        if outcome == PlaybackOutcome::Completed {
            on_complete();
        }
        outcome
    }

    async fn play<A, F, Fut>(&self, generation: u64, steps: Vec<TraceStep<A>>, on_step: &mut F) -> Flow
    where
        F: FnMut(TraceStep<A>, usize, usize) -> Fut,
        Fut: Future<Output = ()>,
    {
        let total = steps.len();
        for (index, step) in steps.into_iter().enumerate() {
            self.check(generation)?;
            self.lock().current_step = index + 1;
            trace!(index, total, "Playing step");
            on_step(step, index, total).await;

            if index + 1 < total {
                self.wait_tick(generation).await?;
            }
        }
        self.check(generation)
    }

    /// The inter-step wait.
    ///
    /// Paused before the wait: hold until resumed, then wait the full delay.
    /// Paused during the wait: hold at its end; resuming continues at once.
    async fn wait_tick(&self, generation: u64) -> Flow {
        self.hold_while_paused(generation).await?;
        self.delay(generation).await?;
        self.hold_while_paused(generation).await
    }

    async fn hold_while_paused(&self, generation: u64) -> Flow {
        let resumed = {
            let mut run = self.lock();
            self.check_locked(&run, generation)?;
            if run.phase != Phase::Paused {
                return Ok(());
            }
            let (tx, rx) = oneshot::channel();
            run.pending = Some(tx);
            rx
        };

        trace!(generation, "Holding for resume");
        match resumed.await {
            Ok(()) => self.check(generation),
            // Sender dropped: cancelled or superseded
            Err(_) => Err(self
                .check(generation)
                .err()
                .unwrap_or(PlaybackOutcome::Cancelled)),
        }
    }

    async fn delay(&self, generation: u64) -> Flow {
        let interrupted = self.inner.interrupt.notified();
        tokio::pin!(interrupted);
        interrupted.as_mut().enable();

        self.check(generation)?;

        let delay = self.step_delay();
        tokio::select! {
            _ = &mut interrupted => {}
            _ = tokio::time::sleep(delay) => {}
        }
        self.check(generation)
    }

    /// Pause between steps. Only takes effect while running.
    pub fn pause(&self) {
        let mut run = self.lock();
        if run.phase == Phase::Running {
            run.phase = Phase::Paused;
            debug!(step = run.current_step, "Animation paused");
        }
    }

    /// Continue a paused animation.
    pub fn resume(&self) {
        let mut run = self.lock();
        if run.phase == Phase::Paused {
            run.phase = Phase::Running;
            if let Some(pending) = run.pending.take() {
                // The receiver is gone only if the run already stopped
                let _ = pending.send(());
            }
            debug!(step = run.current_step, "Animation resumed");
        }
    }

    /// Stop the current animation at its next check point. The step
    /// callback in flight, if any, runs to completion; the completion
    /// callback does not run.
    pub fn cancel(&self) {
        {
            let mut run = self.lock();
            if run.phase == Phase::Idle {
                return;
            }
            run.cancelled = true;
            run.pending = None;
            debug!(step = run.current_step, "Animation cancelled");
        }
        self.inner.interrupt.notify_waiters();
    }

    /// Change the delay. Applies from the next wait onward.
    pub fn set_step_delay(&self, step_delay: Duration) {
        self.lock().step_delay = step_delay;
    }

    pub fn step_delay(&self) -> Duration {
        self.lock().step_delay
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Running or paused.
    pub fn is_running(&self) -> bool {
        self.phase() != Phase::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.phase() == Phase::Paused
    }

    pub fn current_step(&self) -> usize {
        self.lock().current_step
    }

    pub fn total_steps(&self) -> usize {
        self.lock().total_steps
    }

    pub fn status(&self) -> AnimatorStatus {
        let run = self.lock();
        let progress = if run.total_steps == 0 {
            0.0
        } else {
            run.current_step as f64 / run.total_steps as f64
        };
        AnimatorStatus {
            phase: run.phase,
            current_step: run.current_step,
            total_steps: run.total_steps,
            progress,
            step_delay_ms: u64::try_from(run.step_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Wake a run that is waiting so it notices a newer generation.
    fn interrupt(&self) {
        self.lock().pending = None;
        self.inner.interrupt.notify_waiters();
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) != generation
    }

    /// `Err` carries the reason playback must stop.
    fn check(&self, generation: u64) -> Flow {
        let run = self.lock();
        self.check_locked(&run, generation)
    }

    fn check_locked(&self, run: &RunState, generation: u64) -> Flow {
        if self.is_superseded(generation) {
            Err(PlaybackOutcome::Superseded)
        } else if run.cancelled {
            Err(PlaybackOutcome::Cancelled)
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.inner.run.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_trace::StackAction;
    use std::future::ready;
    use std::sync::atomic::AtomicBool;
    use tokio::time::Instant;

    fn trace(count: usize) -> Vec<TraceStep<StackAction>> {
        (0..count)
            .map(|i| TraceStep::on(format!("stk_{i}"), StackAction::Push, format!("step {i}")))
            .collect()
    }

    fn animator(delay_ms: u64) -> Animator {
        Animator::new(AnimatorConfig::default().with_step_delay(Duration::from_millis(delay_ms)))
    }

    type Log = Arc<Mutex<Vec<usize>>>;

    fn recorder(log: &Log) -> impl FnMut(TraceStep<StackAction>, usize, usize) -> std::future::Ready<()> {
        let log = Arc::clone(log);
        move |_, index, _| {
            log.lock().unwrap().push(index);
            ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn plays_every_step_in_order() {
        let animator = animator(10);
        let log: Log = Arc::default();
        let completed = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&completed);

        let outcome = animator
            .animate_with(trace(25), recorder(&log), move || done.store(true, Ordering::SeqCst))
            .await;

        assert_eq!(outcome, PlaybackOutcome::Completed);
        assert!(completed.load(Ordering::SeqCst));
        assert_eq!(*log.lock().unwrap(), (0..25).collect::<Vec<_>>());
        assert_eq!(animator.phase(), Phase::Idle);
        assert_eq!(animator.status().progress, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn no_delay_after_last_step() {
        let animator = animator(100);
        let start = Instant::now();
        animator.animate(trace(3), |_, _, _| ready(())).await;
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn awaits_async_callbacks() {
        let animator = animator(0);
        let log: Log = Arc::default();
        let sink = Arc::clone(&log);

        animator
            .animate(trace(3), move |_, index, total| {
                let sink = Arc::clone(&sink);
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    assert_eq!(total, 3);
                    sink.lock().unwrap().push(index);
                }
            })
            .await;

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_from_callback_stops_playback() {
        let animator = animator(50);
        let log: Log = Arc::default();
        let completed = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&completed);
        let handle = animator.clone();
        let sink = Arc::clone(&log);

        let outcome = animator
            .animate_with(
                trace(10),
                move |_, index, _| {
                    sink.lock().unwrap().push(index);
                    if index == 4 {
                        handle.cancel();
                    }
                    ready(())
                },
                move || done.store(true, Ordering::SeqCst),
            )
            .await;

        assert_eq!(outcome, PlaybackOutcome::Cancelled);
        assert!(!completed.load(Ordering::SeqCst));
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(animator.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_delay() {
        let animator = animator(100);
        let log: Log = Arc::default();

        let task = {
            let animator = animator.clone();
            let on_step = recorder(&log);
            tokio::spawn(async move { animator.animate(trace(10), on_step).await })
        };

        tokio::time::sleep(Duration::from_millis(250)).await;
        let cancelled_at = Instant::now();
        animator.cancel();

        assert_eq!(task.await.unwrap(), PlaybackOutcome::Cancelled);
        assert_eq!(cancelled_at.elapsed(), Duration::ZERO);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_resume_plays_everything_once() {
        let animator = animator(100);
        let log: Log = Arc::default();

        let task = {
            let animator = animator.clone();
            let pauser = animator.clone();
            let sink = Arc::clone(&log);
            tokio::spawn(async move {
                animator
                    .animate(trace(10), move |_, index, _| {
                        sink.lock().unwrap().push(index);
                        if index == 2 {
                            pauser.pause();
                        }
                        ready(())
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(animator.is_paused());
        assert_eq!(log.lock().unwrap().len(), 3);
        let status = animator.status();
        assert_eq!((status.current_step, status.total_steps), (3, 10));

        animator.resume();
        assert_eq!(task.await.unwrap(), PlaybackOutcome::Completed);
        assert_eq!(*log.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_during_delay_holds_at_its_end() {
        let animator = animator(100);
        let log: Log = Arc::default();

        let task = {
            let animator = animator.clone();
            let on_step = recorder(&log);
            tokio::spawn(async move { animator.animate(trace(3), on_step).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        animator.pause();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(log.lock().unwrap().len(), 1);

        let resumed_at = Instant::now();
        animator.resume();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(log.lock().unwrap().len(), 2);

        assert_eq!(task.await.unwrap(), PlaybackOutcome::Completed);
        assert_eq!(resumed_at.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_while_paused() {
        let animator = animator(100);
        let handle = animator.clone();

        let task = {
            let animator = animator.clone();
            tokio::spawn(async move {
                animator
                    .animate(trace(5), move |_, index, _| {
                        if index == 0 {
                            handle.pause();
                        }
                        ready(())
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(animator.is_paused());
        animator.cancel();
        assert_eq!(task.await.unwrap(), PlaybackOutcome::Cancelled);
        assert!(!animator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn new_animation_supersedes_running_one() {
        let animator = animator(100);
        let log: Arc<Mutex<Vec<(char, usize)>>> = Arc::default();

        let first = {
            let animator = animator.clone();
            let sink = Arc::clone(&log);
            tokio::spawn(async move {
                animator
                    .animate(trace(10), move |_, index, _| {
                        sink.lock().unwrap().push(('a', index));
                        ready(())
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(150)).await;
        let sink = Arc::clone(&log);
        let second = animator
            .animate(trace(2), move |_, index, _| {
                sink.lock().unwrap().push(('b', index));
                ready(())
            })
            .await;

        assert_eq!(second, PlaybackOutcome::Completed);
        assert_eq!(first.await.unwrap(), PlaybackOutcome::Superseded);
        assert_eq!(
            *log.lock().unwrap(),
            vec![('a', 0), ('a', 1), ('b', 0), ('b', 1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_while_waiting_for_previous_run_sticks() {
        let animator = animator(10);
        let log: Log = Arc::default();

        let first = {
            let animator = animator.clone();
            tokio::spawn(async move {
                animator
                    .animate(trace(5), |_, _, _| tokio::time::sleep(Duration::from_millis(500)))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = {
            let animator = animator.clone();
            let on_step = recorder(&log);
            tokio::spawn(async move { animator.animate(trace(5), on_step).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        animator.cancel();

        assert_eq!(first.await.unwrap(), PlaybackOutcome::Superseded);
        assert_eq!(second.await.unwrap(), PlaybackOutcome::Cancelled);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(animator.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_separates_every_step() {
        let animator = animator(100);
        let start = Instant::now();
        let times: Arc<Mutex<Vec<Duration>>> = Arc::default();
        let sink = Arc::clone(&times);

        animator
            .animate(trace(4), move |_, _, _| {
                sink.lock().unwrap().push(start.elapsed());
                ready(())
            })
            .await;

        let expected: Vec<_> = (0..4).map(|i| Duration::from_millis(100 * i)).collect();
        assert_eq!(*times.lock().unwrap(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_applies_to_next_wait() {
        let animator = animator(1000);
        let handle = animator.clone();
        let times: Arc<Mutex<Vec<Instant>>> = Arc::default();
        let sink = Arc::clone(&times);

        animator
            .animate(trace(3), move |_, index, _| {
                sink.lock().unwrap().push(Instant::now());
                if index == 0 {
                    handle.set_step_delay(Duration::from_millis(10));
                }
                ready(())
            })
            .await;

        let times = times.lock().unwrap();
        assert_eq!(times[2] - times[0], Duration::from_millis(20));
        assert_eq!(animator.step_delay(), Duration::from_millis(10));
    }

    #[test]
    fn empty_trace_completes_immediately() {
        let animator = animator(1000);
        let completed = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&completed);

        let mut playback = tokio_test::task::spawn(animator.animate_with(
            trace(0),
            |_, _, _| ready(()),
            move || done.store(true, Ordering::SeqCst),
        ));

        tokio_test::assert_ready_eq!(playback.poll(), PlaybackOutcome::Completed);
        assert!(completed.load(Ordering::SeqCst));
    }

    #[test]
    fn controls_are_noops_when_idle() {
        let animator = Animator::default();
        animator.pause();
        animator.resume();
        animator.cancel();

        let status = animator.status();
        assert_eq!(status.phase, Phase::Idle);
        assert_eq!(status.progress, 0.0);
        assert_eq!(status.step_delay_ms, 1500);
    }
}
