//! End-to-end races on real timers.

use request_race::{
    race, Clock, Config, Constant, Diagnostics, Entropy, Operation, Outcome, Probe, Spawner,
    State, ThreadRandom, Timers,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

const WIN: Constant = Constant(0);
const LOSE: Constant = Constant(5);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Completed(usize, Outcome),
    Cancelled(usize),
}

#[derive(Debug, Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Event>>>);

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

impl Diagnostics for Recorder {
    fn completed(&self, id: usize, outcome: Outcome, _elapsed: Duration) {
        self.0.lock().unwrap().push(Event::Completed(id, outcome));
    }

    fn cancelled(&self, id: usize) {
        self.0.lock().unwrap().push(Event::Cancelled(id));
    }
}

fn spawner(entropy: impl Entropy + 'static, recorder: &Recorder) -> Spawner {
    Spawner::new(Config::default())
        .unwrap()
        .with_entropy(entropy)
        .with_diagnostics(recorder.clone())
}

/// Build one operation per `(millis, entropy)` pair, numbered from one.
fn operations(
    plan: [(u64, Constant); 3],
    recorder: &Recorder,
) -> Vec<Operation<<Timers as Clock>::Sleep>> {
    plan.into_iter()
        .enumerate()
        .map(|(i, (ms, entropy))| {
            spawner(entropy, recorder).operation(i + 1, Duration::from_millis(ms))
        })
        .collect()
}

fn states(probes: &[Probe]) -> Vec<State> {
    probes.iter().map(Probe::state).collect()
}

#[tokio::test]
async fn single_success() {
    let recorder = Recorder::default();
    let start = Instant::now();
    let op = spawner(WIN, &recorder).operation(1, Duration::from_millis(10));
    let probe = op.probe();
    assert!(race(vec![op]).await);
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(10));
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    assert_eq!(probe.state(), State::Succeeded);
    assert_eq!(recorder.events(), [Event::Completed(1, Outcome::Succeeded)]);
}

#[tokio::test]
async fn failures_finish_before_the_late_winner() {
    let recorder = Recorder::default();
    let start = Instant::now();
    let ops = operations([(100, LOSE), (50, LOSE), (200, WIN)], &recorder);
    let probes: Vec<_> = ops.iter().map(Operation::probe).collect();
    assert!(race(ops).await);
    assert!(start.elapsed() >= Duration::from_millis(200));

    assert_eq!(
        states(&probes),
        [State::Failed, State::Failed, State::Succeeded]
    );
    assert_eq!(
        recorder.events(),
        [
            Event::Completed(2, Outcome::Failed),
            Event::Completed(1, Outcome::Failed),
            Event::Completed(3, Outcome::Succeeded),
        ]
    );
}

#[tokio::test]
async fn early_winner_cancels_the_slow_one() {
    let recorder = Recorder::default();
    let start = Instant::now();
    let ops = operations([(50, WIN), (500, WIN), (10, LOSE)], &recorder);
    let probes: Vec<_> = ops.iter().map(Operation::probe).collect();
    assert!(race(ops).await);
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_millis(500), "took {elapsed:?}");
    assert_eq!(
        states(&probes),
        [State::Succeeded, State::Cancelled, State::Failed]
    );
    assert_eq!(
        recorder.events(),
        [
            Event::Completed(3, Outcome::Failed),
            Event::Completed(1, Outcome::Succeeded),
            Event::Cancelled(2),
        ]
    );
}

#[tokio::test]
async fn all_failures_are_waited_for() {
    let recorder = Recorder::default();
    let start = Instant::now();
    let ops = spawner(LOSE, &recorder).spawn_exact(2);
    let probes: Vec<_> = ops.iter().map(Operation::probe).collect();
    let slowest = ops.iter().map(Operation::duration).max().unwrap();
    assert!(!race(ops).await);

    assert!(start.elapsed() >= slowest);
    assert_eq!(states(&probes), [State::Failed, State::Failed]);
    assert_eq!(recorder.events().len(), 2);
}

#[tokio::test]
async fn cancellation_aborts_long_delays() {
    let recorder = Recorder::default();
    let start = Instant::now();
    let ops = operations([(60_000, WIN), (5, WIN), (60_000, LOSE)], &recorder);
    let probes: Vec<_> = ops.iter().map(Operation::probe).collect();
    assert!(race(ops).await);
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(
        states(&probes),
        [State::Cancelled, State::Succeeded, State::Cancelled]
    );

    // Every operation is observed exactly once.
    let mut ids: Vec<_> = recorder
        .events()
        .into_iter()
        .map(|event| match event {
            Event::Completed(id, _) | Event::Cancelled(id) => id,
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, [1, 2, 3]);

    // Cancelling again is a no-op and does not block.
    for probe in &probes {
        probe.cancel();
    }
    assert_eq!(
        states(&probes),
        [State::Cancelled, State::Succeeded, State::Cancelled]
    );
    assert_eq!(recorder.events().len(), 3);
}

/// A clock whose delays never end, for spawning without waiting.
struct Stopped;

struct Forever;

impl Future for Forever {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        Poll::Pending
    }
}

impl Clock for Stopped {
    type Sleep = Forever;

    fn sleep(&self, _duration: Duration) -> Self::Sleep {
        Forever
    }
}

#[test]
fn spawn_stays_in_bounds() {
    let spawner = Spawner::new(Config::default())
        .unwrap()
        .with_clock(Stopped)
        .with_entropy(ThreadRandom)
        .with_diagnostics(());
    let min = Duration::from_millis(50);
    let max = Duration::from_millis(10_000);

    for _ in 0..10_000 {
        let ops = spawner.spawn();
        assert!((1..=15).contains(&ops.len()), "count {}", ops.len());
        for op in &ops {
            assert!(
                (min..=max).contains(&op.duration()),
                "duration {:?}",
                op.duration()
            );
        }
    }
}
