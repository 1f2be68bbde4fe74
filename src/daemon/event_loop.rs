//! Event loop
//!
//! Multiplexes the input source and the scroll ticker on one task. When both
//! are ready the input branch wins, so a tick always sees every event that
//! arrived before it. Missed ticks are skipped rather than replayed; the
//! integrator reads real elapsed time instead.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::gesture::{Decision, GestureContext};
use crate::input::{
    codes, InputRecord, InputSource, MonotonicClock, OutputRole, OutputSink, Result, Write,
};

/// Counters kept by the loop and logged at shutdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Hardware events read
    pub events: u64,
    /// Hardware events forwarded unmodified
    pub reemitted: u64,
    /// Hardware events consumed
    pub dropped: u64,
    /// Synthesized writes from transitions (space taps, click replays)
    pub synthesized: u64,
    /// Ticker firings
    pub ticks: u64,
    /// Absolute high-resolution wheel units emitted
    pub scroll_units: u64,
}

impl LoopStats {
    /// Log the counters
    pub fn log(&self) {
        info!("=== Session Statistics ===");
        info!("  Events read: {}", self.events);
        info!("  Reemitted: {}", self.reemitted);
        info!("  Dropped: {}", self.dropped);
        info!("  Synthesized: {}", self.synthesized);
        info!("  Ticks: {}", self.ticks);
        info!("  Scroll units: {}", self.scroll_units);
    }
}

/// Run until the source ends, `shutdown` resolves, or a device fails
///
/// `clock` must be the clock the source stamps its records with.
pub async fn run<S, O, F>(
    ctx: &mut GestureContext,
    source: &mut S,
    sink: &mut O,
    clock: MonotonicClock,
    tick_interval: Duration,
    shutdown: F,
) -> Result<LoopStats>
where
    S: InputSource,
    O: OutputSink,
    F: Future<Output = ()>,
{
    let mut stats = LoopStats::default();

    let mut ticker = interval_at(Instant::now() + tick_interval, tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::pin!(shutdown);

    debug!("Event loop started, tick interval {:?}", tick_interval);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }

            event = source.next_event() => match event? {
                Some(record) => handle_event(ctx, sink, &record, &mut stats)?,
                None => {
                    info!("Input source closed");
                    break;
                }
            },

            _ = ticker.tick() => handle_tick(ctx, sink, clock.now_us(), &mut stats)?,
        }
    }

    Ok(stats)
}

fn handle_event<O: OutputSink>(
    ctx: &mut GestureContext,
    sink: &mut O,
    record: &InputRecord,
    stats: &mut LoopStats,
) -> Result<()> {
    stats.events += 1;
    trace!(
        "Event type={} code={} value={} t={}",
        record.event_type,
        record.code,
        record.value,
        record.timestamp_us
    );

    let transition = ctx.dispatch(record);

    stats.synthesized += transition
        .writes
        .iter()
        .filter(|w| matches!(w, Write::Event(..)))
        .count() as u64;
    sink.apply(&transition.writes)?;

    match transition.decision {
        Decision::Reemit => {
            stats.reemitted += 1;
            sink.write(OutputRole::Pointer, *record)
        }
        Decision::Drop => {
            stats.dropped += 1;
            Ok(())
        }
    }
}

fn handle_tick<O: OutputSink>(
    ctx: &mut GestureContext,
    sink: &mut O,
    now_us: u64,
    stats: &mut LoopStats,
) -> Result<()> {
    stats.ticks += 1;

    let writes = ctx.tick(now_us);
    stats.scroll_units += writes
        .iter()
        .filter_map(|w| match w {
            Write::Event(_, r)
                if r.code == codes::REL_WHEEL_HI_RES || r.code == codes::REL_HWHEEL_HI_RES =>
            {
                Some(u64::from(r.value.unsigned_abs()))
            }
            _ => None,
        })
        .sum::<u64>();

    sink.apply(&writes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{GestureSettings, GestureState};
    use crate::input::{DeviceError, RecordingSink, ScriptedSource};
    use std::io;

    mockall::mock! {
        FailingSink {}

        impl OutputSink for FailingSink {
            fn write(&mut self, role: OutputRole, record: InputRecord) -> Result<()>;
            fn sync(&mut self, role: OutputRole) -> Result<()>;
        }
    }

    const TICK: Duration = Duration::from_micros(16_667);

    async fn run_script(records: Vec<InputRecord>) -> (GestureContext, RecordingSink, LoopStats) {
        let clock = MonotonicClock::new();
        let mut ctx = GestureContext::new(GestureSettings::default(), clock.now_us());
        let mut source = ScriptedSource::new(records, clock);
        let mut sink = RecordingSink::new();

        let stats = run(
            &mut ctx,
            &mut source,
            &mut sink,
            clock,
            TICK,
            std::future::pending(),
        )
        .await
        .unwrap();

        (ctx, sink, stats)
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_motion_passthrough() {
        let records = vec![
            InputRecord::rel(codes::REL_X, 3, 0),
            InputRecord::syn_report(0),
            InputRecord::rel(codes::REL_Y, -2, 8_000),
            InputRecord::syn_report(8_000),
        ];
        let (ctx, sink, stats) = run_script(records.clone()).await;

        assert_eq!(ctx.state(), GestureState::Idle);
        assert_eq!(sink.records(OutputRole::Pointer), records);
        assert_eq!(stats.events, 4);
        assert_eq!(stats.reemitted, 4);
        assert_eq!(stats.dropped, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gesture_scrolls_before_release() {
        let mut records = vec![InputRecord::key(codes::BTN_RIGHT, true, 0)];
        for i in 1..=50u64 {
            records.push(InputRecord::rel(codes::REL_Y, 5, i * 1_000));
        }
        records.push(InputRecord::key(codes::BTN_RIGHT, false, 51_000));

        let (ctx, sink, stats) = run_script(records).await;

        let pointer = sink.records(OutputRole::Pointer);
        let vertical: i32 = pointer
            .iter()
            .filter(|r| r.code == codes::REL_WHEEL_HI_RES)
            .map(|r| r.value)
            .sum();
        assert!(vertical < 0, "vertical {vertical}");
        assert!(pointer.iter().all(|r| r.code != codes::REL_HWHEEL_HI_RES));

        // Neither the button nor the motion reached the output
        assert!(pointer.iter().all(|r| r.code != codes::BTN_RIGHT));
        assert!(pointer.iter().all(|r| r.code != codes::REL_Y));

        assert_eq!(ctx.state(), GestureState::Idle);
        assert_eq!(stats.dropped, 52);
        assert!(stats.ticks >= 3);
        assert!(stats.scroll_units > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_future_ends_loop() {
        let clock = MonotonicClock::new();
        let mut ctx = GestureContext::new(GestureSettings::default(), 0);
        let mut source =
            ScriptedSource::new([InputRecord::rel(codes::REL_X, 1, 10_000_000)], clock);
        let mut sink = RecordingSink::new();

        let shutdown = tokio::time::sleep(Duration::from_millis(100));
        let stats = run(&mut ctx, &mut source, &mut sink, clock, TICK, shutdown)
            .await
            .unwrap();

        assert_eq!(stats.events, 0);
        assert_eq!(source.remaining(), 1);
        assert!(sink.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_ends_loop() {
        let clock = MonotonicClock::new();
        let mut ctx = GestureContext::new(GestureSettings::default(), 0);
        let mut source = ScriptedSource::new(
            [
                InputRecord::rel(codes::REL_X, 1, 0),
                InputRecord::rel(codes::REL_X, 1, 1_000),
            ],
            clock,
        );

        let mut sink = MockFailingSink::new();
        sink.expect_write().times(1).returning(|_, _| {
            Err(DeviceError::Write {
                role: "pointer",
                source: io::Error::from(io::ErrorKind::BrokenPipe),
            })
        });

        let result = run(
            &mut ctx,
            &mut source,
            &mut sink,
            clock,
            TICK,
            std::future::pending(),
        )
        .await;

        assert!(matches!(result, Err(DeviceError::Write { .. })));
        assert_eq!(source.remaining(), 1);
    }
}
