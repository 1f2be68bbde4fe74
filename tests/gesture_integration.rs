//! End-to-end gesture tests
//!
//! Drive the event loop with scripted input on a paused runtime and check
//! exactly what reaches the virtual devices.

use std::time::Duration;

use mouse_autoscroll::daemon::{self, LoopStats};
use mouse_autoscroll::gesture::{Decision, GestureContext, GestureSettings, GestureState};
use mouse_autoscroll::input::{
    codes, Axis, ButtonBinding, InputRecord, MonotonicClock, MouseButton, OutputRole,
    RecordingSink, ScriptedSource, Write,
};

const TICK: Duration = Duration::from_micros(16_667);

fn secondary(pressed: bool, t: u64) -> InputRecord {
    InputRecord::key(codes::BTN_RIGHT, pressed, t)
}

fn primary(pressed: bool, t: u64) -> InputRecord {
    InputRecord::key(codes::BTN_LEFT, pressed, t)
}

async fn run_with(
    settings: GestureSettings,
    records: Vec<InputRecord>,
) -> (GestureContext, RecordingSink, LoopStats) {
    let clock = MonotonicClock::new();
    let mut ctx = GestureContext::new(settings, clock.now_us());
    let mut source = ScriptedSource::new(records, clock);
    let mut sink = RecordingSink::new();

    let stats = daemon::run(
        &mut ctx,
        &mut source,
        &mut sink,
        clock,
        TICK,
        std::future::pending(),
    )
    .await
    .expect("scripted run");

    (ctx, sink, stats)
}

async fn run_script(records: Vec<InputRecord>) -> (GestureContext, RecordingSink, LoopStats) {
    run_with(GestureSettings::default(), records).await
}

fn wheel_total(sink: &RecordingSink, code: u16) -> i32 {
    sink.records(OutputRole::Pointer)
        .iter()
        .filter(|r| r.event_type == codes::EV_REL && r.code == code)
        .map(|r| r.value)
        .sum()
}

#[tokio::test(start_paused = true)]
async fn test_right_click_without_motion_is_a_click() {
    let (ctx, sink, stats) = run_script(vec![secondary(true, 0), secondary(false, 80_000)]).await;

    // The held-back press is written right before the reemitted release
    assert_eq!(
        sink.writes(),
        &[
            Write::Event(OutputRole::Pointer, InputRecord::key(codes::BTN_RIGHT, true, 80_000)),
            Write::Sync(OutputRole::Pointer),
            Write::Event(OutputRole::Pointer, secondary(false, 80_000)),
        ]
    );
    assert_eq!(ctx.state(), GestureState::Idle);
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.reemitted, 1);
}

#[test]
fn test_decision_sequences() {
    let mut ctx = GestureContext::new(GestureSettings::default(), 0);
    let click: Vec<_> = [secondary(true, 0), secondary(false, 1_000)]
        .iter()
        .map(|r| ctx.dispatch(r).decision)
        .collect();
    assert_eq!(click, vec![Decision::Drop, Decision::Reemit]);
    assert_eq!(ctx.state(), GestureState::Idle);

    let mut ctx = GestureContext::new(GestureSettings::default(), 0);
    let gesture: Vec<_> = [
        secondary(true, 0),
        InputRecord::rel(codes::REL_X, -7, 1_000),
        secondary(false, 2_000),
    ]
    .iter()
    .map(|r| ctx.dispatch(r).decision)
    .collect();
    assert_eq!(gesture, vec![Decision::Drop; 3]);
    assert_eq!(ctx.state(), GestureState::Idle);
    assert_eq!(ctx.scroll_delta(Axis::Horizontal), 0.0);
    assert_eq!(ctx.scroll_delta(Axis::Vertical), 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_vertical_drag_scrolls_before_release() {
    let mut records = vec![secondary(true, 0)];
    for i in 1..=50u64 {
        records.push(InputRecord::rel(codes::REL_Y, 5, i * 1_000));
        records.push(InputRecord::syn_report(i * 1_000));
    }
    let release_at = 51_000;
    records.push(secondary(false, release_at));

    let (ctx, sink, _) = run_script(records).await;

    let pointer = sink.records(OutputRole::Pointer);
    let scroll: Vec<_> = pointer
        .iter()
        .filter(|r| r.code == codes::REL_WHEEL_HI_RES && r.event_type == codes::EV_REL)
        .collect();

    assert!(!scroll.is_empty());
    assert!(scroll.iter().all(|r| r.timestamp_us < release_at));
    assert_eq!(wheel_total(&sink, codes::REL_HWHEEL_HI_RES), 0);
    assert_eq!(wheel_total(&sink, codes::REL_HWHEEL), 0);

    // Motion itself never reaches the pointer during the gesture
    assert!(pointer
        .iter()
        .all(|r| !(r.event_type == codes::EV_REL && r.code == codes::REL_Y)));
    assert_eq!(ctx.state(), GestureState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_horizontal_drag_scrolls_horizontally() {
    let mut records = vec![secondary(true, 0)];
    for i in 1..=120u64 {
        records.push(InputRecord::rel(codes::REL_X, 4, i * 1_000));
    }
    records.push(secondary(false, 200_000));

    let (_, sink, _) = run_script(records).await;

    assert!(wheel_total(&sink, codes::REL_HWHEEL_HI_RES) > 0);
    assert_eq!(wheel_total(&sink, codes::REL_WHEEL_HI_RES), 0);
}

#[tokio::test(start_paused = true)]
async fn test_scrolling_stops_at_release() {
    let mut records = vec![secondary(true, 0)];
    for i in 1..=30u64 {
        records.push(InputRecord::rel(codes::REL_Y, 6, i * 1_000));
    }
    records.push(secondary(false, 40_000));
    // Idle traffic long after the release keeps the loop ticking
    records.push(InputRecord::rel(codes::REL_X, 1, 500_000));

    let (_, sink, stats) = run_script(records).await;

    assert!(stats.ticks > 20);
    assert!(sink
        .records(OutputRole::Pointer)
        .iter()
        .filter(|r| r.code == codes::REL_WHEEL_HI_RES && r.event_type == codes::EV_REL)
        .all(|r| r.timestamp_us < 40_000));
}

#[tokio::test(start_paused = true)]
async fn test_primary_click_while_armed_taps_space() {
    let records = vec![
        secondary(true, 0),
        primary(true, 10_000),
        primary(false, 20_000),
        secondary(false, 30_000),
    ];

    let (_, sink, _) = run_script(records).await;

    let keyboard = sink.records(OutputRole::Keyboard);
    assert_eq!(
        keyboard,
        vec![
            InputRecord::key(codes::KEY_SPACE, true, 10_000),
            InputRecord::key(codes::KEY_SPACE, false, 10_000),
        ]
    );
    assert_eq!(sink.sync_count(OutputRole::Keyboard), 2);

    // The primary press was consumed; its release passes through
    let pointer = sink.records(OutputRole::Pointer);
    assert!(!pointer.contains(&primary(true, 10_000)));
    assert!(pointer.contains(&primary(false, 20_000)));
}

#[tokio::test(start_paused = true)]
async fn test_unclassified_events_pass_through_unchanged() {
    let records = vec![
        InputRecord::key(codes::BTN_MIDDLE, true, 0),
        InputRecord::syn_report(0),
        InputRecord::key(codes::BTN_MIDDLE, false, 3_000),
        InputRecord::syn_report(3_000),
        InputRecord::rel(codes::REL_WHEEL_HI_RES, -120, 5_000),
        InputRecord::key(codes::BTN_SIDE, true, 7_000),
        InputRecord::new(codes::EV_SYN, 3, 0, 9_000),
    ];

    let (_, sink, stats) = run_script(records.clone()).await;

    assert_eq!(sink.records(OutputRole::Pointer), records);
    assert_eq!(stats.reemitted, records.len() as u64);
}

#[tokio::test(start_paused = true)]
async fn test_low_res_wheel_and_scan_are_dropped() {
    let records = vec![
        InputRecord::new(codes::EV_MSC, codes::MSC_SCAN, 0x90001, 0),
        InputRecord::rel(codes::REL_WHEEL, 1, 0),
        InputRecord::rel(codes::REL_WHEEL_HI_RES, 120, 0),
        InputRecord::syn_report(0),
    ];

    let (_, sink, stats) = run_script(records).await;

    assert_eq!(
        sink.records(OutputRole::Pointer),
        vec![
            InputRecord::rel(codes::REL_WHEEL_HI_RES, 120, 0),
            InputRecord::syn_report(0),
        ]
    );
    assert_eq!(stats.dropped, 2);
}

#[tokio::test(start_paused = true)]
async fn test_middle_button_binding() {
    let settings = GestureSettings {
        binding: ButtonBinding::new(MouseButton::Left, MouseButton::Middle),
        ..GestureSettings::default()
    };

    let mut records = vec![InputRecord::key(codes::BTN_MIDDLE, true, 0)];
    for i in 1..=50u64 {
        records.push(InputRecord::rel(codes::REL_Y, -5, i * 1_000));
    }
    records.push(InputRecord::key(codes::BTN_MIDDLE, false, 60_000));
    // Right button is ordinary under this binding
    records.push(secondary(true, 70_000));

    let (ctx, sink, _) = run_with(settings, records).await;

    // Upward motion scrolls up
    assert!(wheel_total(&sink, codes::REL_WHEEL_HI_RES) > 0);
    assert!(sink.records(OutputRole::Pointer).contains(&secondary(true, 70_000)));
    assert_eq!(ctx.state(), GestureState::Idle);
}
