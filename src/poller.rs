//! # Poll Loop Module
//!
//! Drives the edge detector at a fixed interval and reports edges.
//!
//! Each detected edge is written as a line (`rising edge` / `falling edge`)
//! to the output writer, normally stdout, and appended to the event log when
//! one is attached.

use std::fs::File;
use std::future::Future;
use std::io::Write;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::controller::{poll, Event, SessionState};
use crate::error::Result;
use crate::event_log::{EdgeRecord, EventLog};
use crate::vr::{ButtonId, ControllerRole, VrSystem};

/// Default time between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Counters accumulated by a [`PollLoop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub rising_edges: u64,
    pub falling_edges: u64,
}

/// Polls one button on one controller until told to stop.
pub struct PollLoop<S> {
    session: SessionState<S>,
    role: ControllerRole,
    button: ButtonId,
    period: Duration,
    event_log: Option<EventLog<File>>,
    stats: PollStats,
}

impl<S: VrSystem> PollLoop<S> {
    /// Creates a loop polling `button` on the `role` controller every `period`.
    pub fn new(
        session: SessionState<S>,
        role: ControllerRole,
        button: ButtonId,
        period: Duration,
    ) -> Self {
        Self {
            session,
            role,
            button,
            period,
            event_log: None,
            stats: PollStats::default(),
        }
    }

    /// Attaches an event log that receives every detected edge.
    #[must_use]
    pub fn with_event_log(mut self, event_log: EventLog<File>) -> Self {
        self.event_log = Some(event_log);
        self
    }

    /// Detector state driven by this loop.
    pub fn session(&self) -> &SessionState<S> {
        &self.session
    }

    /// Counters so far.
    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Runs one poll, reporting an edge to `out` if one was detected.
    ///
    /// # Errors
    ///
    /// Returns `Io` error if writing to `out` fails. Event log failures are
    /// logged and do not stop polling.
    pub fn tick<W: Write>(&mut self, out: &mut W) -> Result<Event> {
        let event = poll(&mut self.session, self.role, self.button);
        self.stats.ticks += 1;

        match event {
            Event::None => return Ok(event),
            Event::RisingEdge => self.stats.rising_edges += 1,
            Event::FallingEdge => self.stats.falling_edges += 1,
        }

        debug!("{} on {} hand ({})", event, self.role, self.button);
        writeln!(out, "{}", event)?;
        out.flush()?;

        if let Some(log) = self.event_log.as_mut() {
            if let Err(e) = log.append(&EdgeRecord::now(self.role, self.button, event)) {
                warn!("Failed to log edge event: {}", e);
            }
        }

        Ok(event)
    }

    /// Polls every period until `shutdown` completes.
    ///
    /// The first poll happens one period after the call, matching a
    /// sleep-then-poll loop.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`PollLoop::tick`].
    pub async fn run<W, F>(mut self, out: &mut W, shutdown: F) -> Result<PollStats>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            "Polling {} on {} hand every {}ms",
            self.button,
            self.role,
            self.period.as_millis()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(out)?;
                }

                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping poll loop");
                    break;
                }
            }
        }

        info!(
            "Polled {} times: {} rising, {} falling",
            self.stats.ticks, self.stats.rising_edges, self.stats.falling_edges
        );
        if let Some(log) = &self.event_log {
            info!("Event log holds {} new records", log.records_written());
        }
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vr::ReplaySystem;
    use std::io;
    use tokio_test::assert_ok;

    const CLICK_RECORDING: &str = r#"
{"left": {"packet_number": 1, "button_mask": 4294967296}}
{"left": {"packet_number": 2, "button_mask": 4294967296}}
{"left": {"packet_number": 3, "button_mask": 0}}
{"left": {"packet_number": 4, "button_mask": 4294967296, "axes": [{"x": 0.9, "y": 0.0}]}}
"#;

    fn click_loop() -> PollLoop<ReplaySystem> {
        let replay = ReplaySystem::parse(CLICK_RECORDING, false).unwrap();
        PollLoop::new(
            SessionState::new(replay),
            ControllerRole::Left,
            ButtonId::AXIS0,
            DEFAULT_POLL_INTERVAL,
        )
    }

    #[test]
    fn test_tick_writes_edge_lines() {
        let mut poller = click_loop();
        let mut out = Vec::new();

        let events: Vec<_> = (0..6).map(|_| poller.tick(&mut out).unwrap()).collect();
        assert_eq!(
            events,
            vec![
                Event::RisingEdge,
                Event::None,
                Event::FallingEdge,
                Event::None,
                Event::None,
                Event::None,
            ]
        );

        assert_eq!(String::from_utf8(out).unwrap(), "rising edge\nfalling edge\n");
        assert_eq!(
            poller.stats(),
            PollStats {
                ticks: 6,
                rising_edges: 1,
                falling_edges: 1,
            }
        );
        assert!(!poller.session().event_high());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "Mock write error"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_release_on_repeated_packet_number() {
        let recording = r#"
{"left": {"packet_number": 1, "button_mask": 4294967296}}
{"left": {"packet_number": 1, "button_mask": 4294967296}}
{"left": {"packet_number": 2, "button_mask": 4294967296}}
{"left": {"packet_number": 2, "button_mask": 0}}
{"left": {"packet_number": 3, "button_mask": 4294967296, "axes": [{"x": 0.8, "y": 0.0}]}}
"#;
        let replay = ReplaySystem::parse(recording, false).unwrap();
        let mut poller = PollLoop::new(
            SessionState::new(replay),
            ControllerRole::Left,
            ButtonId::AXIS0,
            DEFAULT_POLL_INTERVAL,
        );
        let mut out = Vec::new();

        let events: Vec<_> = (0..5).map(|_| poller.tick(&mut out).unwrap()).collect();
        assert_eq!(
            events,
            vec![
                Event::RisingEdge,
                Event::None,
                Event::None,
                Event::FallingEdge,
                Event::None,
            ]
        );
        assert_eq!(String::from_utf8(out).unwrap(), "rising edge\nfalling edge\n");
        assert!(!poller.session().event_high());
    }

    #[test]
    fn test_tick_output_failure_is_an_error() {
        let mut poller = click_loop();
        assert!(poller.tick(&mut ClosedPipe).is_err());
    }

    #[test]
    fn test_tick_without_edge_skips_output() {
        let replay = ReplaySystem::parse(CLICK_RECORDING, false).unwrap();
        let mut poller = PollLoop::new(
            SessionState::new(replay),
            ControllerRole::Right,
            ButtonId::AXIS0,
            DEFAULT_POLL_INTERVAL,
        );

        // Nothing recorded for the right hand, so the broken writer is never touched
        assert_eq!(assert_ok!(poller.tick(&mut ClosedPipe)), Event::None);
    }

    #[test]
    fn test_tick_appends_to_event_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.jsonl");

        let mut poller = click_loop().with_event_log(EventLog::open(&path).unwrap());
        let mut out = Vec::new();
        for _ in 0..4 {
            poller.tick(&mut out).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let events: Vec<String> = contents
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["event"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(events, vec!["rising_edge", "falling_edge"]);
    }

    #[test]
    fn test_demo_recording() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/joystick_click.jsonl");
        let replay = ReplaySystem::load(path, false).unwrap();
        let frames = replay.len();
        let mut poller = PollLoop::new(
            SessionState::new(replay),
            ControllerRole::Left,
            ButtonId::AXIS0,
            DEFAULT_POLL_INTERVAL,
        );

        let mut out = Vec::new();
        for _ in 0..frames {
            poller.tick(&mut out).unwrap();
        }

        // The deflected push in the middle produces nothing
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "rising edge\nfalling edge\nrising edge\nfalling edge\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_until_shutdown() {
        let mut out = Vec::new();
        let shutdown = tokio::time::sleep(Duration::from_millis(350));

        let stats = assert_ok!(click_loop().run(&mut out, shutdown).await);

        // Polls at 100, 200 and 300ms
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.rising_edges, 1);
        assert_eq!(stats.falling_edges, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "rising edge\nfalling edge\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_immediate_shutdown() {
        let mut out = Vec::new();
        let stats = assert_ok!(click_loop().run(&mut out, async {}).await);

        assert_eq!(stats, PollStats::default());
        assert!(out.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_output_error() {
        let result = click_loop()
            .run(&mut ClosedPipe, tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert!(result.is_err());
    }
}
