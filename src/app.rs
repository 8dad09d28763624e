use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::LayoutError;
use crate::game::{GameState, TickOutcome};
use crate::input::GameInput;

/// Fixed-interval scheduler driving [`GameState::tick`].
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    last_fire: Instant,
    running: bool,
}

impl TickTimer {
    /// Creates a running timer whose first tick is one interval from `now`.
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_fire: now,
            running: true,
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Restarts the schedule so the next tick is one interval from `now`.
    pub fn resume(&mut self, now: Instant) {
        self.last_fire = now;
        self.running = true;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns true and re-arms when a tick is due at `now`.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        if !self.running || now.saturating_duration_since(self.last_fire) < self.interval {
            return false;
        }

        self.last_fire = now;
        true
    }

    /// Time left until the next tick, or `None` while stopped.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if !self.running {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.last_fire);
        Some(self.interval.saturating_sub(elapsed))
    }
}

/// Game session driven by the terminal event loop.
///
/// Input only queues directions or triggers restart and single steps; the
/// snake itself only changes inside [`GameState::tick`].
#[derive(Debug)]
pub struct App {
    state: GameState,
    timer: TickTimer,
    needs_redraw: bool,
}

impl App {
    #[must_use]
    pub fn new(state: GameState, mut timer: TickTimer) -> Self {
        if state.is_over() {
            timer.stop();
        }

        Self {
            state,
            timer,
            needs_redraw: true,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    /// Returns whether a frame should be drawn and clears the request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Applies one input event. Breaks when the player asked to quit.
    pub fn handle_input(
        &mut self,
        input: GameInput,
        now: Instant,
    ) -> Result<ControlFlow<()>, LayoutError> {
        match input {
            GameInput::Quit => return Ok(ControlFlow::Break(())),
            GameInput::Direction(direction) => self.state.apply_direction(direction),
            GameInput::Restart => {
                self.timer.stop();
                self.state.restart()?;
                self.timer.resume(now);
                self.needs_redraw = true;
            }
            GameInput::Step => self.advance(),
            GameInput::Resize => self.needs_redraw = true,
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Runs one tick when the timer is due at `now`.
    pub fn on_timer(&mut self, now: Instant) {
        if self.timer.poll_due(now) {
            self.advance();
        }
    }

    fn advance(&mut self) {
        let outcome = self.state.tick();
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Moved | TickOutcome::Ate => self.needs_redraw = true,
            TickOutcome::Won | TickOutcome::Lost(_) => {
                self.timer.stop();
                self.needs_redraw = true;
                info!(?outcome, "tick timer stopped");
            }
        }

        debug!(?outcome, tick = self.state.tick_count(), "tick");
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;
    use std::time::{Duration, Instant};

    use super::{App, TickTimer};
    use crate::board::Cell;
    use crate::config::GridSize;
    use crate::game::{GameState, GameStatus};
    use crate::input::{Direction, GameInput};

    const INTERVAL: Duration = Duration::from_millis(100);

    fn app_with_snake(segments: Vec<Cell>, direction: Direction, now: Instant) -> App {
        let state = GameState::with_layout(
            GridSize::REFERENCE,
            segments,
            direction,
            Some(Cell::new(20, 20)),
            5,
        )
        .expect("layout is valid");

        App::new(state, TickTimer::new(INTERVAL, now))
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = TickTimer::new(INTERVAL, start);

        assert!(!timer.poll_due(start + Duration::from_millis(50)));
        assert!(timer.poll_due(start + INTERVAL));
        assert!(!timer.poll_due(start + INTERVAL + Duration::from_millis(10)));
        assert_eq!(
            timer.time_until_due(start + INTERVAL + Duration::from_millis(30)),
            Some(Duration::from_millis(70))
        );
    }

    #[test]
    fn stopped_timer_never_fires() {
        let start = Instant::now();
        let mut timer = TickTimer::new(INTERVAL, start);

        timer.stop();

        assert!(!timer.poll_due(start + INTERVAL * 5));
        assert_eq!(timer.time_until_due(start), None);
    }

    #[test]
    fn first_frame_is_requested_once() {
        let now = Instant::now();
        let mut app = app_with_snake(vec![Cell::new(5, 5)], Direction::Right, now);

        assert!(app.take_redraw());
        assert!(!app.take_redraw());
    }

    #[test]
    fn due_timer_ticks_and_requests_redraw() {
        let now = Instant::now();
        let mut app = app_with_snake(vec![Cell::new(5, 5)], Direction::Right, now);
        app.take_redraw();

        app.on_timer(now + Duration::from_millis(10));
        assert_eq!(app.state().tick_count(), 0);
        assert!(!app.take_redraw());

        app.on_timer(now + INTERVAL);
        assert_eq!(app.state().snake().head(), Cell::new(5, 6));
        assert!(app.take_redraw());
    }

    #[test]
    fn loss_stops_the_timer_and_restart_resumes_it() {
        let now = Instant::now();
        let mut app = app_with_snake(vec![Cell::new(0, 5)], Direction::Up, now);

        app.on_timer(now + INTERVAL);
        assert_eq!(app.state().status(), GameStatus::Lost);
        assert!(!app.timer().is_running());

        let later = now + INTERVAL * 3;
        let flow = app
            .handle_input(GameInput::Restart, later)
            .expect("restart on the reference board succeeds");

        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(app.state().status(), GameStatus::Running);
        assert!(app.timer().is_running());
        assert_eq!(app.timer().time_until_due(later), Some(INTERVAL));
    }

    #[test]
    fn step_advances_immediately_and_is_inert_after_loss() {
        let now = Instant::now();
        let mut app = app_with_snake(vec![Cell::new(1, 5)], Direction::Up, now);

        app.handle_input(GameInput::Step, now).expect("step never fails");
        assert_eq!(app.state().snake().head(), Cell::new(0, 5));

        app.handle_input(GameInput::Step, now).expect("step never fails");
        assert_eq!(app.state().status(), GameStatus::Lost);
        let ticks = app.state().tick_count();

        app.handle_input(GameInput::Step, now).expect("step never fails");
        assert_eq!(app.state().tick_count(), ticks);
    }

    #[test]
    fn direction_input_only_queues() {
        let now = Instant::now();
        let mut app = app_with_snake(vec![Cell::new(5, 5)], Direction::Right, now);

        app.handle_input(GameInput::Direction(Direction::Down), now)
            .expect("direction input never fails");

        assert_eq!(app.state().snake().head(), Cell::new(5, 5));
        assert_eq!(app.state().snake().pending_len(), 1);
    }

    #[test]
    fn quit_breaks_the_loop() {
        let now = Instant::now();
        let mut app = app_with_snake(vec![Cell::new(5, 5)], Direction::Right, now);

        let flow = app
            .handle_input(GameInput::Quit, now)
            .expect("quit never fails");

        assert_eq!(flow, ControlFlow::Break(()));
    }
}
