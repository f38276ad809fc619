// Rock-paper-scissors round flow: Idle -> Countdown -> Reveal.

use crate::domain::features::{fist_compactness, is_compact_fist, palm_center};
use crate::domain::gestures::{
    classify_rock_paper_scissors, classify_thumbs_up, decide_winner, Gesture, Outcome,
};
use crate::domain::landmarks::HandLandmarks;
use crate::domain::ports::RandomSource;
use crate::domain::smoothing::{majority, SlidingBuffer, TimedEvents};
use crate::domain::tuning::{GestureTuning, RpsTuning};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsPhase {
    Idle,
    Countdown,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub round: u64,
    /// `None` when no gesture could be read at decision time.
    pub player: Option<Gesture>,
    pub opponent: Gesture,
    pub outcome: Outcome,
}

/// State change produced by one input, so the caller can arm or drop timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsTransition {
    None,
    CountdownStarted { round: u64, deadline_ms: u64 },
    Revealed(RoundResult),
}

/// Read-only view published after every processing cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RpsSnapshot {
    pub phase: RpsPhase,
    pub round: u64,
    pub hand_visible: bool,
    /// Whole seconds left in the countdown, never below 1 while counting.
    pub seconds_left: Option<u32>,
    pub thumbs_up_votes: usize,
    pub current_guess: Option<Gesture>,
    /// Present only in `Reveal`.
    pub result: Option<RoundResult>,
}

pub struct RpsSession<R> {
    gesture_tuning: GestureTuning,
    tuning: RpsTuning,
    rng: R,

    phase: RpsPhase,
    round: u64,
    countdown_deadline_ms: Option<u64>,
    // Hidden from snapshots until the round is revealed.
    opponent: Option<Gesture>,
    last_result: Option<RoundResult>,

    thumbs_up: SlidingBuffer<bool>,
    guesses: SlidingBuffer<Option<Gesture>>,
    timed_guesses: TimedEvents<Gesture>,

    hand_visible: bool,
    current_guess: Option<Gesture>,
}

impl<R: RandomSource> RpsSession<R> {
    pub fn new(gesture_tuning: GestureTuning, tuning: RpsTuning, rng: R) -> Self {
        Self {
            gesture_tuning,
            tuning,
            rng,
            phase: RpsPhase::Idle,
            round: 0,
            countdown_deadline_ms: None,
            opponent: None,
            last_result: None,
            thumbs_up: SlidingBuffer::new(tuning.thumbs_up_capacity),
            guesses: SlidingBuffer::new(tuning.gesture_capacity),
            timed_guesses: TimedEvents::new(tuning.rolling_window_ms),
            hand_visible: false,
            current_guess: None,
        }
    }

    pub fn phase(&self) -> RpsPhase {
        self.phase
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Round and deadline of the running countdown, if any.
    pub fn pending_deadline(&self) -> Option<(u64, u64)> {
        self.countdown_deadline_ms.map(|deadline| (self.round, deadline))
    }

    /// One classification cycle. `hand` is `None` when nothing was detected;
    /// that only advances the countdown clock.
    pub fn on_frame(&mut self, hand: Option<&HandLandmarks>, now_ms: u64) -> RpsTransition {
        let Some(hand) = hand else {
            self.hand_visible = false;
            self.current_guess = None;
            return self.check_deadline(now_ms);
        };
        self.hand_visible = true;

        let thumbs_up = classify_thumbs_up(hand, &self.gesture_tuning);
        self.thumbs_up.push(thumbs_up);

        let guess = classify_rock_paper_scissors(hand, &self.gesture_tuning);
        self.current_guess = guess;
        self.guesses.push(guess);
        if let Some(g) = guess {
            self.timed_guesses.push(now_ms, g);
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            let palm = palm_center(hand);
            trace!(
                thumbs_up,
                guess = ?guess,
                palm_x = palm.x,
                palm_y = palm.y,
                compactness = fist_compactness(hand),
                compact_fist = is_compact_fist(hand, &self.gesture_tuning),
                "frame classified"
            );
        }

        match self.phase {
            RpsPhase::Idle => {
                if self.thumbs_up_votes() >= self.tuning.thumbs_up_trigger {
                    return self.start_countdown(now_ms);
                }
                RpsTransition::None
            }
            RpsPhase::Countdown => self.check_deadline(now_ms),
            RpsPhase::Reveal => {
                if self.thumbs_up_votes() >= self.tuning.thumbs_up_trigger {
                    // Play again straight from the result screen.
                    self.reset();
                    return self.start_countdown(now_ms);
                }
                RpsTransition::None
            }
        }
    }

    /// Fire-once timer path for the countdown. A stale round or a countdown
    /// that the frame path already finished is ignored.
    pub fn on_countdown_elapsed(&mut self, round: u64, now_ms: u64) -> RpsTransition {
        if self.phase != RpsPhase::Countdown || round != self.round {
            debug!(round, current_round = self.round, "ignoring stale countdown timer");
            return RpsTransition::None;
        }
        self.finalize(now_ms)
    }

    /// Drops all state and returns to Idle. Safe to call in any phase, any
    /// number of times.
    pub fn stop(&mut self) {
        if self.phase != RpsPhase::Idle || self.countdown_deadline_ms.is_some() {
            info!(round = self.round, phase = ?self.phase, "rps session stopped");
        }
        self.reset();
        self.last_result = None;
        self.hand_visible = false;
        self.current_guess = None;
    }

    pub fn snapshot(&self, now_ms: u64) -> RpsSnapshot {
        let seconds_left = match (self.phase, self.countdown_deadline_ms) {
            (RpsPhase::Countdown, Some(deadline)) => {
                let remaining = deadline.saturating_sub(now_ms);
                Some((remaining.div_ceil(1000) as u32).max(1))
            }
            _ => None,
        };

        RpsSnapshot {
            phase: self.phase,
            round: self.round,
            hand_visible: self.hand_visible,
            seconds_left,
            thumbs_up_votes: self.thumbs_up_votes(),
            current_guess: self.current_guess,
            result: match self.phase {
                RpsPhase::Reveal => self.last_result,
                _ => None,
            },
        }
    }

    /// Decisive player gesture: the recent snapshot window first, then the
    /// whole per-frame history.
    pub fn decisive_gesture(&self, now_ms: u64) -> Option<Gesture> {
        let recent = self
            .timed_guesses
            .within(now_ms, self.tuning.snapshot_window_ms)
            .map(Some);
        majority(recent).or_else(|| majority(self.guesses.iter().copied()))
    }

    fn thumbs_up_votes(&self) -> usize {
        self.thumbs_up.count_where(|up| *up)
    }

    fn check_deadline(&mut self, now_ms: u64) -> RpsTransition {
        match (self.phase, self.countdown_deadline_ms) {
            (RpsPhase::Countdown, Some(deadline)) if now_ms >= deadline => self.finalize(now_ms),
            _ => RpsTransition::None,
        }
    }

    fn start_countdown(&mut self, now_ms: u64) -> RpsTransition {
        self.round += 1;
        let deadline_ms = now_ms + self.tuning.countdown_ms;
        let opponent = Gesture::ALL[self.rng.index(Gesture::ALL.len())];

        self.phase = RpsPhase::Countdown;
        self.countdown_deadline_ms = Some(deadline_ms);
        self.opponent = Some(opponent);
        self.last_result = None;
        // Fresh evidence only.
        self.guesses.clear();
        self.timed_guesses.clear();

        info!(round = self.round, deadline_ms, "countdown started");
        debug!(round = self.round, opponent = opponent.as_str(), "opponent chose (hidden)");
        RpsTransition::CountdownStarted {
            round: self.round,
            deadline_ms,
        }
    }

    fn finalize(&mut self, now_ms: u64) -> RpsTransition {
        let Some(opponent) = self.opponent else {
            // Countdown always draws an opponent; nothing sensible to reveal otherwise.
            self.reset();
            return RpsTransition::None;
        };

        let player = self.decisive_gesture(now_ms);
        let outcome = match player {
            Some(p) => decide_winner(p, opponent),
            None => Outcome::Undetermined,
        };
        let result = RoundResult {
            round: self.round,
            player,
            opponent,
            outcome,
        };

        self.phase = RpsPhase::Reveal;
        self.countdown_deadline_ms = None;
        self.last_result = Some(result);

        info!(
            round = self.round,
            player = player.map(Gesture::as_str),
            opponent = opponent.as_str(),
            outcome = ?outcome,
            "round revealed"
        );
        RpsTransition::Revealed(result)
    }

    fn reset(&mut self) {
        self.phase = RpsPhase::Idle;
        self.countdown_deadline_ms = None;
        self.opponent = None;
        self.thumbs_up.clear();
        self.guesses.clear();
        self.timed_guesses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{HandPose, ScriptedRng};

    // 0.0 draws Rock, 0.5 Paper, 0.9 Scissors.
    fn session(opponent_draw: f32) -> RpsSession<ScriptedRng> {
        RpsSession::new(
            GestureTuning::default(),
            RpsTuning::default(),
            ScriptedRng::new(vec![opponent_draw]),
        )
    }

    fn feed(
        session: &mut RpsSession<ScriptedRng>,
        hand: &HandLandmarks,
        from_ms: u64,
        frames: u64,
        step_ms: u64,
    ) -> Vec<RpsTransition> {
        (0..frames)
            .map(|i| session.on_frame(Some(hand), from_ms + i * step_ms))
            .filter(|t| *t != RpsTransition::None)
            .collect()
    }

    #[test]
    fn seven_thumbs_up_frames_start_exactly_one_countdown() {
        let mut s = session(0.0);
        let thumbs = HandPose::thumbs_up().build();

        let transitions = feed(&mut s, &thumbs, 0, 6, 33);
        assert!(transitions.is_empty());
        assert_eq!(s.phase(), RpsPhase::Idle);

        let transitions = feed(&mut s, &thumbs, 200, 12, 33);
        assert_eq!(
            transitions,
            vec![RpsTransition::CountdownStarted {
                round: 1,
                deadline_ms: 3200
            }]
        );
        assert_eq!(s.phase(), RpsPhase::Countdown);
        assert_eq!(s.round(), 1);
    }

    #[test]
    fn thumbs_up_below_threshold_keeps_idle() {
        let mut s = session(0.0);
        let thumbs = HandPose::thumbs_up().build();
        let open = HandPose::open().build();
        // 6 of the last 12 frames.
        for i in 0..24 {
            let hand = if i % 2 == 0 { &thumbs } else { &open };
            assert_eq!(s.on_frame(Some(hand), i * 33), RpsTransition::None);
        }
        assert_eq!(s.snapshot(800).thumbs_up_votes, 6);
        assert_eq!(s.phase(), RpsPhase::Idle);
    }

    #[test]
    fn frame_past_the_deadline_reveals_the_round() {
        let mut s = session(0.9);
        let thumbs = HandPose::thumbs_up().build();
        let fist = HandPose::fist().build();

        feed(&mut s, &thumbs, 0, 7, 10);
        assert_eq!(s.pending_deadline(), Some((1, 3060)));

        feed(&mut s, &fist, 100, 29, 100);
        assert_eq!(s.phase(), RpsPhase::Countdown);

        let transition = s.on_frame(Some(&fist), 3060);
        let RpsTransition::Revealed(result) = transition else {
            panic!("expected reveal, got {transition:?}");
        };
        assert_eq!(result.player, Some(Gesture::Rock));
        assert_eq!(result.opponent, Gesture::Scissors);
        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(s.pending_deadline(), None);
    }

    #[test]
    fn timer_and_frame_paths_never_double_reveal() {
        let mut s = session(0.5);
        let thumbs = HandPose::thumbs_up().build();
        let fist = HandPose::fist().build();
        feed(&mut s, &thumbs, 0, 7, 10);

        // Enough rock frames to flush the thumbs-up votes.
        feed(&mut s, &fist, 100, 29, 100);
        assert!(matches!(
            s.on_countdown_elapsed(1, 3060),
            RpsTransition::Revealed(RoundResult {
                outcome: Outcome::Lose,
                ..
            })
        ));
        // The late frame and a duplicate timer are both no-ops.
        assert_eq!(s.on_frame(Some(&fist), 3100), RpsTransition::None);
        assert_eq!(s.on_countdown_elapsed(1, 3100), RpsTransition::None);
        assert_eq!(s.phase(), RpsPhase::Reveal);
    }

    #[test]
    fn stale_timer_from_a_previous_round_is_ignored() {
        let mut s = session(0.0);
        let thumbs = HandPose::thumbs_up().build();
        feed(&mut s, &thumbs, 0, 7, 10);
        s.stop();
        feed(&mut s, &thumbs, 1000, 7, 10);
        assert_eq!(s.round(), 2);

        assert_eq!(s.on_countdown_elapsed(1, 3060), RpsTransition::None);
        assert_eq!(s.phase(), RpsPhase::Countdown);
    }

    #[test]
    fn missing_gesture_resolves_undetermined() {
        let mut s = session(0.0);
        let thumbs = HandPose::thumbs_up().build();
        feed(&mut s, &thumbs, 0, 7, 10);

        // Hand disappears for the whole countdown; the empty frame past the
        // deadline still finishes the round.
        assert_eq!(s.on_frame(None, 1500), RpsTransition::None);
        let transition = s.on_frame(None, 3060);
        let RpsTransition::Revealed(result) = transition else {
            panic!("expected reveal, got {transition:?}");
        };
        assert_eq!(result.player, None);
        assert_eq!(result.outcome, Outcome::Undetermined);
    }

    #[test]
    fn snapshot_window_outvotes_older_history() {
        let mut s = session(0.0);
        let thumbs = HandPose::thumbs_up().build();
        let fist = HandPose::fist().build();
        let open = HandPose::open().build();
        feed(&mut s, &thumbs, 0, 7, 10);

        // 15 rock frames early, 5 paper frames in the last 900 ms.
        feed(&mut s, &fist, 100, 15, 100);
        feed(&mut s, &open, 2300, 5, 150);
        assert_eq!(s.decisive_gesture(3060), Some(Gesture::Paper));
    }

    #[test]
    fn history_is_the_fallback_when_the_window_is_empty() {
        let mut s = session(0.0);
        let thumbs = HandPose::thumbs_up().build();
        let open = HandPose::open().build();
        feed(&mut s, &thumbs, 0, 7, 10);

        feed(&mut s, &open, 100, 10, 100);
        // Nothing recognized since 1000 ms.
        assert_eq!(s.decisive_gesture(3060), Some(Gesture::Paper));
    }

    #[test]
    fn opponent_stays_hidden_until_reveal() {
        let mut s = session(0.9);
        let thumbs = HandPose::thumbs_up().build();
        feed(&mut s, &thumbs, 0, 7, 10);

        let snap = s.snapshot(1000);
        assert_eq!(snap.phase, RpsPhase::Countdown);
        assert_eq!(snap.result, None);
        assert_eq!(snap.seconds_left, Some(3));
        assert_eq!(s.snapshot(3059).seconds_left, Some(1));

        s.on_countdown_elapsed(1, 3060);
        let snap = s.snapshot(3060);
        assert_eq!(snap.result.map(|r| r.opponent), Some(Gesture::Scissors));
        assert_eq!(snap.seconds_left, None);
    }

    #[test]
    fn thumbs_up_on_the_result_screen_starts_the_next_round() {
        let mut s = session(0.0);
        let thumbs = HandPose::thumbs_up().build();
        let fist = HandPose::fist().build();
        feed(&mut s, &thumbs, 0, 7, 10);
        feed(&mut s, &fist, 100, 29, 100);
        s.on_countdown_elapsed(1, 3060);
        assert_eq!(s.phase(), RpsPhase::Reveal);

        let transitions = feed(&mut s, &thumbs, 4000, 7, 10);
        assert_eq!(
            transitions,
            vec![RpsTransition::CountdownStarted {
                round: 2,
                deadline_ms: 7060
            }]
        );
        assert_eq!(s.snapshot(4060).result, None);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut s = session(0.0);
        let thumbs = HandPose::thumbs_up().build();
        feed(&mut s, &thumbs, 0, 7, 10);
        assert!(s.pending_deadline().is_some());

        s.stop();
        s.stop();
        assert_eq!(s.phase(), RpsPhase::Idle);
        assert_eq!(s.pending_deadline(), None);
        let snap = s.snapshot(100);
        assert_eq!(snap.thumbs_up_votes, 0);
        assert_eq!(snap.result, None);
    }
}
