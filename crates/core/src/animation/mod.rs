use serde::{Deserialize, Serialize};

/// Duration of one animation step: the vehicle moves 30 path points per second
/// no matter how often frames are rendered.
pub const STEP_TIME: f32 = 1.0 / 30.0;

/// Where the vehicle is along its path and how much unspent time is pending.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub current_index: usize,
    pub accumulator: f32,
}

impl AnimationState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Fixed-timestep driver for [`AnimationState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationClock;

impl AnimationClock {
    /// Adds `delta` seconds to the accumulator and consumes it in whole
    /// [`STEP_TIME`] steps, moving one path point per step and wrapping at
    /// `loop_len`. A large delta may advance several points at once.
    ///
    /// An empty loop has nothing to animate and leaves the state untouched.
    /// Negative or non-finite deltas add no time.
    pub fn advance(state: AnimationState, delta: f32, loop_len: usize) -> AnimationState {
        if loop_len == 0 {
            return state;
        }

        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let step = f64::from(STEP_TIME);
        let pending = f64::from(state.accumulator) + f64::from(delta);
        let steps = (pending / step).floor();
        // Only `steps mod loop_len` matters for the index.
        let advanced = (steps % loop_len as f64) as usize;
        let remainder = (pending - steps * step).clamp(0.0, step) as f32;

        AnimationState {
            current_index: (state.current_index % loop_len + advanced) % loop_len,
            accumulator: remainder.min(STEP_TIME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn index_cycles_through_loop() {
        let mut state = AnimationState::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            state = AnimationClock::advance(state, STEP_TIME, 5);
            seen.push(state.current_index);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 0]);
    }

    #[test]
    fn small_deltas_accumulate() {
        let mut state = AnimationState::default();
        state = AnimationClock::advance(state, STEP_TIME * 0.4, 10);
        assert_eq!(state.current_index, 0);
        state = AnimationClock::advance(state, STEP_TIME * 0.4, 10);
        assert_eq!(state.current_index, 0);
        state = AnimationClock::advance(state, STEP_TIME * 0.4, 10);
        assert_eq!(state.current_index, 1);
        assert_abs_diff_eq!(state.accumulator, STEP_TIME * 0.2, epsilon = 1e-5);
    }

    #[test]
    fn large_delta_takes_several_steps() {
        let state = AnimationClock::advance(AnimationState::default(), 0.25, 100);
        assert_eq!(state.current_index, 7);
        assert!(state.accumulator >= 0.0 && state.accumulator < STEP_TIME);
    }

    #[test]
    fn huge_delta_returns_with_bounded_state() {
        for delta in [1.0e5, 3.0e6, f32::MAX] {
            let state = AnimationClock::advance(AnimationState::default(), delta, 10);
            assert!(state.current_index < 10);
            assert!(state.accumulator >= 0.0 && state.accumulator <= STEP_TIME);
        }
    }

    #[test]
    fn many_steps_at_once_wrap_like_single_steps() {
        let mut stepped = AnimationState::default();
        for _ in 0..23 {
            stepped = AnimationClock::advance(stepped, STEP_TIME, 7);
        }
        let state = AnimationState {
            current_index: 0,
            accumulator: STEP_TIME * 0.5,
        };
        let jumped = AnimationClock::advance(state, STEP_TIME * 23.0, 7);
        assert_eq!(stepped.current_index, 23 % 7);
        assert_eq!(jumped.current_index, 23 % 7);
        assert_abs_diff_eq!(jumped.accumulator, STEP_TIME * 0.5, epsilon = 1e-5);
    }

    #[test]
    fn empty_loop_is_a_no_op() {
        let state = AnimationState {
            current_index: 3,
            accumulator: 0.01,
        };
        assert_eq!(AnimationClock::advance(state, 1.0, 0), state);
    }

    #[test]
    fn negative_delta_adds_nothing() {
        let state = AnimationState {
            current_index: 2,
            accumulator: 0.01,
        };
        assert_eq!(AnimationClock::advance(state, -1.0, 4), state);
        assert_eq!(AnimationClock::advance(state, f32::NAN, 4), state);
    }

    #[test]
    fn stale_index_is_folded_into_shorter_loop() {
        let state = AnimationState {
            current_index: 12,
            accumulator: 0.0,
        };
        assert_eq!(AnimationClock::advance(state, 0.0, 5).current_index, 2);
    }
}
