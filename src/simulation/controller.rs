//! The interface between a car and whatever drives it.
//!
//! A controller sees the car's sensor distances and answers with one score per
//! [`Action`]. The highest score wins.

use super::car::SENSOR_COUNT;

/// Sensor distances handed to a controller, in sensor cast order.
pub type Observations = [i32; SENSOR_COUNT];

/// Something that chooses a car's next action.
///
/// Implemented by [`super::brain::Brain`] and by any
/// `Fn(&Observations) -> Vec<f32>`, which keeps scripted drivers in tests
/// short.
pub trait Controller {
    /// Scores every action for the given observations.
    fn act(&self, observations: &Observations) -> Vec<f32>;
}

impl<F> Controller for F
where
    F: Fn(&Observations) -> Vec<f32>,
{
    fn act(&self, observations: &Observations) -> Vec<f32> {
        self(observations)
    }
}

/// Discrete car controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Heading increases by the turn step.
    TurnLeft,
    /// Heading decreases by the turn step.
    TurnRight,
    /// Speed drops by the speed step, if the car is fast enough to brake.
    SlowDown,
    /// Speed rises by the speed step.
    SpeedUp,
}

impl Action {
    /// Number of controller outputs.
    pub const COUNT: usize = 4;

    /// Maps an output index to its action. Unknown indices accelerate.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Action::TurnLeft,
            1 => Action::TurnRight,
            2 => Action::SlowDown,
            _ => Action::SpeedUp,
        }
    }

    /// Picks the action with the highest score.
    ///
    /// Ties go to the lowest index. NaN scores never win; if nothing
    /// comparable is left the car accelerates.
    pub fn select(outputs: &[f32]) -> Self {
        let mut best: Option<(usize, f32)> = None;
        for (i, &value) in outputs.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((i, value)),
            }
        }
        best.map_or(Action::SpeedUp, |(i, _)| Action::from_index(i))
    }
}
