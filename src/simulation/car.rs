//! Car state, kinematics, collision and sensors.
//!
//! A car is pure numeric state. Drawing it is left to the presentation layer,
//! which reads position, heading and sensors after each tick.

use log::trace;
use ndarray::{Array1, array};

use super::controller::{Action, Observations};
use super::error::TrackError;
use super::geometric_utils::{containing_pixel, heading_vector, nearest_pixel, polar_offset};
use super::params::Params;
use super::track::TrackMap;

/// Number of distance sensors per car.
pub const SENSOR_COUNT: usize = 7;

/// Sensor directions relative to the heading, in cast order (degrees).
pub const SENSOR_OFFSETS: [f32; SENSOR_COUNT] = [-90.0, -60.0, -30.0, 0.0, 30.0, 60.0, 90.0];

/// Angles (radians, relative to the heading) of the four bounding-box corners.
///
/// Fixed literals, not derived from the sprite size.
pub const CORNER_OFFSETS: [f32; 4] = [0.588, 2.159, -2.159, -0.588];

/// One sensor ray result.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Where the ray stopped.
    pub end: Array1<f32>,
    /// Length walked from the car centre, `0..=sensor_range`.
    pub distance: f32,
}

/// A simulated car.
#[derive(Debug, Clone)]
pub struct Car {
    /// Top-left corner of the sprite bounding box.
    pub pos: Array1<f32>,
    /// Heading in degrees. Not normalised.
    pub heading: f32,
    /// Units travelled per tick.
    pub speed: f32,
    /// Sum of the speeds of every tick so far.
    pub distance: f32,
    center: Array1<f32>,
    corners: [Array1<f32>; 4],
    sensors: Vec<SensorReading>,
    alive: bool,
}

impl Car {
    /// Creates a car at the start pose, standing still.
    pub fn new(params: &Params) -> Self {
        let mut car = Self {
            pos: array![params.start_pos[0], params.start_pos[1]],
            heading: params.start_heading,
            speed: 0.0,
            distance: 0.0,
            center: Array1::zeros(2),
            corners: std::array::from_fn(|_| Array1::zeros(2)),
            sensors: Vec::with_capacity(SENSOR_COUNT),
            alive: true,
        };
        car.update_geometry(params);
        car
    }

    /// Whether the car is still on the road.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Centre of the bounding box.
    pub fn center(&self) -> &Array1<f32> {
        &self.center
    }

    /// Bounding-box corners as of the last geometry update.
    pub fn corners(&self) -> &[Array1<f32>; 4] {
        &self.corners
    }

    /// Sensor readings of the last tick, in [`SENSOR_OFFSETS`] order.
    pub fn sensors(&self) -> &[SensorReading] {
        &self.sensors
    }

    /// A stopped car creeps forward at cruising speed.
    pub fn self_start(&mut self, params: &Params) {
        if self.alive && self.speed == 0.0 {
            self.speed = params.cruising_speed;
        }
    }

    /// Applies a controller decision to heading or speed.
    pub fn apply(&mut self, action: Action, params: &Params) {
        if !self.alive {
            return;
        }
        match action {
            Action::TurnLeft => self.heading += params.turn_step,
            Action::TurnRight => self.heading -= params.turn_step,
            Action::SlowDown if self.speed >= params.min_brake_speed => {
                self.speed -= params.speed_step;
            }
            Action::SlowDown | Action::SpeedUp => self.speed += params.speed_step,
        }
    }

    /// Moves the car one tick, then checks for collision and re-casts sensors.
    ///
    /// Dead cars are left untouched.
    ///
    /// # Errors
    ///
    /// Propagates [`TrackError::OutOfBounds`] when a corner lies off the
    /// raster or a sensor ray walks off it while still on road.
    pub fn advance(&mut self, track: &dyn TrackMap, params: &Params) -> Result<(), TrackError> {
        if !self.alive {
            return Ok(());
        }
        self.self_start(params);

        let direction = heading_vector(self.heading);
        self.pos += &(direction * self.speed);
        self.distance += self.speed;
        self.update_geometry(params);

        self.sensors.clear();
        if self.collides(track, params)? {
            trace!("car crashed at ({:.1}, {:.1})", self.pos[0], self.pos[1]);
            self.alive = false;
            return Ok(());
        }

        for offset in SENSOR_OFFSETS {
            let reading = self.cast_sensor(offset, track, params)?;
            self.sensors.push(reading);
        }
        Ok(())
    }

    /// Sensor distances, truncated, in cast order. Missing readings are 0.
    pub fn observations(&self) -> Observations {
        let mut values = [0; SENSOR_COUNT];
        for (value, sensor) in values.iter_mut().zip(&self.sensors) {
            *value = sensor.distance as i32;
        }
        values
    }

    /// Fitness earned for the current tick.
    pub fn reward(&self) -> f32 {
        self.distance + self.speed
    }

    /// Puts a living car back on the start pose. Distance is kept; dead cars
    /// stay where they crashed.
    pub fn reset_pose(&mut self, params: &Params) {
        if !self.alive {
            return;
        }
        self.pos = array![params.start_pos[0], params.start_pos[1]];
        self.heading = params.start_heading;
        self.speed = 0.0;
        self.update_geometry(params);
    }

    fn update_geometry(&mut self, params: &Params) {
        self.center = array![
            self.pos[0] + params.car_width / 2.0,
            self.pos[1] + params.car_height / 2.0
        ];

        let half_diagonal = 0.5 * params.car_width.hypot(params.car_height);
        let heading = (-self.heading).to_radians();
        for (corner, offset) in self.corners.iter_mut().zip(CORNER_OFFSETS) {
            *corner = polar_offset(&self.center, heading + offset, half_diagonal);
        }
    }

    /// A corner on anything but road is a crash. A corner off the raster is
    /// a broken track and fails with [`TrackError::OutOfBounds`].
    fn collides(&self, track: &dyn TrackMap, params: &Params) -> Result<bool, TrackError> {
        for corner in &self.corners {
            let (x, y) = nearest_pixel(corner);
            if track.color_at(x, y)? != params.road_color {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn cast_sensor(
        &self,
        offset: f32,
        track: &dyn TrackMap,
        params: &Params,
    ) -> Result<SensorReading, TrackError> {
        let direction = heading_vector(self.heading - offset);
        let mut length = 0;
        while length < params.sensor_range {
            let sample = &self.center + &(&direction * length as f32);
            let (x, y) = containing_pixel(&sample);
            if track.color_at(x, y)? != params.road_color {
                break;
            }
            length += 1;
        }

        Ok(SensorReading {
            end: &self.center + &(&direction * length as f32),
            distance: length as f32,
        })
    }
}
