#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use racetrack::simulation::car::{CORNER_OFFSETS, Car, SENSOR_COUNT, SENSOR_OFFSETS};
use racetrack::simulation::controller::Action;
use racetrack::simulation::error::TrackError;
use racetrack::simulation::params::Params;
use racetrack::simulation::track::{RasterTrack, Rgba};

fn create_test_params() -> Params {
    Params::default()
}

/// Road everywhere, large enough for every sensor ray from the start pose.
fn open_road() -> RasterTrack {
    RasterTrack::filled("open", 1000, 1000, Rgba::ROAD)
}

#[test]
fn test_new_car_starts_at_rest() {
    let params = create_test_params();
    let car = Car::new(&params);

    assert_eq!(car.pos.to_vec(), vec![315.0, 455.0]);
    assert_eq!(car.heading, 0.0);
    assert_eq!(car.speed, 0.0);
    assert_eq!(car.distance, 0.0);
    assert!(car.is_alive());
    assert!(car.sensors().is_empty());
    assert_eq!(car.observations(), [0; SENSOR_COUNT]);
    assert_eq!(car.center().to_vec(), vec![330.0, 465.0]);
}

#[test]
fn test_self_start_sets_cruising_speed() {
    let params = create_test_params();
    let mut car = Car::new(&params);

    car.self_start(&params);
    assert_eq!(car.speed, 10.0);

    // a moving car keeps its speed
    car.speed = 4.0;
    car.self_start(&params);
    assert_eq!(car.speed, 4.0);
}

#[test]
fn test_first_tick_on_open_road() {
    let params = create_test_params();
    let track = open_road();
    let mut car = Car::new(&params);

    car.advance(&track, &params).unwrap();

    assert_eq!(car.speed, 10.0);
    assert_eq!(car.pos.to_vec(), vec![325.0, 455.0]);
    assert_eq!(car.distance, 10.0);
    assert!(car.is_alive());
    assert_eq!(car.sensors().len(), SENSOR_COUNT);
    assert_eq!(car.observations(), [150; SENSOR_COUNT]);
}

#[test]
fn test_sensors_follow_offset_order() {
    let params = create_test_params();
    let mut track = open_road();
    // obstacle above the car: rows 0..400
    track.fill_rect(0, 0, 1000, 400, Rgba::GRASS);

    let mut car = Car::new(&params);
    car.advance(&track, &params).unwrap();
    assert!(car.is_alive());

    let observations = car.observations();
    assert_eq!(SENSOR_OFFSETS, [-90.0, -60.0, -30.0, 0.0, 30.0, 60.0, 90.0]);

    // -90 looks straight up from the centre at y = 465
    assert_eq!(observations[0], 66);
    assert_eq!(observations[1], 76);
    assert!(observations[2] > observations[1]);
    // straight ahead and everything pointing down stays on road
    assert_eq!(&observations[3..], &[150, 150, 150, 150]);

    for sensor in car.sensors() {
        assert!(sensor.distance >= 0.0 && sensor.distance <= 150.0);
        assert_eq!(sensor.distance.fract(), 0.0);
    }
}

#[test]
fn test_sensor_endpoint_lies_at_reported_distance() {
    let params = create_test_params();
    let mut track = open_road();
    track.fill_rect(0, 0, 1000, 400, Rgba::GRASS);

    let mut car = Car::new(&params);
    car.advance(&track, &params).unwrap();

    for sensor in car.sensors() {
        let dx = sensor.end[0] - car.center()[0];
        let dy = sensor.end[1] - car.center()[1];
        assert!((dx.hypot(dy) - sensor.distance).abs() < 1e-3);
    }
}

#[test]
fn test_corners_surround_center() {
    let params = create_test_params();
    let mut car = Car::new(&params);
    car.heading = 37.0;
    car.advance(&open_road(), &params).unwrap();

    let half_diagonal = 0.5 * 30.0f32.hypot(20.0);
    let heading = (-car.heading).to_radians();
    for (corner, offset) in car.corners().iter().zip(CORNER_OFFSETS) {
        let dx = corner[0] - car.center()[0];
        let dy = corner[1] - car.center()[1];
        assert!((dx.hypot(dy) - half_diagonal).abs() < 1e-3);
        assert!((dx - (heading + offset).cos() * half_diagonal).abs() < 1e-3);
        assert!((dy - (heading + offset).sin() * half_diagonal).abs() < 1e-3);
    }
}

#[test]
fn test_corner_constants_are_literal() {
    assert_eq!(CORNER_OFFSETS, [0.588, 2.159, -2.159, -0.588]);
    // the first offset matches the sprite aspect ratio
    assert!((20.0f32.atan2(30.0) - CORNER_OFFSETS[0]).abs() < 1e-3);
}

#[test]
fn test_corner_on_obstacle_kills_car() {
    let params = create_test_params();
    let mut track = open_road();
    // the front corners land near x = 355 after the first move
    track.fill_rect(350, 0, 650, 1000, Rgba::GRASS);

    let mut car = Car::new(&params);
    car.advance(&track, &params).unwrap();

    assert!(!car.is_alive());
    assert!(car.sensors().is_empty());
    assert_eq!(car.observations(), [0; SENSOR_COUNT]);
}

#[test]
fn test_dead_car_is_frozen() {
    let params = create_test_params();
    let track = RasterTrack::filled("grass", 960, 540, Rgba::GRASS);
    let mut car = Car::new(&params);

    car.advance(&track, &params).unwrap();
    assert!(!car.is_alive());

    let (pos, heading, speed, distance) = (car.pos.clone(), car.heading, car.speed, car.distance);
    car.self_start(&params);
    car.apply(Action::TurnLeft, &params);
    car.apply(Action::SpeedUp, &params);
    car.advance(&open_road(), &params).unwrap();

    assert!(!car.is_alive());
    assert_eq!(car.pos, pos);
    assert_eq!(car.heading, heading);
    assert_eq!(car.speed, speed);
    assert_eq!(car.distance, distance);
}

#[test]
fn test_corner_off_the_raster_is_an_error() {
    let params = create_test_params();
    let track = RasterTrack::filled("tiny", 40, 40, Rgba::ROAD);
    let mut car = Car::new(&params);

    let result = car.advance(&track, &params);

    assert!(matches!(result, Err(TrackError::OutOfBounds { .. })));
}

#[test]
fn test_sensor_leaving_the_raster_is_an_error() {
    let params = create_test_params();
    // road reaches the right edge at x = 400
    let track = RasterTrack::filled("short", 400, 500, Rgba::ROAD);
    let mut car = Car::new(&params);

    let result = car.advance(&track, &params);

    assert!(matches!(result, Err(TrackError::OutOfBounds { .. })));
}

#[test]
fn test_actions_change_heading_and_speed() {
    let params = create_test_params();
    let mut car = Car::new(&params);
    car.speed = 10.0;

    car.apply(Action::TurnLeft, &params);
    assert_eq!(car.heading, 10.0);
    car.apply(Action::TurnRight, &params);
    car.apply(Action::TurnRight, &params);
    assert_eq!(car.heading, -10.0);

    car.apply(Action::SlowDown, &params);
    assert_eq!(car.speed, 8.0);
    car.apply(Action::SlowDown, &params);
    assert_eq!(car.speed, 6.0);
    // below the braking floor a brake request accelerates instead
    car.apply(Action::SlowDown, &params);
    assert_eq!(car.speed, 8.0);

    car.apply(Action::SpeedUp, &params);
    assert_eq!(car.speed, 10.0);
}

#[test]
fn test_heading_is_not_normalised() {
    let params = create_test_params();
    let mut car = Car::new(&params);
    for _ in 0..40 {
        car.apply(Action::TurnLeft, &params);
    }
    assert_eq!(car.heading, 400.0);
}

#[test]
fn test_turned_car_moves_up_the_screen() {
    let params = create_test_params();
    let mut car = Car::new(&params);
    car.heading = 90.0;

    car.advance(&open_road(), &params).unwrap();

    assert!((car.pos[0] - 315.0).abs() < 1e-3);
    assert!((car.pos[1] - 445.0).abs() < 1e-3);
}

#[test]
fn test_reward_is_distance_plus_speed() {
    let params = create_test_params();
    let track = open_road();
    let mut car = Car::new(&params);

    car.advance(&track, &params).unwrap();
    car.apply(Action::SpeedUp, &params);
    car.advance(&track, &params).unwrap();

    assert_eq!(car.distance, 22.0);
    assert_eq!(car.speed, 12.0);
    assert_eq!(car.reward(), 34.0);
}

#[test]
fn test_reset_pose_keeps_distance() {
    let params = create_test_params();
    let mut car = Car::new(&params);
    car.advance(&open_road(), &params).unwrap();
    car.heading = 30.0;

    car.reset_pose(&params);

    assert_eq!(car.pos.to_vec(), vec![315.0, 455.0]);
    assert_eq!(car.heading, 0.0);
    assert_eq!(car.speed, 0.0);
    assert_eq!(car.distance, 10.0);
    assert!(car.is_alive());
}

#[test]
fn test_reset_pose_leaves_dead_car_in_place() {
    let params = create_test_params();
    let grass = RasterTrack::filled("grass", 960, 540, Rgba::GRASS);
    let mut car = Car::new(&params);
    car.advance(&grass, &params).unwrap();
    assert!(!car.is_alive());

    car.reset_pose(&params);

    assert_eq!(car.pos.to_vec(), vec![325.0, 455.0]);
    assert_eq!(car.speed, 10.0);
    assert_eq!(car.distance, 10.0);
    assert!(!car.is_alive());
}
