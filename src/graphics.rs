use macroquad::prelude::*;
use ndarray::{Array1, array};
use racetrack::simulation::controller::Controller;
use racetrack::simulation::params::Params;
use racetrack::simulation::race::Race;
use racetrack::simulation::track::TrackSet;

const CAR_COLOR: Color = Color::new(0.85, 0.15, 0.12, 1.0);
const SENSOR_COLOR: Color = Color::new(0.0, 200.0 / 255.0, 0.0, 1.0);

trait ToScreen {
    type Output;
    fn to_screen(&self, params: &Params) -> Self::Output;
}

impl ToScreen for Array1<f32> {
    type Output = Array1<f32>;
    fn to_screen(&self, params: &Params) -> Array1<f32> {
        let scale_x = screen_width() / params.track_width as f32;
        let scale_y = screen_height() / params.track_height as f32;
        array![self[0] * scale_x, self[1] * scale_y]
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, params: &Params) -> f32 {
        let scale_x = screen_width() / params.track_width as f32;
        let scale_y = screen_height() / params.track_height as f32;
        self * scale_x.min(scale_y)
    }
}

/// GPU copies of every track, uploaded once.
pub struct TrackTextures {
    textures: Vec<Texture2D>,
}

impl TrackTextures {
    pub fn new(tracks: &TrackSet) -> Self {
        let textures = tracks
            .tracks()
            .iter()
            .map(|track| {
                let texture = Texture2D::from_image(&track.to_image());
                texture.set_filter(FilterMode::Nearest);
                texture
            })
            .collect();
        Self { textures }
    }

    pub fn get(&self, index: usize) -> &Texture2D {
        &self.textures[index % self.textures.len()]
    }
}

pub fn draw_track(texture: &Texture2D) {
    draw_texture_ex(
        texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}

pub fn draw_cars<C: Controller>(race: &Race<'_, C>, params: &Params) {
    let width = params.car_width.to_screen(params);
    let height = params.car_height.to_screen(params);

    for car in race.cars().iter().filter(|car| car.is_alive()) {
        let center = car.center().to_screen(params);

        for sensor in car.sensors() {
            let end = sensor.end.to_screen(params);
            draw_line(center[0], center[1], end[0], end[1], 1.0, SENSOR_COLOR);
            draw_circle(end[0], end[1], 5.0, SENSOR_COLOR);
        }

        // headings turn counter-clockwise, macroquad rotates clockwise
        draw_rectangle_ex(
            center[0],
            center[1],
            width,
            height,
            DrawRectangleParams {
                offset: vec2(0.5, 0.5),
                rotation: (-car.heading).to_radians(),
                color: CAR_COLOR,
            },
        );
    }
}

pub fn draw_overlay(generation: u32, alive: usize) {
    draw_centered_text(&format!("Generation: {generation}"), 30.0, 30.0);
    draw_centered_text(&format!("Alive: {alive}"), 60.0, 20.0);
}

fn draw_centered_text(text: &str, y: f32, font_size: f32) {
    let text_size = measure_text(text, None, font_size as u16, 1.0);
    draw_text(
        text,
        screen_width() / 2. - text_size.width / 2.,
        y + text_size.height / 2.,
        font_size,
        BLACK,
    );
}
