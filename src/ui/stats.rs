use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use racetrack::simulation::evolution::StatisticsReporter;

const BEST_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 100, 100);
const MEAN_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);

/// Floating window with the fitness history and key bindings.
pub fn draw_stats_window(stats: &StatisticsReporter, track_name: &str, map_index: usize) {
    egui_macroquad::ui(|egui_ctx| {
        egui::Window::new("Training")
            .default_pos(egui::pos2(10.0, 90.0))
            .default_width(280.0)
            .resizable(true)
            .show(egui_ctx, |ui| {
                ui.label(format!("Track {map_index}: {track_name}"));
                match stats.best_ever() {
                    Some(best) => ui.label(format!(
                        "Best fitness: {:.0} (generation {})",
                        best.best, best.generation
                    )),
                    None => ui.label("Best fitness: -"),
                };
                ui.label("N: next map    Esc: quit");
                ui.separator();
                draw_fitness_plot(ui, stats);
            });
    });

    egui_macroquad::draw();
}

fn draw_fitness_plot(ui: &mut egui::Ui, stats: &StatisticsReporter) {
    if stats.history().is_empty() {
        ui.label("Collecting data...");
        return;
    }

    let best: PlotPoints = stats
        .history()
        .iter()
        .map(|s| [f64::from(s.generation), s.best])
        .collect();
    let mean: PlotPoints = stats
        .history()
        .iter()
        .map(|s| [f64::from(s.generation), s.mean])
        .collect();

    Plot::new("fitness_plot")
        .height(150.0)
        .show_axes([true, true])
        .legend(Legend::default())
        .label_formatter(|name, value| {
            format!("{}: generation {:.0}, fitness {:.0}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(best).color(BEST_COLOR).name("best"));
            plot_ui.line(Line::new(mean).color(MEAN_COLOR).name("mean"));
        });
}
