// UI module - egui panels drawn over the race

mod stats;

// Re-export the public interface
pub use stats::draw_stats_window;
