use lumen_core::types::Resolution;
use lumen_frame::{pointer_status, FrameStats};

const WINDOW: usize = 60;

/// Debug overlay: adapter, frame timing, pointer and pipeline shape.
pub struct DebugPanel {
    adapter_name: String,
    backend: String,
    frame_times: [f64; WINDOW],
    frame_index: usize,
    avg_frame_time_ms: f64,
    pointer: String,
    frame: u64,
    agent_count: u32,
    passes: u32,
    resolutions: String,
}

impl DebugPanel {
    pub fn new(adapter_name: String, backend: String, resolutions: &[Resolution]) -> Self {
        let resolutions = resolutions
            .iter()
            .map(|r| format!("{}x{}", r.width, r.height))
            .collect::<Vec<_>>()
            .join(" / ");
        Self {
            adapter_name,
            backend,
            frame_times: [0.0; WINDOW],
            frame_index: 0,
            avg_frame_time_ms: 0.0,
            pointer: pointer_status([0.5, 0.5]),
            frame: 0,
            agent_count: 0,
            passes: 0,
            resolutions,
        }
    }

    /// Record a frame's host delta and update the rolling average.
    pub fn update(&mut self, delta_ms: f64) {
        self.frame_times[self.frame_index] = delta_ms;
        self.frame_index = (self.frame_index + 1) % WINDOW;
        let sum: f64 = self.frame_times.iter().sum();
        self.avg_frame_time_ms = sum / WINDOW as f64;
    }

    pub fn set_frame_info(&mut self, stats: &FrameStats, pointer: [f32; 2]) {
        self.frame = stats.frame;
        self.agent_count = stats.agent_count;
        self.passes = stats.passes;
        self.pointer = pointer_status(pointer);
    }

    pub fn fps(&self) -> f64 {
        if self.avg_frame_time_ms > 0.0 {
            1000.0 / self.avg_frame_time_ms
        } else {
            0.0
        }
    }

    pub fn show(&self, ctx: &egui::Context) {
        egui::Window::new("Debug")
            .default_open(true)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(&self.adapter_name);
                ui.label(&self.backend);
                ui.separator();
                ui.label(format!("{:.2} ms", self.avg_frame_time_ms));
                ui.label(format!("{:.0} FPS", self.fps()));
                ui.separator();
                ui.label(format!("Pointer: {}", self.pointer));
                ui.label(format!("Agents: {} | Frame: {}", self.agent_count, self.frame));
                ui.separator();
                ui.label(format!("Cascade: {}", self.resolutions));
                ui.label(format!("Passes per frame: {}", self.passes));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_average() {
        let mut panel = DebugPanel::new("a".into(), "b".into(), &[]);
        for _ in 0..WINDOW {
            panel.update(20.0);
        }
        assert!((panel.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolution_summary() {
        let panel = DebugPanel::new(
            "a".into(),
            "b".into(),
            &[Resolution::new(64, 32), Resolution::new(32, 16)],
        );
        assert_eq!(panel.resolutions, "64x32 / 32x16");
        assert_eq!(panel.pointer, "x=0.50, y=0.50");
    }
}
