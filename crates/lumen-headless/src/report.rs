use std::path::Path;

use crate::runner::RunResult;

/// A saved set of results to compare later runs against.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub label: String,
    pub results: Vec<RunResult>,
}

/// Load a baseline from a JSON file. Returns None if the file is missing or unreadable.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Scenes whose mean frame time grew by more than `threshold_pct`, with the change in percent.
pub fn compare(current: &[RunResult], baseline: &Baseline, threshold_pct: f64) -> Vec<(String, f64)> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };
        if base.timings.mean_ms <= 0.0 {
            continue;
        }
        let pct_change =
            (result.timings.mean_ms - base.timings.mean_ms) / base.timings.mean_ms * 100.0;
        if pct_change > threshold_pct {
            regressions.push((result.scene_name.clone(), pct_change));
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[RunResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Size | Agents | Levels | Frames | Blocked | Lit emission | Lit level 0 | Mean (ms) | P95 (ms) | Max (ms) |\n");
    out.push_str("|-------|------|--------|--------|--------|---------|--------------|-------------|-----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {}x{} | {} | {} | {} | {} | {} | {} | {:.2} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.width,
            r.height,
            r.agent_count,
            r.cascade_levels,
            r.frame_count,
            r.blocked_cells,
            r.lit_emission_texels,
            r.lit_level0_texels,
            r.timings.mean_ms,
            r.timings.p95_ms,
            r.timings.max_ms,
        ));
    }

    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[(String, f64)], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for (scene, pct) in regressions {
        out.push_str(&format!("  - {}: +{:.1}%\n", scene, pct));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::compute_timings;

    fn result(name: &str, frame_ms: f64) -> RunResult {
        RunResult {
            scene_name: name.to_string(),
            width: 64,
            height: 64,
            agent_count: 10,
            cascade_levels: 3,
            frame_count: 4,
            blocked_cells: 0,
            lit_emission_texels: 10,
            lit_level0_texels: 400,
            timings: compute_timings(&[frame_ms; 4]),
        }
    }

    #[test]
    fn test_compare_flags_slowdown_only() {
        let baseline = Baseline {
            label: "base".into(),
            results: vec![result("default", 2.0), result("empty", 1.0)],
        };
        let current = [result("default", 2.5), result("empty", 0.5), result("new", 9.0)];
        let regressions = compare(&current, &baseline, 10.0);
        assert_eq!(regressions.len(), 1);
        assert_eq!(regressions[0].0, "default");
        assert!((regressions[0].1 - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_json_round_trip() {
        let baseline = Baseline {
            label: "ci".into(),
            results: vec![result("default", 1.5)],
        };
        let json = serde_json::to_string(&baseline).unwrap();
        let parsed: Baseline = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.results[0].lit_level0_texels, 400);
        assert_eq!(parsed.label, "ci");
    }

    #[test]
    fn test_markdown_has_row_per_result() {
        let md = format_markdown(&[result("a", 1.0), result("b", 1.0)]);
        assert_eq!(md.lines().count(), 4);
        assert!(md.contains("| a | 64x64 |"));
    }

    #[test]
    fn test_comparison_text() {
        assert!(format_comparison(&[], 10.0).contains("No regressions"));
        let text = format_comparison(&[("default".into(), 12.5)], 10.0);
        assert!(text.contains("default: +12.5%"));
    }
}
