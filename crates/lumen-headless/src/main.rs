use std::path::PathBuf;
use std::process;

use lumen_core::config::SceneConfig;
use lumen_core::types::Resolution;
use lumen_headless::report;
use lumen_headless::runner::HeadlessRunner;

fn usage() {
    eprintln!("Usage: lumen-headless [OPTIONS]");
    eprintln!("  --frames <n>                   Frames to run (default: 240)");
    eprintln!("  --width <px>                   Surface width (default: 640)");
    eprintln!("  --height <px>                  Surface height (default: 480)");
    eprintln!("  --scene <path>                 Scene RON file (default: built-in scene)");
    eprintln!("  --output <path>                Save results as JSON baseline");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {message}");
    process::exit(1);
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    args.get(i)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| fail(format!("invalid {flag} value")))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut frames = 240u32;
    let mut width = 640u32;
    let mut height = 480u32;
    let mut scene_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" => {
                i += 1;
                frames = parse_value(&args, i, "--frames");
            }
            "--width" => {
                i += 1;
                width = parse_value(&args, i, "--width");
            }
            "--height" => {
                i += 1;
                height = parse_value(&args, i, "--height");
            }
            "--scene" => {
                i += 1;
                scene_path = Some(parse_value(&args, i, "--scene"));
            }
            "--output" => {
                i += 1;
                output_path = Some(parse_value(&args, i, "--output"));
            }
            "--baseline" => {
                i += 1;
                baseline_path = Some(parse_value(&args, i, "--baseline"));
            }
            "--regression-threshold" => {
                i += 1;
                regression_threshold = parse_value(&args, i, "--regression-threshold");
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let (scene_name, config) = match &scene_path {
        Some(path) => {
            let ron = std::fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("cannot read {}: {e}", path.display())));
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scene".to_string());
            (name, SceneConfig::from_ron(&ron).unwrap_or_else(|e| fail(e)))
        }
        None => ("default".to_string(), SceneConfig::default()),
    };

    log::info!("Initializing GPU...");
    let runner = HeadlessRunner::new(Resolution::new(width, height), frames)
        .unwrap_or_else(|e| fail(e));
    let result = runner
        .run_scene(&scene_name, &config)
        .unwrap_or_else(|e| fail(e));
    let results = vec![result];

    println!("\n## Headless Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            label: format!("headless-{}", process::id()),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            fail(format!("failed to save baseline: {e}"));
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Headless run complete.");
}
