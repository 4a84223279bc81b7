use std::path::Path;

use crate::runner::{BenchmarkResult, TimingSeries};

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file doesn't exist.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// One phase of one scene that got slower than the baseline allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene: String,
    pub phase: &'static str,
    pub pct_change: f64,
}

fn phases(result: &BenchmarkResult) -> [(&'static str, &TimingSeries); 4] {
    [
        ("simulate", &result.simulate),
        ("mesh", &result.mesh),
        ("raycast", &result.raycast),
        ("frame", &result.frame),
    ]
}

/// Every phase whose mean grew by more than `threshold_pct` over the scene
/// of the same name in `baseline`. Scenes missing from the baseline and
/// phases with a zero baseline are skipped.
pub fn compare(current: &[BenchmarkResult], baseline: &Baseline, threshold_pct: f64) -> Vec<Regression> {
    let mut regressions = Vec::new();
    for result in current {
        let Some(base) = baseline.results.iter().find(|b| b.scene_name == result.scene_name) else {
            continue;
        };
        for ((phase, now), (_, then)) in phases(result).into_iter().zip(phases(base)) {
            if then.mean_ms <= 0.0 {
                continue;
            }
            let pct_change = (now.mean_ms - then.mean_ms) / then.mean_ms * 100.0;
            if pct_change > threshold_pct {
                regressions.push(Regression {
                    scene: result.scene_name.clone(),
                    phase,
                    pct_change,
                });
            }
        }
    }
    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Voxels | Chunks | Simulate (ms) | Mesh (ms) | Raycast (ms) | Frame (ms) | P95 (ms) | Max (ms) |\n");
    out.push_str("|-------|--------|--------|---------------|-----------|--------------|------------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.active_voxels,
            r.chunk_count,
            r.simulate.mean_ms,
            r.mesh.mean_ms,
            r.raycast.mean_ms,
            r.frame.mean_ms,
            r.frame.p95_ms,
            r.frame.max_ms,
        ));
    }

    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!("All scenes within {:.0}% threshold. No regressions detected.\n", threshold_pct);
    }

    let mut out = format!("REGRESSIONS DETECTED (>{:.0}% threshold):\n", threshold_pct);
    for r in regressions {
        out.push_str(&format!("  - {} [{}]: +{:.1}%\n", r.scene, r.phase, r.pct_change));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, mean_ms: f64) -> BenchmarkResult {
        let t = TimingSeries {
            mean_ms,
            ..Default::default()
        };
        BenchmarkResult {
            scene_name: name.to_string(),
            active_voxels: 10,
            chunk_count: 1,
            frame_count: 1,
            simulate: t.clone(),
            mesh: TimingSeries::default(),
            raycast: TimingSeries::default(),
            frame: t,
        }
    }

    #[test]
    fn test_compare_flags_slow_scene_only() {
        let baseline = Baseline {
            timestamp: "t".into(),
            results: vec![result("a", 10.0), result("b", 10.0)],
        };
        let regressions = compare(&[result("a", 12.0), result("b", 10.5), result("c", 99.0)], &baseline, 10.0);
        // `result` puts the same mean in the simulate and frame phases.
        let flagged: Vec<(&str, &str)> = regressions.iter().map(|r| (r.scene.as_str(), r.phase)).collect();
        assert_eq!(flagged, vec![("a", "simulate"), ("a", "frame")]);
        assert!((regressions[0].pct_change - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_json_round_trip() {
        let baseline = Baseline {
            timestamp: "bench-1".into(),
            results: vec![result("terrain", 3.25)],
        };
        let json = serde_json::to_string(&baseline).expect("serialize");
        let back: Baseline = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.results[0].scene_name, "terrain");
        assert_eq!(back.results[0].frame.mean_ms, 3.25);
    }

    #[test]
    fn test_comparison_lists_phase() {
        let text = format_comparison(
            &[Regression {
                scene: "column".into(),
                phase: "mesh",
                pct_change: 12.5,
            }],
            10.0,
        );
        assert!(text.contains("column [mesh]: +12.5%"), "{text}");
        assert!(format_comparison(&[], 10.0).starts_with("All scenes within 10%"));
    }

    #[test]
    fn test_markdown_has_row_per_scene() {
        let table = format_markdown(&[result("a", 1.0), result("b", 2.0)]);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("| b |"));
    }
}
