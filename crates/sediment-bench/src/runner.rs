use std::time::Instant;

use sediment::Volume;

use crate::scenes::{self, SceneConfig, SceneKind};

/// Timing data for one phase across a run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub active_voxels: usize,
    pub chunk_count: usize,
    pub frame_count: u32,
    pub simulate: TimingSeries,
    pub mesh: TimingSeries,
    pub raycast: TimingSeries,
    /// Sum of the three phases per frame.
    pub frame: TimingSeries,
}

/// Runs the standard scenes on the CPU kernels.
pub struct BenchmarkRunner {
    frame_count: u32,
}

impl BenchmarkRunner {
    pub fn new(frame_count: u32) -> Self {
        let backend = sediment::backend::probe();
        match backend.adapter_name {
            Some(name) => log::info!("GPU adapter for instance upload: {name}"),
            None => log::info!("No GPU adapter; instance upload is not measured"),
        }
        Self { frame_count }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, sediment::SedimentError> {
        log::info!("Running scene '{}'...", config.name);

        let mut volume = Volume::new(&config.volume)?;
        scenes::populate(&mut volume, config.kind);
        log::info!(
            "  Populated {} voxels across {} chunks",
            volume.grid().occupied(),
            volume.grid().chunk_count()
        );

        let ray = config.camera_ray();
        let n = self.frame_count as usize;
        let mut simulate = Vec::with_capacity(n);
        let mut mesh = Vec::with_capacity(n);
        let mut raycast = Vec::with_capacity(n);
        let mut frame = Vec::with_capacity(n);

        for i in 0..self.frame_count {
            if config.kind == SceneKind::Rain {
                for stroke in scenes::rain_strokes(&volume, i) {
                    volume.brush(&stroke);
                }
            }

            let start = Instant::now();
            volume.simulate();
            let sim_ms = elapsed_ms(start);

            let start = Instant::now();
            let stats = volume.remesh();
            let mesh_ms = elapsed_ms(start);
            if stats.overflowed {
                log::warn!("  Frame {i}: instance list overflow");
            }

            let start = Instant::now();
            let _hit = volume.pick(ray);
            let ray_ms = elapsed_ms(start);

            simulate.push(sim_ms);
            mesh.push(mesh_ms);
            raycast.push(ray_ms);
            frame.push(sim_ms + mesh_ms + ray_ms);
        }

        let frame = compute_timings(&frame);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            frame.mean_ms,
            frame.p95_ms,
            frame.p99_ms
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            active_voxels: volume.grid().occupied(),
            chunk_count: volume.grid().chunk_count(),
            frame_count: self.frame_count,
            simulate: compute_timings(&simulate),
            mesh: compute_timings(&mesh),
            raycast: compute_timings(&raycast),
            frame,
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries::default();
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
