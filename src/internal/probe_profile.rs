#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::pedantic)]

//! Fills elastic hash tables with random integer keys and plots lookup probe cost against
//! load. Set `RUST_LOG=elastic_hash=debug` to see the table's own logging.

use elastic_hash::{ElasticConfig, ElasticHashMap, InsertError};
use plotters::prelude::*;
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TABLE_SIZE: usize = 100_000;
// Load factors from 0.1 up to 1 - delta
const NUM_LOAD_FACTORS: usize = 10;
const DELTAS: [f64; 3] = [0.05, 0.1, 0.2];
// Give up on a load step after this many failed inserts
const MAX_FAILED_INSERTS: usize = TABLE_SIZE;

/// Measurements for one table at one target load
#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    avg_probes: f64,
    worst_probes: usize,
    failed_inserts: usize,
}

/// Inserts fresh random keys until `target` entries are stored, then measures lookups
fn fill_and_measure(
    map: &mut ElasticHashMap<u64, u64>,
    stored: &mut Vec<u64>,
    target: usize,
    rng: &mut impl Rng,
) -> Sample {
    let mut failed_inserts = 0;
    while stored.len() < target {
        let key: u64 = rng.random();
        match map.insert(key, key) {
            Ok(None) => stored.push(key),
            Ok(Some(_)) => {}
            Err(InsertError::FailedToInsert) => failed_inserts += 1,
            Err(InsertError::OutOfSpace) => break,
        }
        if failed_inserts >= MAX_FAILED_INSERTS {
            break;
        }
    }

    let costs: Vec<usize> = stored.iter().filter_map(|key| map.probe_cost(key)).collect();
    let avg_probes = if costs.is_empty() {
        0.0
    } else {
        costs.iter().sum::<usize>() as f64 / costs.len() as f64
    };
    let worst_probes = costs.iter().copied().max().unwrap_or(0);
    Sample { avg_probes, worst_probes, failed_inserts }
}

fn draw_chart(
    path: &str,
    caption: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series
        .iter()
        .flat_map(|(_, points)| points.iter())
        .fold(0.0_f64, |max, &(_, y)| max.max(y)) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..max_y.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220), RGBColor(50, 180, 50)];
    for (idx, (label, points)) in series.iter().enumerate() {
        let style = ShapeStyle::from(&colors[idx % colors.len()]).stroke_width(2);
        chart
            .draw_series(LineSeries::new(points.clone(), style))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, style.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;
    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut rng = rand::rng();
    let mut avg_series = Vec::new();
    let mut worst_series = Vec::new();
    let mut failure_series = Vec::new();

    for delta in DELTAS {
        let config = ElasticConfig::new(TABLE_SIZE, delta);
        let mut map = ElasticHashMap::with_config(config)?;
        let mut stored = Vec::with_capacity(map.max_len());
        info!(delta, levels = ?map.level_sizes(), "profiling table");

        let top = 1.0 - delta;
        let load_factors: Vec<f64> = (0..NUM_LOAD_FACTORS)
            .map(|i| 0.1 + (top - 0.1) * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
            .collect();

        let mut avg = Vec::new();
        let mut worst = Vec::new();
        let mut failures = Vec::new();
        for &load in &load_factors {
            let target = ((TABLE_SIZE as f64) * load) as usize;
            let target = target.min(map.max_len());
            let sample = fill_and_measure(&mut map, &mut stored, target, &mut rng);
            info!(
                delta,
                load,
                stored = map.len(),
                avg_probes = sample.avg_probes,
                worst_probes = sample.worst_probes,
                failed_inserts = sample.failed_inserts,
                "measured"
            );
            let actual_load = map.load_factor();
            avg.push((actual_load, sample.avg_probes));
            worst.push((actual_load, sample.worst_probes as f64));
            failures.push((actual_load, sample.failed_inserts as f64));
        }

        let label = format!("delta = {delta}");
        avg_series.push((label.clone(), avg));
        worst_series.push((label.clone(), worst));
        failure_series.push((label, failures));
    }

    draw_chart("average_lookup_probes.png", "Average Lookup Probes", "Probes", &avg_series)?;
    draw_chart(
        "worst_case_lookup_probes.png",
        "Worst-Case Lookup Probes",
        "Probes",
        &worst_series,
    )?;
    draw_chart(
        "failed_inserts.png",
        "Failed Inserts Per Load Step",
        "Failed inserts",
        &failure_series,
    )?;

    info!("wrote average_lookup_probes.png, worst_case_lookup_probes.png, failed_inserts.png");
    Ok(())
}
