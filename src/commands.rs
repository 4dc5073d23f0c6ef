use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use crate::cli::{Cli, ClassifyArgs, DataArgs, DensityArgs, ExtentArgs, FuseArgs};
use crate::classify::Selector;
use crate::config::FuseConfig;
use crate::density::{normalized_intensities, overlap_counts};
use crate::fetch::{CsvSource, DataLocation, GeoJsonSource};
use crate::render::{project_batch, RenderBatch};
use crate::store::DataStore;
use crate::transform::{Extents, TargetExtent};
use crate::types::FusedDatum;

pub fn fuse(cli: &Cli, args: &FuseArgs) -> Result<()> {
    let config = load_config(cli)?;
    let store = build_store(&config, &args.data, cli.verbose);
    let extents = build_extents(&config, &args.extent)?;

    let fused = store.fused()?;
    let batch = project_batch(&fused, &extents);

    if cli.verbose > 0 {
        let matched = fused.iter().filter(|d| d.record.is_some()).count();
        eprintln!("[fuse] joined {} features ({} matched)", fused.len(), matched);
        eprintln!(
            "[fuse] projected {} data, {} failures",
            batch.data.len(),
            batch.failures.len()
        );
    }

    write_output(args.output.as_deref(), &batch_to_json(&fused, &batch))
}

pub fn classify(cli: &Cli, args: &ClassifyArgs) -> Result<()> {
    let config = load_config(cli)?;
    let store = build_store(&config, &args.data, cli.verbose);

    let Some(column) = config.attributes.column(&args.attribute) else {
        bail!(
            "Unknown attribute: {} (known: {})",
            args.attribute,
            config
                .attributes
                .entries()
                .iter()
                .map(|def| def.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    };

    let fused = store.fused()?;
    let segmentation =
        crate::classify::classify(&fused, Selector::Column(column), &config.na_marker);
    let top = segmentation.top(args.top).to_vec();
    let class_indices = crate::classify::class_indices(&fused, column, &top);

    if cli.verbose > 0 {
        eprintln!(
            "[classify] attribute={} column={} values={}",
            args.attribute,
            column,
            segmentation.ranked().len()
        );
    }

    let output = json!({
        "attribute": args.attribute,
        "column": column,
        "ranked": segmentation.ranked().iter().map(|value| json!({
            "value": value,
            "segment": segmentation.segment_index(value),
            "count": segmentation.count(value),
        })).collect::<Vec<_>>(),
        "top": top,
        "class_indices": class_indices,
    });
    write_output(args.output.as_deref(), &output)
}

pub fn density(cli: &Cli, args: &DensityArgs) -> Result<()> {
    let config = load_config(cli)?;
    let store = build_store(&config, &args.data, cli.verbose);
    let extents = build_extents(&config, &args.extent)?;

    let fused = store.fused()?;
    let batch = project_batch(&fused, &extents);
    let centers = batch.centers();
    let counts = overlap_counts(&centers, args.radius);
    let intensities = normalized_intensities(&counts);

    if cli.verbose > 0 {
        eprintln!(
            "[density] {} centers, radius {}, max overlap {}",
            centers.len(),
            args.radius,
            counts.iter().max().copied().unwrap_or(0)
        );
    }

    let output = json!({
        "radius": args.radius,
        "centers": centers.iter().map(|c| json!([c.x, c.y])).collect::<Vec<_>>(),
        "counts": counts,
        "intensities": intensities,
    });
    write_output(args.output.as_deref(), &output)
}

fn load_config(cli: &Cli) -> Result<FuseConfig> {
    match &cli.config {
        Some(path) => {
            if cli.verbose > 0 {
                eprintln!("[config] {}", path.display());
            }
            Ok(FuseConfig::load(path)?)
        }
        None => Ok(FuseConfig::default()),
    }
}

fn build_store(config: &FuseConfig, data: &DataArgs, verbose: u8) -> DataStore {
    let csv = data.csv.as_deref().unwrap_or(&config.csv_url);
    let geojson = data.geojson.as_deref().unwrap_or(&config.geojson_url);
    if verbose > 0 {
        eprintln!("[fetch] csv={csv}");
        eprintln!("[fetch] geojson={geojson}");
    }
    DataStore::new(
        Box::new(CsvSource::new(DataLocation::parse(csv))),
        Box::new(GeoJsonSource::new(DataLocation::parse(geojson))),
        config.key_column,
    )
}

fn build_extents(config: &FuseConfig, extent: &ExtentArgs) -> Result<Extents> {
    let target = TargetExtent {
        x_min: extent.target[0],
        x_max: extent.target[1],
        y_min: extent.target[2],
        y_max: extent.target[3],
    };
    Ok(Extents::new(config.source_extent(), target)?)
}

fn batch_to_json(fused: &Arc<Vec<FusedDatum>>, batch: &RenderBatch) -> Value {
    json!({
        "data": batch.data.iter().map(|datum| {
            let source = &fused[datum.index];
            json!({
                "index": datum.index,
                "name": source.name,
                "record": source.record.as_deref(),
                "blob": datum.blob.iter().map(|c| json!([c.x, c.y])).collect::<Vec<_>>(),
                "center": [datum.center.x, datum.center.y],
            })
        }).collect::<Vec<_>>(),
        "failures": batch.failures.iter().map(|failure| json!({
            "index": failure.index,
            "error": failure.error.to_string(),
        })).collect::<Vec<_>>(),
    })
}

fn write_output(path: Option<&Path>, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("write {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}
