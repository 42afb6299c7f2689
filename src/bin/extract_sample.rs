use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde::Serialize;

use rusty_hive::visual::distinct_colors;
use rusty_hive::{
    build_records, BatchTableReader, Component, Dataset, ExtractOptions, MemoryGroup,
    VisualAttributes,
};

/// Build a small nested container resembling a beamline acquisition file:
/// two detector planes of the same shape, a calibration vector, and one
/// tabular run log.
fn sample_container() -> Result<MemoryGroup> {
    let root = MemoryGroup::root();

    let detectors = root.add_group("detectors");
    detectors.add_floats(
        "plane_a",
        vec![2, 3],
        vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
    );
    detectors.add_ints("plane_b", vec![2, 3], vec![10, 20, 30, 40, 50, 60]);

    let calib = root.add_group("calibration");
    calib.add_floats("gain", vec![4], vec![1.0, 1.01, 0.99, 1.02]);

    let schema = Arc::new(Schema::new(vec![
        Field::new("shot", DataType::Int64, false),
        Field::new("energy", DataType::Float64, false)
            .with_metadata(HashMap::from([("unit".to_string(), "keV".to_string())])),
        Field::new("operator", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(Float64Array::from(vec![12.4, 12.5, 12.4])),
            Arc::new(StringArray::from(vec!["Alice", "Alice", "Bob"])),
        ],
    )
    .context("building run-log batch")?;
    root.add_table("run_log", batch);

    Ok(root)
}

#[derive(Serialize)]
struct RecordSummary<'a> {
    label: &'a str,
    color: &'a str,
    components: Vec<ComponentSummary<'a>>,
}

#[derive(Serialize)]
struct ComponentSummary<'a> {
    label: &'a str,
    shape: &'a [usize],
    unit: Option<&'a str>,
}

fn summarize<'a>(record: &'a Dataset, style: &'a VisualAttributes) -> RecordSummary<'a> {
    RecordSummary {
        label: &record.label,
        color: style.color(),
        components: record
            .components()
            .map(|(label, component): (&str, &Component)| ComponentSummary {
                label,
                shape: &component.values.shape,
                unit: component.unit.as_deref(),
            })
            .collect(),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let root = sample_container()?;
    let options = ExtractOptions {
        auto_merge: true,
        ..Default::default()
    };
    let records = build_records(&root, "sample", &options, &BatchTableReader)
        .context("extracting sample container")?;

    // One style per record, colors spread over the hue circle.
    let mut styles = Vec::with_capacity(records.len());
    for (record, color) in records.iter().zip(distinct_colors(records.len())) {
        let mut style = VisualAttributes::new();
        style.set_field("color", color)?;
        style.set_field("label", record.label.as_str())?;
        styles.push(style);
    }

    let summaries: Vec<RecordSummary> = records
        .iter()
        .zip(&styles)
        .map(|(record, style)| summarize(record, style))
        .collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);

    Ok(())
}
