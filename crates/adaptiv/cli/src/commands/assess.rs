//! Assess readings and optionally apply the resulting capability changes

use std::io::Write;
use std::path::PathBuf;

use adaptiv_runtime::CapabilityPipeline;
use clap::Args;

use crate::output::{write_item, OutputFormat};

#[derive(Args, Debug)]
pub struct AssessArgs {
    /// JSON-lines file of sensor readings (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Evaluate capability rules and apply the actions to the local mirror
    #[arg(long)]
    pub apply: bool,

    /// Print the health submodel writes instead of the assessment
    #[arg(long)]
    pub writes: bool,
}

pub fn run<W: Write>(
    pipeline: &CapabilityPipeline,
    args: &AssessArgs,
    out: &mut W,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let readings = super::read_readings(args.input.as_deref())?;
    tracing::info!(count = readings.len(), apply = args.apply, "Assessing readings");

    for reading in &readings {
        match (args.apply, args.writes) {
            (true, false) => write_item(out, &pipeline.process(reading), format)?,
            (true, true) => {
                let outcome = pipeline.process(reading);
                write_item(out, &outcome.assessment.health_writes(), format)?;
            }
            (false, true) => write_item(out, &pipeline.assess(reading).health_writes(), format)?,
            (false, false) => write_item(out, &pipeline.assess(reading), format)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_flag_emits_health_submodel() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"asset_id": "milling-01", "vib_rms": 1.6}}"#).unwrap();

        let args = AssessArgs {
            input: Some(file.path().to_path_buf()),
            apply: true,
            writes: true,
        };
        let pipeline = CapabilityPipeline::default();
        let mut out = Vec::new();
        run(&pipeline, &args, &mut out, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["submodel_id"], "urn:adaptivx:submodel:health:milling-01");
        assert_eq!(value["writes"][0]["path"], "HealthIndex");
        assert_eq!(value["writes"][0]["value"], "100");
        assert_eq!(pipeline.audit().len(), 4);
    }
}
