//! Fuse an anomaly score and physics residual without running the detector

use std::io::Write;

use adaptiv_monitor::{Explanation, HealthFusion, HealthResult};
use clap::Args;
use serde::Serialize;

use crate::output::{write_item, OutputFormat};

#[derive(Args, Debug)]
pub struct FuseArgs {
    /// Anomaly score in [0, 1]
    #[arg(long)]
    pub anomaly: f64,

    /// Physics residual in [0, 1]
    #[arg(long)]
    pub residual: f64,
}

#[derive(Serialize)]
struct FuseOutput {
    #[serde(flatten)]
    health: HealthResult,
    #[serde(flatten)]
    explanation: Explanation,
}

pub fn run<W: Write>(
    fusion: &HealthFusion,
    args: &FuseArgs,
    out: &mut W,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let health = fusion.compute(args.anomaly, args.residual);
    let explanation = Explanation::new(fusion, args.anomaly, args.residual, &health);
    write_item(out, &FuseOutput { health, explanation }, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuse_output() {
        let mut buf = Vec::new();
        let args = FuseArgs {
            anomaly: 0.8,
            residual: 0.0,
        };
        run(&HealthFusion::default(), &args, &mut buf, OutputFormat::Json).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["health_index"], 52);
        assert_eq!(json["detected_pattern"], "major_anomaly");
    }
}
