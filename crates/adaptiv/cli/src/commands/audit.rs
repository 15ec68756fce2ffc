//! Run readings through the pipeline and print the resulting audit trail

use std::io::Write;
use std::path::PathBuf;

use adaptiv_audit::AuditQuery;
use adaptiv_runtime::CapabilityPipeline;
use clap::Args;

use crate::output::{write_item, OutputFormat};

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// JSON-lines file of sensor readings (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Only show entries for this asset
    #[arg(short, long)]
    pub asset: Option<String>,

    /// Only show entries for this capability element path
    #[arg(long)]
    pub path: Option<String>,

    /// Maximum number of entries
    #[arg(short, long, default_value_t = 100)]
    pub limit: usize,
}

pub fn run<W: Write>(
    pipeline: &CapabilityPipeline,
    args: &AuditArgs,
    out: &mut W,
    format: OutputFormat,
) -> anyhow::Result<()> {
    for reading in super::read_readings(args.input.as_deref())? {
        pipeline.process(&reading);
    }

    let mut query = AuditQuery::builder().limit(args.limit);
    if let Some(asset) = &args.asset {
        query = query.asset_id(asset.as_str());
    }
    if let Some(path) = &args.path {
        query = query.path(path.as_str());
    }

    for entry in pipeline.audit().search(&query.build()) {
        write_item(out, &entry, format)?;
    }
    Ok(())
}
