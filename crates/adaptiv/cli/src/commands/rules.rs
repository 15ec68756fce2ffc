//! Show capability rules

use std::io::Write;

use adaptiv_policy::PolicyEngine;
use clap::Args;

use crate::output::{write_item, OutputFormat};

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Show only the rule that applies at this health index
    #[arg(long)]
    pub health: Option<u8>,
}

pub fn run<W: Write>(
    engine: &PolicyEngine,
    args: &RulesArgs,
    out: &mut W,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match args.health {
        Some(health) => match engine.matching_rule(health) {
            Some(rule) => write_item(out, &rule, format),
            None => {
                tracing::warn!(health, "No rule matches");
                Ok(())
            }
        },
        None => write_item(out, &engine.get_rules(), format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_rule_output() {
        let mut buf = Vec::new();
        let args = RulesArgs { health: Some(85) };
        run(&PolicyEngine::new(), &args, &mut buf, OutputFormat::Json).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["condition"], "health < 90");
        assert_eq!(json["priority"], 5);
    }
}
