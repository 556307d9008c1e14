//! `logcentral policy` command handler

use std::io::Write;

use tracing::info;

use logcentral_core::config::LogCentralConfig;
use logcentral_core::types::ThresholdValue;
use logcentral_ism::{IsmPolicyBuilder, PolicyDocument};

use crate::cli::PolicyArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `policy` command.
pub async fn execute(
    args: PolicyArgs,
    config: &LogCentralConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let document = build_document(args, config)?;
    info!(states = document.states().len(), "policy generated");
    writer.render(&document)?;
    Ok(())
}

/// Apply flag overrides on top of the `[ism]` section and build the document.
fn build_document(
    args: PolicyArgs,
    config: &LogCentralConfig,
) -> Result<PolicyDocument, CliError> {
    let mut builder = IsmPolicyBuilder::from_config(&config.ism);

    if let Some(v) = args.warm_age {
        builder = builder.warm_age(threshold(&v));
    }
    if let Some(v) = args.cold_age {
        builder = builder.cold_age(threshold(&v));
    }
    if let Some(v) = args.retain_age {
        builder = builder.retain_age(threshold(&v));
    }
    if let Some(v) = args.rollover_age {
        builder = builder.rollover_age(threshold(&v));
    }
    if let Some(v) = args.rollover_size {
        builder = builder.rollover_size(threshold(&v));
    }
    if let Some(pattern) = args.index_pattern {
        builder = builder.index_pattern(pattern);
    }
    if let Some(priority) = args.priority {
        builder = builder.priority(priority);
    }
    if let Some(field) = args.timestamp_field {
        builder = builder.timestamp_field(field);
    }

    Ok(builder.build()?)
}

// Bare integers are days; anything else is kept verbatim for the ism parser.
fn threshold(raw: &str) -> ThresholdValue {
    match raw.parse() {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl Render for PolicyDocument {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Policy: {}", self.policy.description.bold())?;
        for state in self.states() {
            match state.transition() {
                Some(t) => {
                    let condition = t
                        .conditions
                        .min_index_age
                        .as_deref()
                        .map(|age| format!("min_index_age {}", age))
                        .or_else(|| {
                            t.conditions
                                .min_primary_shard_size
                                .as_deref()
                                .map(|size| format!("min_primary_shard_size {}", size))
                        })
                        .unwrap_or_default();
                    writeln!(
                        w,
                        "  {:<7} -> {:<7} {}",
                        state.name.green(),
                        t.state_name,
                        condition
                    )?;
                }
                None => writeln!(w, "  {:<7} {}", state.name.green(), "(final)".dimmed())?,
            }
        }
        for template in &self.policy.ism_template {
            writeln!(
                w,
                "Template: {} (priority {})",
                template.index_patterns.join(", "),
                template.priority
            )?;
        }

        writeln!(w)?;
        let json = self.to_json_pretty().map_err(std::io::Error::other)?;
        writeln!(w, "{}", json)?;
        Ok(())
    }
}
