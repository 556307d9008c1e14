//! `logcentral merge` command handler

use std::io::Write;

use tracing::info;

use logcentral_coalescer::{Coalescer, Format, MergeReport};
use logcentral_core::config::LogCentralConfig;

use crate::cli::MergeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `merge` command.
///
/// The merge itself is blocking file I/O and runs on the blocking pool.
pub async fn execute(
    args: MergeArgs,
    config: &LogCentralConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let format: Format = args.format.parse()?;
    let coalescer = Coalescer::new(config.coalescer.clone());

    info!(
        input = %args.input.display(),
        output = %args.output_dir.display(),
        format = %format,
        max_size = args.max_size.unwrap_or_else(|| coalescer.max_size_for(format)),
        "starting merge"
    );

    let MergeArgs {
        input,
        output_dir,
        max_size,
        ..
    } = args;
    let report = tokio::task::spawn_blocking(move || {
        coalescer.merge_dirs(&input, &output_dir, format, max_size)
    })
    .await
    .map_err(|e| CliError::Command(format!("merge task failed: {}", e)))??;

    writer.render(&report)?;
    Ok(())
}

impl Render for MergeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Merge ({}): {} inputs, {} items, {} bytes",
            self.format.to_string().bold(),
            self.inputs,
            self.items,
            self.payload_bytes
        )?;

        if self.outputs.is_empty() {
            writeln!(w, "  {}", "no outputs (input was empty)".yellow())?;
            return Ok(());
        }

        writeln!(w, "  {:<48} {:>8} {:>14}", "Output", "Items", "Bytes")?;
        writeln!(w, "  {}", "-".repeat(72))?;
        for out in &self.outputs {
            writeln!(
                w,
                "  {:<48} {:>8} {:>14}",
                out.name.green(),
                out.items,
                out.payload_bytes
            )?;
        }
        Ok(())
    }
}
