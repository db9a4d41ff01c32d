use anyhow::Context;
use clap::Parser;
use rotor_section_builder::aeromodel::{AeroModel, fit_polar};
use rotor_section_builder::config::{ModelOverrides, load_sections};
use rotor_section_builder::export::model_json::{ModelSummary, write_summaries};
use rotor_section_builder::export::section_block::{write_block, writer_for_path};
use rotor_section_builder::importer::load_polar;
use std::io::Write;
use std::path::PathBuf;

/// Fit every polar listed in a section manifest and emit the solver-ready
/// aero section blocks.
#[derive(Parser, Debug)]
#[command(author, version, about = "XROTOR aero section block generator")]
struct Cli {
    /// Section manifest: YAML list or TOML [[section]] tables
    #[arg(long)]
    sections: PathBuf,

    /// Output file for the section blocks (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// Optional JSON sidecar with the fitted scalars per section
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let sections = load_sections(&cli.sections)
        .with_context(|| format!("loading section manifest {}", cli.sections.display()))?;
    if sections.is_empty() {
        anyhow::bail!("manifest {} lists no sections", cli.sections.display());
    }

    let mut writer = writer_for_path(&cli.output)?;
    let mut summaries = Vec::new();

    for (index, section) in sections.iter().enumerate() {
        let number = index + 1;
        let (table, reynolds) = load_polar(&section.polar)
            .with_context(|| format!("reading polar {}", section.polar.display()))?;
        let mut model = fit_polar(&table, reynolds)
            .with_context(|| format!("fitting polar {}", section.polar.display()))?;
        if let Some(overrides) = &section.overrides {
            apply_overrides(&mut model, overrides);
        }
        write_block(&mut writer, number, section.r_over_r, &model)?;
        if cli.json.is_some() {
            summaries.push(ModelSummary::new(
                number,
                section.r_over_r,
                &section.polar.to_string_lossy(),
                &model,
            ));
        }
        log::info!(
            "section {}: {} ({} samples)",
            number,
            section.polar.display(),
            table.len()
        );
    }
    writer.flush()?;

    if let Some(json_path) = &cli.json {
        write_summaries(json_path, &summaries)
            .with_context(|| format!("writing model summaries {}", json_path.display()))?;
    }
    Ok(())
}

/// Replace fitted scalars with the manifest's hand-tuned values.
fn apply_overrides(model: &mut AeroModel, overrides: &ModelOverrides) {
    if let Some(v) = overrides.zero_lift_alpha {
        model.zero_lift_alpha = v;
    }
    if let Some(v) = overrides.dcl_dalpha {
        model.dcl_dalpha = v;
    }
    if let Some(v) = overrides.dcl_dalpha_stall {
        model.dcl_dalpha_stall = v;
    }
    if let Some(v) = overrides.max_cl {
        model.max_cl = v;
    }
    if let Some(v) = overrides.min_cl {
        model.min_cl = v;
    }
    if let Some(v) = overrides.cl_increment_to_stall {
        model.cl_increment_to_stall = v;
    }
    if let Some(v) = overrides.min_cd {
        model.min_cd = v;
    }
    if let Some(v) = overrides.cl_at_min_cd {
        model.cl_at_min_cd = v;
    }
    if let Some(v) = overrides.dcd_ddcl {
        model.dcd_ddcl = v;
    }
    if let Some(v) = overrides.reynolds {
        model.reynolds = v;
    }
}
