use anyhow::Context;
use clap::Parser;
use plotters::prelude::*;
use rotor_section_builder::aeromodel::fit_polar;
use rotor_section_builder::core::scan::linspace;
use rotor_section_builder::core::units::deg_to_rad;
use rotor_section_builder::importer::load_polar;
use std::fs;
use std::path::PathBuf;

/// Render a fitted polar as a two-panel PNG: drag polar on the left, lift
/// curve with the stall continuation on the right.
#[derive(Parser, Debug)]
#[command(author, version, about = "Polar model plot (drag polar + lift curve)")]
struct Cli {
    /// Polar data file (XFLR5 export or generic numeric text)
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/polar.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (table, reynolds) = load_polar(&cli.input)
        .with_context(|| format!("reading polar {}", cli.input.display()))?;
    let model = fit_polar(&table, reynolds)
        .with_context(|| format!("fitting polar {}", cli.input.display()))?;

    // Model curves, sampled the same way the measured lists are plotted.
    let cl_model = linspace(model.min_cl, model.max_cl, 100);
    let drag_curve: Vec<(f64, f64)> = cl_model
        .iter()
        .map(|&y| {
            (
                model.min_cd + model.dcd_ddcl * (model.cl_at_min_cd - y).powi(2),
                y,
            )
        })
        .collect();

    // zero_lift_alpha is carried in degrees; convert before mixing it with
    // the radian alpha axis.
    let zero_lift_rad = deg_to_rad(model.zero_lift_alpha);
    let alpha_first = *model.alpha_list.first().expect("fit keeps at least one sample");
    let alpha_last = *model.alpha_list.last().expect("fit keeps at least one sample");
    let lift_curve: Vec<(f64, f64)> = linspace(alpha_first, alpha_last, 100)
        .into_iter()
        .map(|x| (x, model.dcl_dalpha * (x - zero_lift_rad)))
        .filter(|&(_, cl)| model.min_cl <= cl && cl <= model.max_cl)
        .collect();
    let Some(&(alpha_knee, _)) = lift_curve.last() else {
        anyhow::bail!("linear lift model never enters [min Cl, max Cl]");
    };
    let stall_curve: Vec<(f64, f64)> =
        linspace(model.max_cl, model.max_cl + model.cl_increment_to_stall, 50)
            .into_iter()
            .map(|y| ((y - model.max_cl) / model.dcl_dalpha_stall + alpha_knee, y))
            .collect();

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (drag_area, lift_area) = root.split_horizontally(cli.width as i32 / 2);

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 22.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal);

    {
        let (x_lo, x_hi) = padded_range(
            model
                .cd_list
                .iter()
                .copied()
                .chain(drag_curve.iter().map(|&(x, _)| x)),
        );
        let (y_lo, y_hi) = padded_range(
            model
                .cl_list
                .iter()
                .copied()
                .chain(drag_curve.iter().map(|&(_, y)| y)),
        );
        let mut chart = ChartBuilder::on(&drag_area)
            .margin(20)
            .caption("Drag polar", caption_font.clone())
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
        chart
            .configure_mesh()
            .x_desc("Cd")
            .y_desc("Cl")
            .label_style(label_font.clone())
            .x_labels(6)
            .y_labels(6)
            .draw()?;
        chart.draw_series(std::iter::once(PathElement::new(
            drag_curve.clone(),
            ShapeStyle::from(&RED).stroke_width(2),
        )))?;
        chart.draw_series(
            model
                .cd_list
                .iter()
                .zip(&model.cl_list)
                .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.filled())),
        )?;
    }

    {
        let (x_lo, x_hi) = padded_range(
            model
                .alpha_list
                .iter()
                .copied()
                .chain(stall_curve.iter().map(|&(x, _)| x)),
        );
        let (y_lo, y_hi) = padded_range(
            model
                .cl_list
                .iter()
                .copied()
                .chain(stall_curve.iter().map(|&(_, y)| y)),
        );
        let mut chart = ChartBuilder::on(&lift_area)
            .margin(20)
            .caption("Lift curve", caption_font.clone())
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
        chart
            .configure_mesh()
            .x_desc("alpha (rad)")
            .y_desc("Cl")
            .label_style(label_font.clone())
            .x_labels(6)
            .y_labels(6)
            .draw()?;
        chart.draw_series(std::iter::once(PathElement::new(
            lift_curve,
            ShapeStyle::from(&RED).stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            stall_curve,
            ShapeStyle::from(&GREEN).stroke_width(2),
        )))?;
        chart.draw_series(
            model
                .alpha_list
                .iter()
                .zip(&model.cl_list)
                .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.filled())),
        )?;
    }

    root.present()?;
    log::info!("wrote {}", cli.output.display());
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

/// Axis range covering the values with a 5% margin.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1.0e-6);
    (lo - pad, hi + pad)
}
