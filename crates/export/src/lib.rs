//! Export writers for aero section artifacts.

pub mod section_block {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use rotor_aeromodel::AeroModel;

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write one aero section block in the fixed-width layout the solver
    /// reads back. `section` is 1-based. The Re scaling exponent, Cm, and
    /// Mcrit lines are literal text, never computed.
    pub fn write_block(
        writer: &mut dyn Write,
        section: usize,
        r_over_r: f64,
        model: &AeroModel,
    ) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, " Section {}   r/R = {}", section, r_over_r)?;
        writeln!(
            writer,
            " ===================================================================="
        )?;
        writeln!(
            writer,
            " Zero-lift alpha (deg):  {:<2.2}        Minimum Cd           : {:<2.4}",
            model.zero_lift_alpha, model.min_cd
        )?;
        writeln!(
            writer,
            " d(Cl)/d(alpha)       :  {:<2.3}        Cl at minimum Cd     : {:<2.3}",
            model.dcl_dalpha, model.cl_at_min_cd
        )?;
        writeln!(
            writer,
            " d(Cl)/d(alpha)@stall :  {:<2.3}        d(Cd)/d(Cl**2)       : {:<2.4}",
            model.dcl_dalpha_stall, model.dcd_ddcl
        )?;
        writeln!(
            writer,
            " Maximum Cl           :  {:<2.2}         Reference Re number  :  {:<6.1}",
            model.max_cl, model.reynolds
        )?;
        writeln!(
            writer,
            " Minimum Cl           : {:<2.2}         Re scaling exponent  : -0.4000",
            model.min_cl
        )?;
        writeln!(
            writer,
            " Cl increment to stall: {:<2.3}         Cm                   : -0.100",
            model.cl_increment_to_stall
        )?;
        writeln!(
            writer,
            "                                      Mcrit                :  0.800"
        )?;
        writeln!(
            writer,
            " ===================================================================="
        )?;
        Ok(())
    }
}

pub mod model_json {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    use rotor_aeromodel::AeroModel;

    /// Machine-readable mirror of one section's fitted scalars.
    #[derive(Debug, Serialize)]
    pub struct ModelSummary {
        pub section: usize,
        pub r_over_r: f64,
        pub polar: String,
        pub zero_lift_alpha: f64,
        pub dcl_dalpha: f64,
        pub dcl_dalpha_stall: f64,
        pub max_cl: f64,
        pub min_cl: f64,
        pub cl_increment_to_stall: f64,
        pub min_cd: f64,
        pub cl_at_min_cd: f64,
        pub dcd_ddcl: f64,
        pub reynolds: f64,
    }

    impl ModelSummary {
        pub fn new(section: usize, r_over_r: f64, polar: &str, model: &AeroModel) -> Self {
            Self {
                section,
                r_over_r,
                polar: polar.to_string(),
                zero_lift_alpha: model.zero_lift_alpha,
                dcl_dalpha: model.dcl_dalpha,
                dcl_dalpha_stall: model.dcl_dalpha_stall,
                max_cl: model.max_cl,
                min_cl: model.min_cl,
                cl_increment_to_stall: model.cl_increment_to_stall,
                min_cd: model.min_cd,
                cl_at_min_cd: model.cl_at_min_cd,
                dcd_ddcl: model.dcd_ddcl,
                reynolds: model.reynolds,
            }
        }
    }

    /// Write all section summaries as pretty-printed JSON.
    pub fn write_summaries(path: &Path, summaries: &[ModelSummary]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        to_writer_pretty(file, summaries).map_err(io::Error::from)
    }
}
