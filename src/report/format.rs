//! Plain-text tables for the terminal.

use crate::domain::{FitFile, MaterialFit, SyntheticSeries};
use crate::report::PointResidual;

/// Format a simulated series (one row per checkpoint).
pub fn format_series(series: &SyntheticSeries) -> String {
    let mut out = String::new();

    out.push_str("=== cooling - simulated series ===\n");
    out.push_str(&format!(
        "Ta={:.2}°C To={:.2}°C k={:.6e}/s | draws={} σT={:.2}°C σt floor={:.1}s | seed={}\n\n",
        series.params.ambient(),
        series.params.initial(),
        series.params.rate(),
        series.config.sample_count,
        series.config.sigma_temperature,
        series.config.sigma_time_floor,
        series.seed,
    ));

    out.push_str(&format!(
        "{:>8} {:>12} {:>10} {:>12} {:>8}\n",
        "T [°C]", "t [s]", "σt [s]", "t_nom [s]", "dropped"
    ));
    out.push_str(&format!("{:-<8} {:-<12} {:-<10} {:-<12} {:-<8}\n", "", "", "", "", ""));
    for sp in &series.points {
        out.push_str(&format!(
            "{:>8.2} {:>12.3} {:>10.3} {:>12.3} {:>8}\n",
            sp.point.temperature,
            sp.point.time,
            sp.point.sigma_time,
            sp.nominal_time,
            sp.monte_carlo.rejected,
        ));
    }

    out
}

/// Format fitted parameters for a set of materials.
pub fn format_fit_summary(fit_file: &FitFile) -> String {
    let mut out = String::new();

    out.push_str("=== cooling - best fits ===\n");
    out.push_str(&format!(
        "Environment: {} (Ta={:.2}°C) | RK4 step h={}s\n\n",
        fit_file.environment.display_name(),
        fit_file.ambient,
        fit_file.options.step,
    ));

    out.push_str(&format!(
        "{:<16} {:>18} {:>24} {:>10} {:>4} {:>9} {:>6}\n",
        "material", "To [°C]", "k [1/s]", "chi2", "dof", "chi2/dof", "Cv"
    ));
    out.push_str(&format!(
        "{:-<16} {:-<18} {:-<24} {:-<10} {:-<4} {:-<9} {:-<6}\n",
        "", "", "", "", "", "", ""
    ));
    for mf in &fit_file.fits {
        out.push_str(&format_fit_row(mf));
    }

    out
}

fn format_fit_row(mf: &MaterialFit) -> String {
    let (s_to, s_k) = mf.fit.std_errors();
    let reduced = mf
        .fit
        .reduced_chi_square()
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<16} {:>18} {:>24} {:>10.3} {:>4} {:>9} {:>6.2}\n",
        mf.material.display_name(),
        format!("{:.3} ± {:.3}", mf.fit.to_hat, s_to),
        format!("{:.4e} ± {:.1e}", mf.fit.k_hat, s_k),
        mf.fit.chi_square,
        mf.fit.dof,
        reduced,
        mf.material.heat_capacity(),
    )
}

/// Format per-point residuals of one fit.
pub fn format_residuals(label: &str, residuals: &[PointResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{label}\n"));
    out.push_str(&format!(
        "{:>10} {:>8} {:>10} {:>9} {:>7}\n",
        "t [s]", "T [°C]", "fit [°C]", "resid", "pull"
    ));
    for r in residuals {
        out.push_str(&format!(
            "{:>10.3} {:>8.2} {:>10.3} {:>9.3} {:>7.2}\n",
            r.point.time, r.point.temperature, r.fitted, r.residual, r.pull
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthesize_series;
    use crate::domain::{
        CheckpointGrid, CurveGrid, Dataset, Environment, FitOptions, FitResult, Material,
        MonteCarloConfig, PhysicalParameters,
    };
    use crate::io::build_fit_file;

    #[test]
    fn series_table_has_one_row_per_checkpoint() {
        let params = PhysicalParameters::new(20.0, 74.0, 0.000764).unwrap();
        let cfg = MonteCarloConfig { sample_count: 20, ..MonteCarloConfig::default() };
        let series = synthesize_series(&params, &CheckpointGrid::default(), &cfg, 1).unwrap();
        let text = format_series(&series);
        // Title, settings, blank, header, rule, 10 rows.
        assert_eq!(text.lines().count(), 15);
        assert!(text.contains("seed=1"));
    }

    #[test]
    fn fit_summary_lists_materials() {
        let fit = FitResult {
            to_hat: 73.5,
            k_hat: 0.00071,
            covariance: [[0.25, 0.0], [0.0, 1e-10]],
            chi_square: 8.0,
            dof: 8,
            iterations: 5,
        };
        let mf = MaterialFit {
            material: Material::Glass,
            dataset: Dataset::new("glass", Vec::new()),
            fit,
            curve: CurveGrid { time: vec![], temperature: vec![] },
        };
        let file = build_fit_file(Environment::Room, &FitOptions::default(), vec![mf]);
        let text = format_fit_summary(&file);
        assert!(text.contains("Water-Glass"));
        assert!(text.contains("73.500 ± 0.500"));
        assert!(text.contains("1.000"));
        assert!(text.contains("Ta=20.00"));
    }
}
