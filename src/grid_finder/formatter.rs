//! Tick label formatting for one curved coordinate.

use super::Side;

/// Turns tick levels into label strings.
pub trait TickFormatter {
    /// One label per entry of `levels`, in the same order.
    ///
    /// `side` is the plot edge the labels are drawn on; `factor` is the
    /// locator's scale factor (coordinate value = `level / factor`).
    fn format(&self, side: Side, factor: f64, levels: &[f64]) -> Vec<String>;
}

impl<F> TickFormatter for F
where
    F: Fn(Side, f64, &[f64]) -> Vec<String>,
{
    fn format(&self, side: Side, factor: f64, levels: &[f64]) -> Vec<String> {
        self(side, factor, levels)
    }
}

/// Plain decimal labels with a shared precision.
///
/// All labels get the fewest decimals that represent every value exactly
/// (up to a small tolerance), so `0.5, 1.0, 1.5` keep one decimal each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarFormatter;

const MAX_DECIMALS: i32 = 12;

fn decimals_for(values: &[f64]) -> usize {
    (0..MAX_DECIMALS)
        .find(|&d| {
            let scale = 10.0_f64.powi(d);
            values.iter().filter(|v| v.is_finite()).all(|v| {
                let s = v * scale;
                (s - s.round()).abs() <= 1e-9 * s.abs().max(1.0)
            })
        })
        .unwrap_or(MAX_DECIMALS) as usize
}

impl TickFormatter for ScalarFormatter {
    fn format(&self, _side: Side, factor: f64, levels: &[f64]) -> Vec<String> {
        let values: Vec<f64> = levels.iter().map(|l| l / factor + 0.0).collect();
        let decimals = decimals_for(&values);
        values.iter().map(|v| format!("{v:.decimals$}")).collect()
    }
}
