//! Tick level selection for one curved coordinate.

/// Tick levels chosen by a [`GridLocator`].
///
/// `levels` are in locator units; the curved-coordinate value of a level is
/// `level / factor`. Only the first `count` levels are drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickLevels {
    /// Ordered tick levels, pre-scaling.
    pub levels: Vec<f64>,
    /// Number of levels in use.
    pub count: usize,
    /// Scale factor between levels and coordinate values.
    pub factor: f64,
}

impl TickLevels {
    /// All `levels` in use with the given factor.
    #[must_use]
    pub fn new(levels: Vec<f64>, factor: f64) -> Self {
        Self {
            count: levels.len(),
            levels,
            factor,
        }
    }

    /// Levels in use.
    #[must_use]
    pub fn used(&self) -> &[f64] {
        &self.levels[..self.count.min(self.levels.len())]
    }

    /// Curved-coordinate values of the levels in use.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.used().iter().map(|l| l / self.factor).collect()
    }
}

/// Chooses tick levels over a curved-coordinate range.
pub trait GridLocator {
    /// Levels covering `[v1, v2]` (the bounds may be unordered).
    fn locate(&self, v1: f64, v2: f64) -> TickLevels;
}

impl<F> GridLocator for F
where
    F: Fn(f64, f64) -> TickLevels,
{
    fn locate(&self, v1: f64, v2: f64) -> TickLevels {
        self(v1, v2)
    }
}

/// Smallest "nice" step (a multiple of a step base times a power of ten) not
/// below `raw`.
#[must_use]
pub fn nice_step(raw: f64, bases: &[f64]) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let base = 10.0_f64.powf(raw.log10().floor());
    bases.iter().map(|&m| m * base).find(|&s| raw <= s).unwrap_or(base * 10.0)
}

/// At most `nbins` intervals of a nice step inside the range.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxNLocator {
    nbins: usize,
    steps: Vec<f64>,
}

impl Default for MaxNLocator {
    fn default() -> Self {
        Self::new(10)
    }
}

impl MaxNLocator {
    /// Locator with steps of 1, 2, 5 and 10 times a power of ten.
    #[must_use]
    pub fn new(nbins: usize) -> Self {
        Self {
            nbins: nbins.max(1),
            steps: vec![1.0, 2.0, 5.0, 10.0],
        }
    }

    /// Replace the step bases (each in `[1, 10]`).
    #[must_use]
    pub fn steps(mut self, steps: Vec<f64>) -> Self {
        if !steps.is_empty() {
            self.steps = steps;
        }
        self
    }
}

impl GridLocator for MaxNLocator {
    fn locate(&self, v1: f64, v2: f64) -> TickLevels {
        let (lo, hi) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
        let span = hi - lo;
        if !span.is_finite() || span <= 0.0 {
            return TickLevels::new(Vec::new(), 1.0);
        }
        let step = nice_step(span / self.nbins as f64, &self.steps);
        let first = (lo / step).ceil();
        let mut levels: Vec<f64> = (0..=self.nbins + 1)
            .map(|i| (first + i as f64) * step)
            .take_while(|level| *level <= hi)
            // `+ 0.0` folds -0.0 into 0.0 for the level at the origin.
            .map(|level| level + 0.0)
            .collect();
        // Far from the origin neighbouring multiples can round to one value.
        levels.dedup();
        TickLevels::new(levels, 1.0)
    }
}

/// A fixed set of levels, filtered to the range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixedLocator {
    locs: Vec<f64>,
}

impl FixedLocator {
    /// Locator drawing from `locs`.
    #[must_use]
    pub fn new(locs: Vec<f64>) -> Self {
        Self { locs }
    }
}

impl GridLocator for FixedLocator {
    fn locate(&self, v1: f64, v2: f64) -> TickLevels {
        let (lo, hi) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
        TickLevels::new(self.locs.iter().copied().filter(|l| lo <= *l && *l <= hi).collect(), 1.0)
    }
}
