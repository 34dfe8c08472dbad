use crate::error::{OperationError, Result};

/// Default flattening/root-finding tolerance for committed results.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Coarse tolerance substituted while a drag is in progress.
pub const INTERACTIVE_TOLERANCE: f64 = 3.0;

/// Corner construction policy for the offset of adjacent segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    Bevel,
    #[default]
    Round,
    Miter,
    MiterClip,
    /// Continue both offset curves by their own curvature and join at
    /// the extrapolated crossing with matching arcs.
    Extrapolate,
    /// As `Extrapolate` but joined with straight tangent legs.
    Extrapolate1,
    /// Arc continuation on the incoming side only.
    Extrapolate2,
    /// Arc continuation on the outgoing side only.
    Extrapolate3,
}

/// Winding rule used to resolve self-overlapping offset geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    /// Derives the rule from a style string: `"evenodd"` selects
    /// `EvenOdd`, anything else `NonZero`.
    #[must_use]
    pub fn from_style(style: &str) -> Self {
        if style == "evenodd" {
            Self::EvenOdd
        } else {
            Self::NonZero
        }
    }

    /// Classifies a winding number as interior under this rule.
    #[must_use]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            Self::NonZero => winding != 0,
            Self::EvenOdd => winding % 2 != 0,
        }
    }
}

/// Flattening precision for one offset invocation.
///
/// `Interactive` trades accuracy for latency during drags; a committed
/// call must recompute at the precise tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    Interactive,
    #[default]
    Committed,
}

impl Precision {
    /// Returns the flattening tolerance this precision selects.
    #[must_use]
    pub fn tolerance(self) -> f64 {
        match self {
            Self::Interactive => INTERACTIVE_TOLERANCE,
            Self::Committed => DEFAULT_TOLERANCE,
        }
    }
}

/// Style parameters for a path-offset operation.
#[derive(Debug, Clone, Copy)]
pub struct OffsetStyle {
    join: JoinType,
    miter_limit: f64,
    force_join: bool,
    fill_rule: FillRule,
    precision: Precision,
}

impl OffsetStyle {
    /// Creates a new offset style.
    ///
    /// # Errors
    ///
    /// Returns an error if `miter_limit` is not positive.
    pub fn new(join: JoinType, miter_limit: f64, fill_rule: FillRule) -> Result<Self> {
        if miter_limit <= 0.0 {
            return Err(OperationError::InvalidInput(
                "miter limit must be positive".to_owned(),
            )
            .into());
        }
        Ok(Self {
            join,
            miter_limit,
            force_join: false,
            fill_rule,
            precision: Precision::default(),
        })
    }

    /// Makes the miter limit effectively infinite.
    #[must_use]
    pub fn with_force_join(mut self, force: bool) -> Self {
        self.force_join = force;
        self
    }

    /// Selects the flattening precision.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn join(&self) -> JoinType {
        self.join
    }

    /// Returns the effective miter limit as a multiple of the offset
    /// distance.
    #[must_use]
    pub fn miter_limit(&self) -> f64 {
        if self.force_join {
            f64::INFINITY
        } else {
            self.miter_limit
        }
    }

    #[must_use]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }
}

impl Default for OffsetStyle {
    fn default() -> Self {
        Self {
            join: JoinType::default(),
            miter_limit: 4.0,
            force_join: false,
            fill_rule: FillRule::default(),
            precision: Precision::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_with_valid_limit() {
        let style = OffsetStyle::new(JoinType::Miter, 4.0, FillRule::NonZero).unwrap();
        assert!((style.miter_limit() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_with_non_positive_limit_fails() {
        assert!(OffsetStyle::new(JoinType::Miter, 0.0, FillRule::NonZero).is_err());
        assert!(OffsetStyle::new(JoinType::Miter, -1.0, FillRule::NonZero).is_err());
    }

    #[test]
    fn force_join_is_infinite_limit() {
        let style = OffsetStyle::new(JoinType::Miter, 2.0, FillRule::NonZero)
            .unwrap()
            .with_force_join(true);
        assert!(style.miter_limit().is_infinite());
    }

    #[test]
    fn fill_rule_from_style_string() {
        assert_eq!(FillRule::from_style("evenodd"), FillRule::EvenOdd);
        assert_eq!(FillRule::from_style("nonzero"), FillRule::NonZero);
        assert_eq!(FillRule::from_style(""), FillRule::NonZero);
    }

    #[test]
    fn fill_rule_classification() {
        assert!(FillRule::NonZero.is_inside(2));
        assert!(!FillRule::EvenOdd.is_inside(2));
        assert!(FillRule::EvenOdd.is_inside(-1));
        assert!(!FillRule::NonZero.is_inside(0));
    }

    #[test]
    fn precision_tolerances() {
        assert!(Precision::Interactive.tolerance() > Precision::Committed.tolerance());
    }
}
