//! Fixed stack positions for exhaustive enumeration.

use rand::Rng;

use blockworld_core::{Error, GenerationConfig, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// X coordinates of the stacks, increasing and centered on 0.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackLayout {
    xs: Vec<f64>,
}

impl StackLayout {
    /// Accumulates `max_stacks - 1` uniform gaps in `[min_margin, max_margin]`
    /// and re-centers the result.
    pub fn random<R: Rng + ?Sized>(
        max_stacks: usize,
        min_margin: f64,
        max_margin: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if max_stacks == 0 {
            return Err(Error::ConfigError("need at least one stack".into()));
        }
        if !(min_margin >= 0.0) || !(min_margin <= max_margin) {
            return Err(Error::ConfigError(format!(
                "invalid stack margins [{min_margin}, {max_margin}]"
            )));
        }
        let mut xs = Vec::with_capacity(max_stacks);
        xs.push(0.0_f64);
        for _ in 1..max_stacks {
            let last = xs[xs.len() - 1];
            xs.push(last + rng.gen_range(min_margin..=max_margin));
        }
        let center = xs[xs.len() - 1] / 2.0;
        for x in &mut xs {
            *x -= center;
        }
        Ok(Self { xs })
    }

    /// Layout described by the stack parameters of `config`.
    pub fn from_config<R: Rng + ?Sized>(config: &GenerationConfig, rng: &mut R) -> Result<Self> {
        Self::random(config.max_stacks, config.min_margin, config.max_margin, rng)
    }

    /// Uses explicit positions.
    pub fn from_positions(xs: Vec<f64>) -> Result<Self> {
        if xs.is_empty() {
            return Err(Error::ConfigError("need at least one stack".into()));
        }
        if xs.iter().any(|x| !x.is_finite()) {
            return Err(Error::ConfigError("stack positions must be finite".into()));
        }
        Ok(Self { xs })
    }

    /// Stack x coordinates.
    pub fn positions(&self) -> &[f64] {
        &self.xs
    }

    /// Number of stacks.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for a constructed layout.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_layout_is_centered() {
        let mut rng = StdRng::seed_from_u64(5);
        let layout = StackLayout::random(4, 1.5, 2.0, &mut rng).unwrap();
        let xs = layout.positions();
        assert_eq!(xs.len(), 4);
        assert_relative_eq!(xs[0], -xs[3], epsilon = 1e-12);
        for pair in xs.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((1.5..=2.0).contains(&gap), "gap {gap}");
        }
    }

    #[test]
    fn test_single_stack_at_origin() {
        let mut rng = StdRng::seed_from_u64(5);
        let layout = StackLayout::random(1, 1.5, 2.0, &mut rng).unwrap();
        assert_eq!(layout.positions(), &[0.0]);
    }

    #[test]
    fn test_fixed_margin() {
        let mut rng = StdRng::seed_from_u64(5);
        let layout = StackLayout::random(3, 1.0, 1.0, &mut rng).unwrap();
        assert_eq!(layout.positions(), &[-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_invalid_layouts() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(StackLayout::random(0, 1.0, 2.0, &mut rng).is_err());
        assert!(StackLayout::random(2, 2.0, 1.0, &mut rng).is_err());
        assert!(StackLayout::from_positions(vec![]).is_err());
        assert!(StackLayout::from_positions(vec![f64::NAN]).is_err());
    }
}
