//! Combining utility vectors during backpropagation.
//!
//! The engine only assumes the operator is associative and commutative, so
//! the accumulated value at a node does not depend on the order in which
//! simulations reach it.

use kinrow_core::{GameError, Utility};

/// Merges an accumulated utility with a new simulation result.
pub trait UtilityCombine {
    fn combine(&self, accumulated: &Utility, sample: &Utility) -> Result<Utility, GameError>;
}

/// Component-wise sum (the default).
#[derive(Clone, Copy, Debug, Default)]
pub struct ComponentSum;

impl UtilityCombine for ComponentSum {
    fn combine(&self, accumulated: &Utility, sample: &Utility) -> Result<Utility, GameError> {
        accumulated.try_add(sample)
    }
}

impl<F> UtilityCombine for F
where
    F: Fn(&Utility, &Utility) -> Result<Utility, GameError>,
{
    fn combine(&self, accumulated: &Utility, sample: &Utility) -> Result<Utility, GameError> {
        self(accumulated, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (1usize..5).prop_flat_map(|n| {
            (
                proptest::collection::vec(-8i32..8, n),
                proptest::collection::vec(-8i32..8, n),
            )
                .prop_map(|(a, b)| {
                    (
                        a.into_iter().map(f64::from).collect(),
                        b.into_iter().map(f64::from).collect(),
                    )
                })
        })
    }

    #[test]
    fn test_component_sum() {
        let a = Utility::new(vec![1.0, -1.0]);
        let b = Utility::new(vec![-1.0, 1.0]);
        assert_eq!(ComponentSum.combine(&a, &b).unwrap(), Utility::zeros(2));
    }

    #[test]
    fn test_component_sum_shape_error() {
        let a = Utility::zeros(2);
        let b = Utility::zeros(3);
        assert!(ComponentSum.combine(&a, &b).is_err());
    }

    #[test]
    fn test_closure_combine() {
        let max = |a: &Utility, b: &Utility| -> Result<Utility, GameError> {
            Ok(Utility::new(
                a.iter().zip(b.iter()).map(|(x, y)| x.max(*y)).collect(),
            ))
        };
        let a = Utility::new(vec![1.0, -2.0]);
        let b = Utility::new(vec![0.0, 3.0]);
        assert_eq!(max.combine(&a, &b).unwrap().as_slice(), &[1.0, 3.0]);
    }

    proptest! {
        /// combine(a, b) == combine(b, a) for the default operator.
        #[test]
        fn prop_component_sum_commutes((a, b) in arb_pair()) {
            let a = Utility::new(a);
            let b = Utility::new(b);
            prop_assert_eq!(
                ComponentSum.combine(&a, &b).unwrap(),
                ComponentSum.combine(&b, &a).unwrap()
            );
        }

        /// Accumulation order does not change the result.
        #[test]
        fn prop_accumulation_order_independent(
            samples in proptest::collection::vec(proptest::collection::vec(-8i32..8, 2), 1..12)
        ) {
            let samples: Vec<Utility> = samples
                .into_iter()
                .map(|s| Utility::new(s.into_iter().map(f64::from).collect()))
                .collect();

            let forward = samples[1..]
                .iter()
                .try_fold(samples[0].clone(), |acc, s| ComponentSum.combine(&acc, s))
                .unwrap();
            let last = samples.len() - 1;
            let backward = samples[..last]
                .iter()
                .rev()
                .try_fold(samples[last].clone(), |acc, s| ComponentSum.combine(&acc, s))
                .unwrap();

            prop_assert_eq!(forward, backward);
        }
    }
}
