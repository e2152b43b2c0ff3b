//! Utility vectors.
//!
//! A [`Utility`] holds one reward per player, indexed by turn order.
//! Shape mismatches are reported as errors rather than silently truncated.

use crate::{GameError, Result};
use std::fmt;

/// Per-player reward tuple.
///
/// # Example
/// ```
/// use kinrow_core::Utility;
///
/// let a = Utility::new(vec![1.0, -1.0]);
/// let b = Utility::new(vec![0.0, 0.0]);
/// let sum = a.try_add(&b).unwrap();
/// assert_eq!(sum.as_slice(), &[1.0, -1.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Utility(Vec<f64>);

impl Utility {
    /// Wrap raw per-player rewards.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// All-zero utility for `num_players` players (a draw).
    pub fn zeros(num_players: usize) -> Self {
        Self(vec![0.0; num_players])
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reward of one player, if the index is in range.
    pub fn get(&self, player: usize) -> Option<f64> {
        self.0.get(player).copied()
    }

    /// Sum over every player.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Sum of the selected entries after rotating each index by `shift`.
    ///
    /// Index `i` reads entry `(i + shift) % len`, which is how a fixed
    /// "maximize these players" choice follows the turn order down a tree.
    ///
    /// # Errors
    /// Returns `GameError::UtilityIndex` if an index is not smaller than the
    /// number of players.
    pub fn sum_indices(&self, indices: &[usize], shift: usize) -> Result<f64> {
        let len = self.0.len();
        let mut sum = 0.0;
        for &index in indices {
            if index >= len {
                return Err(GameError::UtilityIndex { index, len });
            }
            sum += self.0[(index + shift) % len];
        }
        Ok(sum)
    }

    /// Component-wise sum.
    ///
    /// # Errors
    /// Returns `GameError::UtilityShape` if the lengths differ.
    pub fn try_add(&self, other: &Utility) -> Result<Utility> {
        if self.0.len() != other.0.len() {
            return Err(GameError::UtilityShape {
                expected: self.0.len(),
                found: other.0.len(),
            });
        }
        Ok(Self(
            self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect(),
        ))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Utility {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl fmt::Display for Utility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.3}", v)?;
        }
        write!(f, ")")
    }
}
