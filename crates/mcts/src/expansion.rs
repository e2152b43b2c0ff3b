//! Expansion policies decide which children a leaf receives.

use kinrow_core::State;

/// Returns the actions to create children for, in order.
///
/// The engine calls this at most once per node and creates every child in
/// one shot.
pub trait ExpansionPolicy<S: State> {
    fn expand(&self, state: &S) -> Vec<S::Action>;
}

/// The state's own action enumeration, unmodified.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearExpansion;

impl<S: State> ExpansionPolicy<S> for LinearExpansion {
    fn expand(&self, state: &S) -> Vec<S::Action> {
        state.actions()
    }
}

impl<S, F> ExpansionPolicy<S> for F
where
    S: State,
    F: Fn(&S) -> Vec<S::Action>,
{
    fn expand(&self, state: &S) -> Vec<S::Action> {
        self(state)
    }
}
