use crate::error::SimError;

/// Reaction order, fixed by the shape of the reactant list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionKind {
    ZeroOrder,
    FirstOrder,
    SecondOrderSame,
    SecondOrderDistinct,
}

impl ReactionKind {
    /// Infers the kind from the reactant list, rejecting anything beyond
    /// bimolecular reactions.
    pub fn from_reactants(reactants: &[usize]) -> Result<Self, SimError> {
        match *reactants {
            [] => Ok(Self::ZeroOrder),
            [_] => Ok(Self::FirstOrder),
            [a, b] if a == b => Ok(Self::SecondOrderSame),
            [_, _] => Ok(Self::SecondOrderDistinct),
            _ => Err(SimError::InvalidArgument(format!(
                "reactions take at most two reactants, got {}",
                reactants.len()
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Reaction {
    rate: f64,
    kind: ReactionKind,
    reactants: Vec<usize>,
    products: Vec<usize>,
}

impl Reaction {
    pub fn new(rate: f64, reactants: Vec<usize>, products: Vec<usize>) -> Result<Self, SimError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "rate constant must be a finite non-negative number, got {rate}"
            )));
        }
        let kind = ReactionKind::from_reactants(&reactants)?;
        Ok(Self {
            rate,
            kind,
            reactants,
            products,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn kind(&self) -> ReactionKind {
        self.kind
    }

    pub fn reactants(&self) -> &[usize] {
        &self.reactants
    }

    pub fn products(&self) -> &[usize] {
        &self.products
    }

    /// Every species index this reaction touches, reactants first.
    pub fn species(&self) -> impl Iterator<Item = usize> + '_ {
        self.reactants.iter().chain(self.products.iter()).copied()
    }

    #[inline]
    pub fn propensity(&self, state: &[i64]) -> f64 {
        match self.kind {
            ReactionKind::ZeroOrder => self.rate,
            ReactionKind::FirstOrder => self.rate * state[self.reactants[0]] as f64,
            ReactionKind::SecondOrderSame => {
                let n = state[self.reactants[0]] as f64;
                self.rate * n * (n - 1.0)
            }
            ReactionKind::SecondOrderDistinct => {
                self.rate * state[self.reactants[0]] as f64 * state[self.reactants[1]] as f64
            }
        }
    }

    /// Applies one firing to `state`: reactants are consumed, products produced.
    #[inline]
    pub fn apply(&self, state: &mut [i64]) {
        for &species in &self.reactants {
            state[species] -= 1;
        }
        for &species in &self.products {
            state[species] += 1;
        }
    }
}
