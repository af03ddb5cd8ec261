/// Running tally of displayed-species final counts across runs.
///
/// Variance is the population variance, `sum((mean - c_i)^2) / N`.
#[derive(Clone, Debug, Default)]
pub struct RunAggregator {
    samples: Vec<Vec<i64>>,
    width: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesSummary {
    pub species: usize,
    pub mean: f64,
    pub variance: f64,
}

impl RunAggregator {
    pub fn new(width: usize) -> Self {
        Self {
            samples: Vec::new(),
            width,
        }
    }

    /// # Panics
    ///
    /// Panics if `counts` does not hold one value per tracked species.
    pub fn record(&mut self, counts: &[i64]) {
        assert_eq!(
            counts.len(),
            self.width,
            "run recorded {} counts for {} tracked species",
            counts.len(),
            self.width
        );
        self.samples.push(counts.to_vec());
    }

    pub fn runs(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[Vec<i64>] {
        &self.samples
    }

    /// Mean per tracked column; empty when nothing was recorded.
    pub fn means(&self) -> Vec<f64> {
        if self.samples.is_empty() {
            return Vec::new();
        }
        let n = self.samples.len() as f64;
        (0..self.width)
            .map(|col| self.samples.iter().map(|row| row[col] as f64).sum::<f64>() / n)
            .collect()
    }

    pub fn variances(&self) -> Vec<f64> {
        let n = self.samples.len() as f64;
        self.means()
            .into_iter()
            .enumerate()
            .map(|(col, mean)| {
                self.samples
                    .iter()
                    .map(|row| (mean - row[col] as f64).powi(2))
                    .sum::<f64>()
                    / n
            })
            .collect()
    }

    /// Pairs each column with the species index it tracks.
    pub fn summarize(&self, species: &[usize]) -> Vec<SpeciesSummary> {
        self.means()
            .into_iter()
            .zip(self.variances())
            .zip(species)
            .map(|((mean, variance), &species)| SpeciesSummary {
                species,
                mean,
                variance,
            })
            .collect()
    }
}
