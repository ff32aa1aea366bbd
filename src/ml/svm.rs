//! One-vs-one multiclass support vector machine with a Gaussian kernel.
//!
//! Every pair of classes gets its own binary machine, trained with the SMO
//! solver of `linfa-svm`. Only the support vectors and their signed dual
//! coefficients are kept, so a fitted model is self-contained and decides
//! the same way before and after persistence.
//!
//! The kernel is `k(x, y) = exp(-‖x - y‖² / (2σ²))`.

use crate::config::{DecisionMethod, SvmParameters};
use crate::error::{Error, Result};
use crate::ml::category::Category;
use crate::ml::feature_extractor::{to_matrix, FeatureVector};
use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2, Axis};

/// Gaussian kernel value for two feature vectors.
pub fn gaussian_kernel(a: &FeatureVector, b: &FeatureVector, sigma: f64) -> f64 {
    let dist2: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    (-dist2 / (2.0 * sigma * sigma)).exp()
}

/// Pair size above which fitting logs a memory warning.
///
/// The solver keeps a dense `rows × rows` kernel matrix for every pair, so
/// memory grows with the square of the rows of the two classes.
pub const LARGE_PAIR_ROWS: usize = 10_000;

/// Bytes taken by the dense kernel matrix of a pair with `rows` rows.
pub fn dense_kernel_bytes(rows: usize) -> u64 {
    let rows = rows as u64;
    rows.saturating_mul(rows).saturating_mul(std::mem::size_of::<f64>() as u64)
}

fn large_pair_warning(positive: Category, negative: Category, rows: usize) -> Option<String> {
    (rows > LARGE_PAIR_ROWS).then(|| {
        format!(
            "{} vs {} machine has {} rows; its dense kernel matrix needs about {:.1} GB",
            positive,
            negative,
            rows,
            dense_kernel_bytes(rows) as f64 / 1e9
        )
    })
}

/// A binary machine separating `positive` from `negative`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMachine {
    /// Class chosen for non-negative decision values
    pub positive: Category,
    /// Class chosen for negative decision values
    pub negative: Category,
    /// Support vectors
    pub support_vectors: Vec<FeatureVector>,
    /// Signed dual coefficient of each support vector
    pub weights: Vec<f64>,
    /// Bias
    pub rho: f64,
}

impl BinaryMachine {
    /// Signed decision value; `>= 0` favours `positive`.
    pub fn decision_value(&self, x: &FeatureVector, sigma: f64) -> f64 {
        let sum: f64 = self
            .support_vectors
            .iter()
            .zip(&self.weights)
            .map(|(sv, w)| w * gaussian_kernel(sv, x, sigma))
            .sum();
        sum - self.rho
    }

    fn winner(&self, value: f64) -> Category {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    fn fit(
        records: &Array2<f64>,
        inputs: &[FeatureVector],
        labels: &[Category],
        positive: Category,
        negative: Category,
        params: &SvmParameters,
    ) -> Result<Self> {
        let rows: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == positive || **l == negative)
            .map(|(i, _)| i)
            .collect();

        if let Some(warning) = large_pair_warning(positive, negative, rows.len()) {
            log::warn!("{}", warning);
        }

        let records = records.select(Axis(0), &rows);
        let targets: Array1<bool> = rows.iter().map(|&i| labels[i] == positive).collect();
        let dataset = Dataset::new(records, targets);

        let eps = 2.0 * params.sigma * params.sigma;
        let svm = Svm::<_, bool>::params()
            .gaussian_kernel(eps)
            .pos_neg_weights(params.complexity, params.complexity)
            .fit(&dataset)
            .map_err(|e| {
                Error::Training(format!("{} vs {} machine failed: {}", positive, negative, e))
            })?;

        let mut support_vectors = Vec::new();
        let mut weights = Vec::new();
        for (k, &alpha) in svm.alpha.iter().enumerate() {
            if alpha != 0.0 {
                support_vectors.push(inputs[rows[k]]);
                weights.push(alpha);
            }
        }

        log::debug!(
            "{} vs {}: {} of {} rows are support vectors",
            positive,
            negative,
            support_vectors.len(),
            rows.len()
        );

        Ok(Self {
            positive,
            negative,
            support_vectors,
            weights,
            rho: svm.rho,
        })
    }
}

/// Fitted one-vs-one multiclass machine.
///
/// # Example
///
/// ```no_run
/// use region_oxide::config::SvmParameters;
/// use region_oxide::ml::{Category, FeatureVector, MulticlassSvm};
///
/// # fn main() -> region_oxide::Result<()> {
/// let inputs = vec![FeatureVector([0.0; 13]), FeatureVector([1.0; 13])];
/// let labels = vec![Category::Title, Category::Text];
/// let model = MulticlassSvm::fit(&inputs, &labels, &SvmParameters::new(1.0))?;
/// let category = model.decide(&inputs[0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MulticlassSvm {
    sigma: f64,
    decision: DecisionMethod,
    classes: Vec<Category>,
    machines: Vec<BinaryMachine>,
}

/// A decision together with its confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Chosen category
    pub category: Category,
    /// Absolute value of the deciding duel (elimination) or vote count
    /// (voting)
    pub score: f64,
}

impl MulticlassSvm {
    /// Fit a model on the given examples.
    ///
    /// Classes are the distinct labels present, in code order. Fails with
    /// [`Error::InsufficientData`] for fewer than two of them.
    pub fn fit(
        inputs: &[FeatureVector],
        labels: &[Category],
        params: &SvmParameters,
    ) -> Result<Self> {
        params.validate()?;
        if inputs.len() != labels.len() {
            return Err(Error::LengthMismatch {
                inputs: inputs.len(),
                labels: labels.len(),
            });
        }

        let mut classes: Vec<Category> = labels.to_vec();
        classes.sort();
        classes.dedup();
        if classes.len() < 2 {
            return Err(Error::InsufficientData {
                distinct: classes.len(),
            });
        }

        let records = to_matrix(inputs);
        let mut machines = Vec::with_capacity(classes.len() * (classes.len() - 1) / 2);
        for (i, &positive) in classes.iter().enumerate() {
            for &negative in &classes[i + 1..] {
                machines.push(BinaryMachine::fit(
                    &records, inputs, labels, positive, negative, params,
                )?);
            }
        }

        Ok(Self {
            sigma: params.sigma,
            decision: params.decision,
            classes,
            machines,
        })
    }

    /// Reassemble a model from its parts.
    ///
    /// `classes` must be strictly increasing and `machines` must hold one
    /// machine per pair in row-major upper-triangle order.
    pub fn from_parts(
        sigma: f64,
        decision: DecisionMethod,
        classes: Vec<Category>,
        machines: Vec<BinaryMachine>,
    ) -> Result<Self> {
        SvmParameters::new(sigma).validate().map_err(|e| Error::CorruptModel(e.to_string()))?;
        if classes.len() < 2 || classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::CorruptModel(format!("invalid class list {:?}", classes)));
        }
        let expected = classes.len() * (classes.len() - 1) / 2;
        if machines.len() != expected {
            return Err(Error::CorruptModel(format!(
                "expected {} pairwise machines, found {}",
                expected,
                machines.len()
            )));
        }

        let mut k = 0;
        for (i, &positive) in classes.iter().enumerate() {
            for &negative in &classes[i + 1..] {
                let m = &machines[k];
                if m.positive != positive || m.negative != negative {
                    return Err(Error::CorruptModel(format!(
                        "machine {} is {} vs {}, expected {} vs {}",
                        k, m.positive, m.negative, positive, negative
                    )));
                }
                if m.support_vectors.len() != m.weights.len() {
                    return Err(Error::CorruptModel(format!(
                        "machine {} has {} support vectors but {} weights",
                        k,
                        m.support_vectors.len(),
                        m.weights.len()
                    )));
                }
                k += 1;
            }
        }

        Ok(Self {
            sigma,
            decision,
            classes,
            machines,
        })
    }

    /// Kernel width.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Decision method.
    pub fn decision_method(&self) -> DecisionMethod {
        self.decision
    }

    /// Use a different decision method.
    pub fn with_decision_method(mut self, decision: DecisionMethod) -> Self {
        self.decision = decision;
        self
    }

    /// Classes the model can output, in code order.
    pub fn classes(&self) -> &[Category] {
        &self.classes
    }

    /// Pairwise machines.
    pub fn machines(&self) -> &[BinaryMachine] {
        &self.machines
    }

    /// Total number of stored support vectors.
    pub fn support_vector_count(&self) -> usize {
        self.machines.iter().map(|m| m.support_vectors.len()).sum()
    }

    /// Predict the category of `x`.
    pub fn decide(&self, x: &FeatureVector) -> Category {
        self.decide_with_score(x).category
    }

    /// Confidence of the prediction for `x`.
    pub fn score(&self, x: &FeatureVector) -> f64 {
        self.decide_with_score(x).score
    }

    /// Predict every input.
    pub fn decide_all(&self, inputs: &[FeatureVector]) -> Vec<Category> {
        inputs.iter().map(|x| self.decide(x)).collect()
    }

    /// Predict the category of `x` with its score.
    pub fn decide_with_score(&self, x: &FeatureVector) -> Decision {
        match self.decision {
            DecisionMethod::Elimination => self.eliminate(x),
            DecisionMethod::Voting => self.vote(x),
        }
    }

    /// Index of the machine for classes at positions `i < j`.
    fn machine_index(&self, i: usize, j: usize) -> usize {
        let n = self.classes.len();
        i * (2 * n - i - 1) / 2 + (j - i - 1)
    }

    fn eliminate(&self, x: &FeatureVector) -> Decision {
        let mut first = 0;
        let mut last = self.classes.len() - 1;
        let mut score = 0.0;
        while first < last {
            let value = self.machines[self.machine_index(first, last)].decision_value(x, self.sigma);
            score = value.abs();
            if value >= 0.0 {
                last -= 1;
            } else {
                first += 1;
            }
        }
        Decision {
            category: self.classes[first],
            score,
        }
    }

    fn vote(&self, x: &FeatureVector) -> Decision {
        let mut votes = vec![0usize; self.classes.len()];
        for m in &self.machines {
            let winner = m.winner(m.decision_value(x, self.sigma));
            if let Some(pos) = self.classes.iter().position(|c| *c == winner) {
                votes[pos] += 1;
            }
        }
        // First maximum wins, which is the lowest code
        let mut best = 0;
        for (i, v) in votes.iter().enumerate() {
            if *v > votes[best] {
                best = i;
            }
        }
        Decision {
            category: self.classes[best],
            score: votes[best] as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(a: f64, b: f64) -> FeatureVector {
        let mut v = [0.0; 13];
        v[0] = a;
        v[1] = b;
        FeatureVector(v)
    }

    fn stub_machine(positive: Category, negative: Category, rho: f64) -> BinaryMachine {
        BinaryMachine {
            positive,
            negative,
            support_vectors: Vec::new(),
            weights: Vec::new(),
            rho,
        }
    }

    #[test]
    fn test_kernel() {
        let a = fv(0.0, 0.0);
        let b = fv(3.0, 4.0);
        assert_eq!(gaussian_kernel(&a, &a, 1.0), 1.0);
        let expected = (-25.0f64 / 2.0).exp();
        assert!((gaussian_kernel(&a, &b, 1.0) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_machine_index_layout() {
        let classes = Category::ALL.to_vec();
        let mut machines = Vec::new();
        for (i, &p) in classes.iter().enumerate() {
            for &n in &classes[i + 1..] {
                machines.push(stub_machine(p, n, 0.0));
            }
        }
        let model =
            MulticlassSvm::from_parts(1.0, DecisionMethod::Elimination, classes, machines).unwrap();
        for i in 0..5 {
            for j in i + 1..5 {
                let m = &model.machines[model.machine_index(i, j)];
                assert_eq!(m.positive, Category::ALL[i]);
                assert_eq!(m.negative, Category::ALL[j]);
            }
        }
    }

    #[test]
    fn test_elimination_with_constant_machines() {
        // rho < 0 makes every machine answer positive: the lowest class wins
        let classes = vec![Category::Title, Category::Text, Category::List];
        let machines = vec![
            stub_machine(Category::Title, Category::Text, -1.0),
            stub_machine(Category::Title, Category::List, -2.0),
            stub_machine(Category::Text, Category::List, -3.0),
        ];
        let model =
            MulticlassSvm::from_parts(1.0, DecisionMethod::Elimination, classes, machines).unwrap();
        let d = model.decide_with_score(&fv(0.0, 0.0));
        assert_eq!(d.category, Category::Title);
        assert_eq!(d.score, 1.0);
    }

    #[test]
    fn test_voting_with_constant_machines() {
        // Every machine answers negative: the highest class collects all votes
        let classes = vec![Category::Title, Category::Text, Category::List];
        let machines = vec![
            stub_machine(Category::Title, Category::Text, 1.0),
            stub_machine(Category::Title, Category::List, 1.0),
            stub_machine(Category::Text, Category::List, 1.0),
        ];
        let model =
            MulticlassSvm::from_parts(1.0, DecisionMethod::Voting, classes, machines).unwrap();
        let d = model.decide_with_score(&fv(0.0, 0.0));
        assert_eq!(d.category, Category::List);
        assert_eq!(d.score, 2.0);
    }

    #[test]
    fn test_from_parts_rejects_wrong_layout() {
        let classes = vec![Category::Title, Category::Text, Category::List];
        let machines = vec![stub_machine(Category::Title, Category::Text, 0.0)];
        assert!(matches!(
            MulticlassSvm::from_parts(1.0, DecisionMethod::Voting, classes.clone(), machines),
            Err(Error::CorruptModel(_))
        ));

        let swapped = vec![
            stub_machine(Category::Title, Category::List, 0.0),
            stub_machine(Category::Title, Category::Text, 0.0),
            stub_machine(Category::Text, Category::List, 0.0),
        ];
        assert!(MulticlassSvm::from_parts(1.0, DecisionMethod::Voting, classes, swapped).is_err());
    }

    #[test]
    fn test_fit_requires_two_classes() {
        let inputs = vec![fv(0.0, 0.0), fv(1.0, 1.0)];
        let labels = vec![Category::Text, Category::Text];
        let result = MulticlassSvm::fit(&inputs, &labels, &SvmParameters::new(1.0));
        assert!(matches!(result, Err(Error::InsufficientData { distinct: 1 })));
    }

    #[test]
    fn test_fit_length_mismatch() {
        let inputs = vec![fv(0.0, 0.0)];
        let labels = vec![Category::Text, Category::Title];
        let result = MulticlassSvm::fit(&inputs, &labels, &SvmParameters::new(1.0));
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn test_large_pair_warning() {
        assert_eq!(dense_kernel_bytes(30_000), 7_200_000_000);
        assert!(large_pair_warning(Category::Title, Category::Text, LARGE_PAIR_ROWS).is_none());

        let warning = large_pair_warning(Category::Title, Category::Text, 30_000).unwrap();
        assert!(warning.contains("title vs text"));
        assert!(warning.contains("7.2 GB"));
    }

    #[test]
    fn test_fit_separable_clusters() {
        let mut inputs = Vec::new();
        let mut labels = Vec::new();
        for k in 0..10 {
            let jitter = k as f64 * 0.05;
            inputs.push(fv(0.0 + jitter, 0.0));
            labels.push(Category::Title);
            inputs.push(fv(5.0 + jitter, 0.0));
            labels.push(Category::Text);
            inputs.push(fv(0.0 + jitter, 5.0));
            labels.push(Category::Table);
        }
        let model = MulticlassSvm::fit(&inputs, &labels, &SvmParameters::new(1.0)).unwrap();
        assert_eq!(model.classes(), &[Category::Title, Category::Text, Category::Table]);
        assert_eq!(model.machines().len(), 3);
        assert!(model.support_vector_count() > 0);

        assert_eq!(model.decide(&fv(0.2, 0.1)), Category::Title);
        assert_eq!(model.decide(&fv(5.2, 0.1)), Category::Text);
        assert_eq!(model.decide(&fv(0.2, 5.1)), Category::Table);

        let voting = model.clone().with_decision_method(DecisionMethod::Voting);
        assert_eq!(voting.decide(&fv(5.2, 0.1)), Category::Text);
        assert_eq!(voting.score(&fv(5.2, 0.1)), 2.0);
    }
}
