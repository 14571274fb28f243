//! Saturating activator/inhibitor kinetics.
//!
//! For species `i` at level `x_i` in `[0, 1]`:
//!
//! ```text
//! activation by j:  k[0,i,j] * x_j * (1 - x_i) / ((1 - x_i) + K[0,i,j])
//! inhibition by j:  k[1,i,j] * x_j * x_i       / (x_i + K[1,i,j])
//! ```
//!
//! The input species is driven by the input level through the environmental
//! column. Any other species without an activator is driven by the basal level
//! `E`, and any species without an inhibitor decays with the basal level `F`.

use crate::error::DynamicsError;
use crate::network::RegulatoryNetwork;
use crate::solver::OdeSystem;
use circuit_core::Sign;
use circuit_params::ParameterSet;
use nalgebra::DVector;

/// Levels feeding the environmental column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub input: f64,
    pub basal_activation: f64,
    pub basal_inhibition: f64,
}

/// One saturating contribution to a species' activation or inhibition.
#[derive(Debug, Clone, Copy)]
struct Term {
    source: Source,
    rate: f64,
    threshold: f64,
}

/// A regulating species (local index) or a constant environmental level.
#[derive(Debug, Clone, Copy)]
enum Source {
    Species(usize),
    Constant(f64),
}

impl Term {
    #[inline]
    fn weight(&self, x: &DVector<f64>) -> f64 {
        match self.source {
            Source::Species(j) => x[j] * self.rate,
            Source::Constant(level) => level * self.rate,
        }
    }
}

/// Right-hand side of a compiled network under fixed parameters and levels.
#[derive(Debug, Clone)]
pub struct Kinetics {
    activation: Vec<Vec<Term>>,
    inhibition: Vec<Vec<Term>>,
}

impl Kinetics {
    pub fn new(
        network: &RegulatoryNetwork,
        params: &ParameterSet,
        levels: Levels,
    ) -> Result<Self, DynamicsError> {
        network.check(params)?;
        let n = network.species_count();
        let env = params.environment();

        let term = |sign: Sign, i: usize, source: Source| {
            let column = match source {
                Source::Species(j) => j,
                Source::Constant(_) => env,
            };
            Term {
                source,
                rate: params.rate(sign, i, column),
                threshold: params.threshold(sign, i, column),
            }
        };

        let mut activation = Vec::with_capacity(n);
        let mut inhibition = Vec::with_capacity(n);
        for i in 0..n {
            let mut up = Vec::new();
            if network.input() == Some(i) {
                up.push(term(Sign::Activates, i, Source::Constant(levels.input)));
            } else if network.activators(i).is_empty() {
                up.push(term(
                    Sign::Activates,
                    i,
                    Source::Constant(levels.basal_activation),
                ));
            }
            for &j in network.activators(i) {
                up.push(term(Sign::Activates, i, Source::Species(j)));
            }

            let mut down = Vec::new();
            if network.inhibitors(i).is_empty() {
                down.push(term(
                    Sign::Inhibits,
                    i,
                    Source::Constant(levels.basal_inhibition),
                ));
            }
            for &j in network.inhibitors(i) {
                down.push(term(Sign::Inhibits, i, Source::Species(j)));
            }

            activation.push(up);
            inhibition.push(down);
        }

        Ok(Self {
            activation,
            inhibition,
        })
    }
}

impl OdeSystem for Kinetics {
    fn dim(&self) -> usize {
        self.activation.len()
    }

    fn rhs(&self, x: &DVector<f64>, dxdt: &mut DVector<f64>) {
        for i in 0..self.activation.len() {
            let xi = x[i];
            let free = 1.0 - xi;
            let up: f64 = self.activation[i]
                .iter()
                .map(|t| t.weight(x) * free / (free + t.threshold))
                .sum();
            let down: f64 = self.inhibition[i]
                .iter()
                .map(|t| t.weight(x) * xi / (xi + t.threshold))
                .sum();
            dxdt[i] = up - down;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_core::Topology;

    const LEVELS: Levels = Levels {
        input: 0.5,
        basal_activation: 0.5,
        basal_inhibition: 0.5,
    };

    fn eval(kin: &Kinetics, x: &[f64]) -> Vec<f64> {
        let x = DVector::from_column_slice(x);
        let mut dx = DVector::zeros(x.len());
        kin.rhs(&x, &mut dx);
        dx.iter().copied().collect()
    }

    #[test]
    fn test_single_species_input_and_decay() {
        let t: Topology = "A::".parse().unwrap();
        let net = RegulatoryNetwork::fixed(&t).unwrap();
        let kin = Kinetics::new(&net, &ParameterSet::uniform(1, 1.0, 1.0), LEVELS).unwrap();
        let x = 0.25;
        let expected = 0.5 * (1.0 - x) / ((1.0 - x) + 1.0) - 0.5 * x / (x + 1.0);
        assert!((eval(&kin, &[x])[0] - expected).abs() < 1e-15);
    }

    #[test]
    fn test_regulated_terms() {
        // O is activated by A and inhibited by B; B has no regulator at all.
        let t: Topology = "ABO::AOa_BOi".parse().unwrap();
        let net = RegulatoryNetwork::growing(&t).unwrap();
        let params = ParameterSet::uniform(3, 1.0, 1.0)
            .with_entry(Sign::Activates, 2, 0, 2.0, 0.5)
            .with_entry(Sign::Inhibits, 2, 1, 3.0, 0.25);
        let kin = Kinetics::new(&net, &params, LEVELS).unwrap();

        let (a, b, o) = (0.2, 0.4, 0.6);
        let dx = eval(&kin, &[a, b, o]);

        let sat_up = |x: f64, k: f64| (1.0 - x) / ((1.0 - x) + k);
        let sat_down = |x: f64, k: f64| x / (x + k);
        let da = 0.5 * sat_up(a, 1.0) - 0.5 * sat_down(a, 1.0);
        let db = 0.5 * sat_up(b, 1.0) - 0.5 * sat_down(b, 1.0);
        let d_o = a * 2.0 * sat_up(o, 0.5) - b * 3.0 * sat_down(o, 0.25);
        assert!((dx[0] - da).abs() < 1e-15);
        assert!((dx[1] - db).abs() < 1e-15);
        assert!((dx[2] - d_o).abs() < 1e-15);
    }

    #[test]
    fn test_input_species_keeps_input_with_activators() {
        let t: Topology = "AO::OAa_AOa".parse().unwrap();
        let net = RegulatoryNetwork::growing(&t).unwrap();
        let kin = Kinetics::new(&net, &ParameterSet::uniform(2, 1.0, 1.0), LEVELS).unwrap();
        let x = [0.3, 0.7];
        let up = (1.0 - 0.3) / ((1.0 - 0.3) + 1.0);
        let expected = 0.5 * up + 0.7 * up - 0.5 * 0.3 / (0.3 + 1.0);
        assert!((eval(&kin, &x)[0] - expected).abs() < 1e-15);
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let t: Topology = "AO::AOa".parse().unwrap();
        let net = RegulatoryNetwork::growing(&t).unwrap();
        assert!(matches!(
            Kinetics::new(&net, &ParameterSet::uniform(3, 1.0, 1.0), LEVELS),
            Err(DynamicsError::DimensionMismatch { .. })
        ));
    }
}
