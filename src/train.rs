use log::{debug, info};

use crate::metrics::{accuracy, check_shapes, mean_squared_error};
use crate::{Dataset, Error, Network, Result};

/// Configuration for [`Network::fit`].
#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    /// SGD learning rate.
    pub lr: f64,
    /// Epochs trained between two accuracy evaluations.
    pub epochs_per_round: usize,
    /// Hard cap on the number of rounds, in case accuracy plateaus.
    pub max_rounds: usize,
    /// On an accuracy drop, roll the network back to the best round seen so far instead of
    /// keeping the last trained weights.
    pub restore_best: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            lr: 1e-2,
            epochs_per_round: 10,
            max_rounds: 100,
            restore_best: false,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(Error::InvalidConfig("lr must be finite and > 0".to_owned()));
        }
        if self.epochs_per_round == 0 {
            return Err(Error::InvalidConfig(
                "epochs_per_round must be > 0".to_owned(),
            ));
        }
        if self.max_rounds == 0 {
            return Err(Error::InvalidConfig("max_rounds must be > 0".to_owned()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// 1-based round index.
    pub round: usize,
    /// Total epochs trained after this round.
    pub epochs: usize,
    /// Accuracy on the evaluation set after this round.
    pub accuracy: f64,
    /// Mean squared error on the evaluation set after this round.
    pub mse: f64,
}

#[derive(Debug, Clone)]
pub struct FitReport {
    /// Accuracy before any training.
    pub initial_accuracy: f64,
    pub rounds: Vec<RoundReport>,
    /// True if training stopped because accuracy decreased, false if `max_rounds` was hit.
    pub stopped_early: bool,
    pub best_accuracy: f64,
    /// Round that reached `best_accuracy`; 0 means the untrained network.
    pub best_round: usize,
}

impl Network {
    /// Train in rounds of `epochs_per_round` epochs until evaluation accuracy drops.
    ///
    /// Accuracy is measured on `eval` when given, otherwise on `train`. Training continues
    /// while accuracy does not decrease, for at most `max_rounds` rounds.
    pub fn fit(
        &mut self,
        train: &Dataset,
        eval: Option<&Dataset>,
        cfg: FitConfig,
    ) -> Result<FitReport> {
        cfg.validate()?;
        check_shapes(self, train)?;
        let eval = eval.unwrap_or(train);
        check_shapes(self, eval)?;

        let initial_accuracy = accuracy(self, eval)?;
        debug!(
            "fit: {} samples, sizes {:?}, initial accuracy {initial_accuracy:.4}",
            train.len(),
            self.sizes()
        );

        let mut report = FitReport {
            initial_accuracy,
            rounds: Vec::new(),
            stopped_early: false,
            best_accuracy: initial_accuracy,
            best_round: 0,
        };
        let mut best = cfg.restore_best.then(|| self.clone());
        let mut prev = initial_accuracy;

        for round in 1..=cfg.max_rounds {
            self.train(train, cfg.lr, cfg.epochs_per_round);

            let acc = accuracy(self, eval)?;
            let mse = mean_squared_error(self, eval)?;
            info!(
                "round {round} (epoch {}): accuracy={acc:.4} mse={mse:.6}",
                round * cfg.epochs_per_round
            );
            report.rounds.push(RoundReport {
                round,
                epochs: round * cfg.epochs_per_round,
                accuracy: acc,
                mse,
            });

            if acc > report.best_accuracy {
                report.best_accuracy = acc;
                report.best_round = round;
                if let Some(slot) = best.as_mut() {
                    *slot = self.clone();
                }
            }
            if acc < prev {
                report.stopped_early = true;
                break;
            }
            prev = acc;
        }

        if report.stopped_early {
            if let Some(best) = best {
                info!("restoring weights from round {}", report.best_round);
                *self = best;
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> Dataset {
        let xs = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.2],
            vec![0.9, 1.0],
            vec![1.0, 0.8],
        ];
        Dataset::from_labels(&xs, &[0, 0, 1, 1], 2, 0.1, 0.9).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(FitConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad_lr = FitConfig {
            lr: 0.0,
            ..FitConfig::default()
        };
        assert!(bad_lr.validate().is_err());

        let nan_lr = FitConfig {
            lr: f64::NAN,
            ..FitConfig::default()
        };
        assert!(nan_lr.validate().is_err());

        let no_epochs = FitConfig {
            epochs_per_round: 0,
            ..FitConfig::default()
        };
        assert!(no_epochs.validate().is_err());
    }

    #[test]
    fn fit_reports_every_round_up_to_the_cap() {
        let data = separable();
        let mut net = Network::new_with_seed(&[2, 4, 2], 0).unwrap();
        let cfg = FitConfig {
            lr: 0.5,
            epochs_per_round: 50,
            max_rounds: 4,
            restore_best: false,
        };
        let report = net.fit(&data, None, cfg).unwrap();

        assert!(!report.rounds.is_empty());
        assert!(report.rounds.len() <= 4);
        for (i, r) in report.rounds.iter().enumerate() {
            assert_eq!(r.round, i + 1);
            assert_eq!(r.epochs, (i + 1) * 50);
        }
        if !report.stopped_early {
            assert_eq!(report.rounds.len(), 4);
        }
        assert!(report.best_accuracy >= report.initial_accuracy);
    }

    #[test]
    fn fit_rejects_mismatched_eval_set() {
        let data = separable();
        let eval = Dataset::from_rows(&[vec![0.0, 0.0, 0.0]], &[vec![0.0, 1.0]]).unwrap();
        let mut net = Network::new_with_seed(&[2, 2], 0).unwrap();
        assert!(net.fit(&data, Some(&eval), FitConfig::default()).is_err());
    }
}
