use std::sync::Arc;

use chrono::Utc;

use crate::data::PatternSource;
use crate::graph::Network;
use crate::metrics::Metrics;
use crate::task::{ProgressListener, State, Task, TaskControl};
use crate::TrainError;

/* Supervised learning trainer: iterates the training source for a number of
 * epochs, pushing every pattern forward and backpropagating the
 * expected-minus-actual deltas. Progress goes to the listener on two
 * tracks, 0 for the whole training and 1 for the current epoch.
 * Cancellation is polled between patterns and between epochs. */
pub struct SLTrainer {
    network: Option<Network>,
    source_train: Option<Box<dyn PatternSource>>,
    source_test: Option<Box<dyn PatternSource>>,
    epochs: usize,
    listener: Option<Box<dyn ProgressListener>>,
    control: Arc<TaskControl>,
}

impl Default for SLTrainer {
    fn default() -> Self {
        SLTrainer {
            network: None,
            source_train: None,
            source_test: None,
            epochs: 100,
            listener: None,
            control: TaskControl::new(),
        }
    }
}

impl SLTrainer {
    pub fn new() -> Self {
        SLTrainer::default()
    }

    pub fn set_network(&mut self, network: Network) {
        self.network = Some(network);
    }

    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    pub fn network_mut(&mut self) -> Option<&mut Network> {
        self.network.as_mut()
    }

    pub fn take_network(&mut self) -> Option<Network> {
        self.network.take()
    }

    pub fn set_source_train(&mut self, source: Box<dyn PatternSource>) {
        self.source_train = Some(source);
    }

    pub fn set_source_test(&mut self, source: Box<dyn PatternSource>) {
        self.source_test = Some(source);
    }

    pub fn set_epochs(&mut self, epochs: usize) {
        self.epochs = epochs;
    }

    pub fn set_listener(&mut self, listener: Box<dyn ProgressListener>) {
        self.listener = Some(listener);
    }

    /* Error statistics of the current network against a pattern source.
     * Forward passes only; the run is cancellable like training. */
    pub fn metrics(&mut self, label: &str, source: &mut dyn PatternSource) -> Result<Metrics, TrainError> {
        let control = Arc::clone(&self.control);
        let listener = self.listener.as_deref();
        let network = self.network.as_mut().ok_or(TrainError::MissingNetwork)?;
        Ok(metrics_over(network, &control, listener, label, source))
    }

    /* Same, against the configured test source. */
    pub fn test_metrics(&mut self, label: &str) -> Result<Option<Metrics>, TrainError> {
        let control = Arc::clone(&self.control);
        let listener = self.listener.as_deref();
        let network = self.network.as_mut().ok_or(TrainError::MissingNetwork)?;
        let source = match self.source_test.as_mut() {
            Some(source) => source,
            None => return Ok(None),
        };
        Ok(Some(metrics_over(network, &control, listener, label, source.as_mut())))
    }
}

impl Task for SLTrainer {
    fn control(&self) -> &Arc<TaskControl> {
        &self.control
    }

    fn state_changed(&self, state: State) {
        notify(self.listener.as_deref(), |l| l.state(state));
    }

    fn execute(&mut self) -> Result<(), TrainError> {
        if self.network.is_none() {
            return Err(TrainError::MissingNetwork);
        }
        if self.source_train.is_none() {
            return Err(TrainError::MissingTrainingSource);
        }

        let epochs = self.epochs;
        let control = Arc::clone(&self.control);
        let listener = self.listener.as_deref();
        let network = self.network.as_mut().expect("Should have a network");
        let source = self.source_train.as_mut().expect("Should have a training source");

        notify(listener, |l| l.start());

        network.initialize();

        let total_work = (source.size() * epochs) as f64;
        let mut total_done = 0_usize;
        let train_start = Utc::now().naive_utc();

        notify(listener, |l| l.reset(0));
        'epochs: for epoch in 0..epochs {
            if control.should_cancel() {
                control.set_state(State::Cancelled);
                notify(listener, |l| l.state(State::Cancelled));
                break 'epochs;
            }

            let epoch_start = Utc::now().naive_utc();
            let epoch_work = source.size() as f64;
            let mut epoch_done = 0_usize;
            notify(listener, |l| l.reset(1));
            source.reset();

            while source.has_next() {
                if control.should_cancel() {
                    control.set_state(State::Cancelled);
                    notify(listener, |l| l.state(State::Cancelled));
                    break 'epochs;
                }

                let pattern = source.next().expect("Source should produce a next pattern");
                network.forward(pattern.input_values());
                let network_output = network.output_values();
                let deltas: Vec<Vec<f64>> = pattern
                    .output_values()
                    .iter()
                    .zip(network_output.iter())
                    .map(|(expected, actual)| numerics::subtract(expected, actual))
                    .collect();
                network.backward(&deltas);

                total_done += 1;
                epoch_done += 1;

                let total_percent = total_done as f64 * 100.0 / total_work;
                notify(listener, |l| {
                    l.message(0, &format!("Total work {} of {} ({:.2}%)", total_done, total_work as usize, total_percent));
                    l.progress(0, 1.0, total_work);
                });
                let epoch_percent = epoch_done as f64 * 100.0 / epoch_work;
                notify(listener, |l| {
                    l.message(1, &format!("Epoch work {} of {} ({:.2}%)", epoch_done, epoch_work as usize, epoch_percent));
                    l.progress(1, 1.0, epoch_work);
                });
            }

            let epoch_end = Utc::now().naive_utc();
            trace!(
                "epoch {}/{} finished in {}s",
                epoch + 1,
                epochs,
                epoch_end.signed_duration_since(epoch_start).num_seconds()
            );
        }

        let train_end = Utc::now().naive_utc();
        info!(
            "training finished in {}s, {} patterns processed",
            train_end.signed_duration_since(train_start).num_seconds(),
            total_done
        );

        notify(listener, |l| l.end());
        Ok(())
    }
}

fn notify(listener: Option<&dyn ProgressListener>, action: impl FnOnce(&dyn ProgressListener)) {
    if let Some(listener) = listener {
        action(listener);
    }
}

fn metrics_over(
    network: &mut Network,
    control: &TaskControl,
    listener: Option<&dyn ProgressListener>,
    label: &str,
    source: &mut dyn PatternSource,
) -> Metrics {
    let lengths: Vec<usize> = network
        .output_edges()
        .iter()
        .map(|&edge| network.edge(edge).size())
        .collect();
    let mut metrics = Metrics::new(label, &lengths);

    source.reset();
    while source.has_next() {
        if control.should_cancel() {
            control.set_state(State::Cancelled);
            notify(listener, |l| l.state(State::Cancelled));
            break;
        }
        let pattern = source.next().expect("Source should produce a next pattern");
        network.forward(pattern.input_values());
        let network_output = network.output_values();
        metrics.compute(pattern.output_values(), &network_output);
    }
    metrics
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::SLTrainer;
    use crate::af::Activation;
    use crate::data::{ListPatternSource, Pattern, PatternSource};
    use crate::graph::{CellFactory, Network};
    use crate::task::{ProgressListener, State, Task, TaskControl};

    /* Separable single-input task: positive triggers go to 1, negative
     * to 0. A lone sigmoid weights cell can drive the error down to zero. */
    fn sign_source() -> ListPatternSource {
        let mut source = ListPatternSource::default();
        source.add(Pattern::new(vec![vec![1.0]], vec![vec![1.0]]));
        source.add(Pattern::new(vec![vec![-1.0]], vec![vec![0.0]]));
        source.add(Pattern::new(vec![vec![0.5]], vec![vec![1.0]]));
        source.add(Pattern::new(vec![vec![-0.5]], vec![vec![0.0]]));
        source
    }

    #[test]
    fn test_missing_network_fails() {
        let mut trainer = SLTrainer::new();
        trainer.set_source_train(Box::new(sign_source()));
        assert_eq!(trainer.run(), State::Failed);
    }

    #[test]
    fn test_missing_source_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut network = Network::new();
        CellFactory::dense(&mut network, &mut rng, 2, 1, Activation::Sigmoid);

        let mut trainer = SLTrainer::new();
        trainer.set_network(network);
        assert_eq!(trainer.run(), State::Failed);
    }

    #[test]
    fn test_zero_epochs_touches_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut network = Network::new();
        let cell = CellFactory::dense(&mut network, &mut rng, 1, 1, Activation::Sigmoid);
        let weights_id = network
            .cell(cell)
            .nodes()
            .iter()
            .copied()
            .find(|&id| network.node(id).as_weights().is_some())
            .expect("Cell should contain a weights node");
        let before = network.node(weights_id).as_weights().unwrap().weights().clone();

        let mut trainer = SLTrainer::new();
        trainer.set_network(network);
        trainer.set_source_train(Box::new(sign_source()));
        trainer.set_epochs(0);

        assert_eq!(trainer.run(), State::Succeeded);
        let network = trainer.network().expect("Trainer should keep the network");
        assert_eq!(network.node(weights_id).as_weights().unwrap().weights(), &before);
    }

    #[test]
    fn test_learns_the_sign_task() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut network = Network::new();
        let cell = CellFactory::dense(&mut network, &mut rng, 1, 1, Activation::Sigmoid);
        let weights_id = network
            .cell(cell)
            .nodes()
            .iter()
            .copied()
            .find(|&id| network.node(id).as_weights().is_some())
            .expect("Cell should contain a weights node");
        network
            .node_mut(weights_id)
            .as_weights_mut()
            .unwrap()
            .set_learning_rate(0.5);

        let mut trainer = SLTrainer::new();
        trainer.set_network(network);
        trainer.set_source_train(Box::new(sign_source()));
        trainer.set_epochs(2000);

        assert_eq!(trainer.run(), State::Succeeded);

        let mut source = sign_source();
        let metrics = trainer
            .metrics("train", &mut source)
            .expect("Trainer should compute metrics");
        assert_eq!(metrics.calls(), 4.0);
        assert!(metrics.error_avg() < 0.2, "error average was {}", metrics.error_avg());

        assert!(trainer.test_metrics("test").unwrap().is_none());
    }

    /* Pattern source that counts how many patterns were handed out. */
    struct CountingSource {
        inner: ListPatternSource,
        served: Arc<AtomicUsize>,
    }

    impl PatternSource for CountingSource {
        fn reset(&mut self) {
            self.inner.reset();
        }
        fn has_next(&self) -> bool {
            self.inner.has_next()
        }
        fn next(&mut self) -> Option<Pattern> {
            let pattern = self.inner.next();
            if pattern.is_some() {
                self.served.fetch_add(1, Ordering::SeqCst);
            }
            pattern
        }
        fn size(&self) -> usize {
            self.inner.size()
        }
    }

    /* Listener that requests cancellation after a fixed number of processed
     * patterns. */
    struct CancellingListener {
        control: Arc<TaskControl>,
        seen: AtomicUsize,
        cancel_at: usize,
    }

    impl ProgressListener for CancellingListener {
        fn start(&self) {}
        fn end(&self) {}
        fn message(&self, _index: usize, _message: &str) {}
        fn progress(&self, index: usize, _work_increase: f64, _total_work: f64) {
            if index == 0 && self.seen.fetch_add(1, Ordering::SeqCst) + 1 == self.cancel_at {
                self.control.request_cancel();
            }
        }
        fn reset(&self, _index: usize) {}
        fn state(&self, _state: State) {}
        fn indeterminate(&self, _index: usize, _indeterminate: bool) {}
    }

    #[test]
    fn test_cancel_mid_epoch() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut network = Network::new();
        CellFactory::dense(&mut network, &mut rng, 1, 1, Activation::Sigmoid);

        let mut inner = ListPatternSource::default();
        for i in 0..10 {
            inner.add(Pattern::new(vec![vec![i as f64 / 10.0]], vec![vec![1.0]]));
        }
        let served = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            inner,
            served: Arc::clone(&served),
        };

        let mut trainer = SLTrainer::new();
        trainer.set_network(network);
        trainer.set_source_train(Box::new(source));
        trainer.set_epochs(5);

        /* Stop after the 7th pattern of the third epoch. */
        let cancel_at = 2 * 10 + 7;
        let listener = CancellingListener {
            control: Arc::clone(trainer.control()),
            seen: AtomicUsize::new(0),
            cancel_at,
        };
        trainer.set_listener(Box::new(listener));

        assert_eq!(trainer.run(), State::Cancelled);
        assert_eq!(served.load(Ordering::SeqCst), cancel_at);
    }
}
