use rust_fnn::{accuracy, mean_squared_error, squared_distance, Dataset, FitConfig, Network};

// Three clusters at the corners of a triangle; each class is linearly separable from the
// other two.
fn triangle() -> Dataset {
    let xs = vec![
        vec![0.0, 0.0],
        vec![0.1, 0.0],
        vec![0.0, 0.1],
        vec![1.0, 0.0],
        vec![0.9, 0.0],
        vec![1.0, 0.1],
        vec![0.5, 1.0],
        vec![0.4, 0.9],
        vec![0.6, 0.9],
    ];
    let labels = [0, 0, 0, 1, 1, 1, 2, 2, 2];
    Dataset::from_labels(&xs, &labels, 3, 0.1, 0.9).unwrap()
}

#[test]
fn single_layer_learns_separable_classes() {
    let data = triangle();
    let mut net = Network::new_with_seed(&[2, 3], 1).unwrap();

    net.train(&data, 0.5, 2_000);
    assert_eq!(accuracy(&mut net, &data).unwrap(), 1.0);
}

#[test]
fn hidden_layer_network_reduces_error() {
    let data = triangle();
    let mut net = Network::new_with_seed(&[2, 6, 3], 2).unwrap();

    let before = mean_squared_error(&mut net, &data).unwrap();
    net.train(&data, 0.5, 2_000);
    let after = mean_squared_error(&mut net, &data).unwrap();
    assert!(after < 0.5 * before, "mse before={before} after={after}");
}

#[test]
fn zero_epochs_leaves_weights_alone() {
    let data = triangle();
    let mut net = Network::new_with_seed(&[2, 3], 3).unwrap();
    let before = net.clone();
    net.train(&data, 0.5, 0);
    for (a, b) in before.layers().iter().zip(net.layers()) {
        assert_eq!(a.weight(), b.weight());
    }
}

#[test]
fn train_is_train_one_over_every_sample_in_order() {
    let data = triangle();
    let mut a = Network::new_with_seed(&[2, 4, 3], 4).unwrap();
    let mut b = a.clone();

    a.train(&data, 0.1, 2);
    for _ in 0..2 {
        for (x, t) in data.iter() {
            b.train_one(x.as_slice(), t.as_slice(), 0.1);
        }
    }
    for (la, lb) in a.layers().iter().zip(b.layers()) {
        assert_eq!(la.weight(), lb.weight());
    }
}

#[test]
fn repeated_single_sample_error_is_non_increasing() {
    let mut net = Network::new_with_seed(&[4, 3], 8).unwrap();
    let x = [0.2, 0.4, -0.1, 0.9];
    let t = [0.9, 0.1, 0.1];

    let mut prev = squared_distance(net.predict_one(&x).as_slice(), &t);
    for _ in 0..50 {
        net.train_one(&x, &t, 0.01);
        let err = squared_distance(net.predict_one(&x).as_slice(), &t);
        assert!(err <= prev, "error increased: {prev} -> {err}");
        prev = err;
    }
}

#[test]
fn fit_with_restore_best_never_ends_below_best() {
    let data = triangle();
    let mut net = Network::new_with_seed(&[2, 5, 3], 6).unwrap();
    let report = net
        .fit(
            &data,
            None,
            FitConfig {
                lr: 0.5,
                epochs_per_round: 200,
                max_rounds: 10,
                restore_best: true,
            },
        )
        .unwrap();

    let final_acc = accuracy(&mut net, &data).unwrap();
    if report.stopped_early {
        assert_eq!(final_acc, report.best_accuracy);
    } else {
        assert_eq!(final_acc, report.rounds.last().unwrap().accuracy);
    }
}
