use rust_fnn::{accuracy, Dataset, FitConfig, Network};

fn main() -> rust_fnn::Result<()> {
    // Classic XOR, one-hot encoded over two classes.
    let xs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let train = Dataset::from_labels(&xs, &[0, 1, 1, 0], 2, 0.1, 0.9)?;

    // 2 -> 4 -> 2 network.
    let mut net = Network::new_with_seed(&[2, 4, 2], 0)?;

    let report = net.fit(
        &train,
        None,
        FitConfig {
            lr: 0.5,
            epochs_per_round: 500,
            max_rounds: 20,
            restore_best: true,
        },
    )?;

    for r in &report.rounds {
        println!(
            "epoch {:>5}: accuracy={:.2} mse={:.5}",
            r.epochs, r.accuracy, r.mse
        );
    }
    println!("final accuracy={:.2}", accuracy(&mut net, &train)?);

    for x in &xs {
        let y = net.predict_one(x);
        println!("x={x:?} y={:?} class={}", y.as_slice(), y.max_index());
    }

    Ok(())
}
