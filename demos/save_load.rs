use rust_fnn::{Dataset, Network};

fn main() -> rust_fnn::Result<()> {
    let xs = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
    // Logical AND.
    let train = Dataset::from_labels(&xs, &[0, 0, 0, 1], 2, 0.1, 0.9)?;

    let mut net = Network::new_with_seed(&[2, 2], 0)?;
    net.train(&train, 0.5, 2_000);

    let path = std::env::temp_dir().join("rust_fnn_and.bb");
    net.save(&path)?;

    let mut loaded = Network::load(&path)?;
    for x in &xs {
        let a = net.predict_one(x).max_index();
        let b = loaded.predict_one(x).max_index();
        println!("x={x:?} original={a} loaded={b}");
    }
    println!("saved and loaded model: {}", path.display());
    Ok(())
}
