fn main() -> rust_fnn::Result<()> {
    use rust_fnn::Network;

    let net = Network::new_with_seed(&[3, 4, 2], 0)?;

    let path = std::env::temp_dir().join("rust_fnn_model.json");
    net.save_json(&path)?;

    let loaded = Network::load_json(&path)?;
    println!(
        "saved and loaded model {:?}: {}",
        loaded.sizes(),
        path.display()
    );
    Ok(())
}
