use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rust_fnn::Network;

fn fnn_predict_bench(c: &mut Criterion) {
    let mut net = Network::new_with_seed(&[784, 300, 10], 0).unwrap();
    let input = vec![0.1_f64; net.input_dim()];

    c.bench_function("fnn_predict_784_300_10", |b| {
        b.iter(|| {
            net.set_input(black_box(&input));
            net.predict();
            black_box(net.output());
        })
    });
}

fn fnn_train_one_bench(c: &mut Criterion) {
    let mut net = Network::new_with_seed(&[784, 300, 10], 0).unwrap();
    let input = vec![0.1_f64; net.input_dim()];
    let mut target = vec![0.1_f64; net.output_dim()];
    target[3] = 0.9;

    c.bench_function("fnn_train_one_784_300_10", |b| {
        b.iter(|| {
            net.train_one(black_box(&input), black_box(&target), 0.01);
        })
    });
}

criterion_group!(benches, fnn_predict_bench, fnn_train_one_bench);
criterion_main!(benches);
