use common::{
    BENCH_K_N,
    group::Group,
    random::{random_scalar, random_scalars},
    ristretto::Ristretto,
    secret_sharing::{
        generate_shares, reconstruct_secret_exponent, verification_keys, verify_verification_keys,
    },
    utils::compute_lagrange_bases,
};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

fn add_mul(c: &mut Criterion) {
    let a1 = random_scalar::<Ristretto, _>(&mut rand::rng()).unwrap();
    let a2 = random_scalar::<Ristretto, _>(&mut rand::rng()).unwrap();
    let p = Ristretto::mul_base(&a1);
    c.bench_function("Scalar Add", |b| b.iter(|| Ristretto::scalar_add(&a1, &a2)));
    c.bench_function("Scalar Mul", |b| b.iter(|| Ristretto::scalar_mul(&a1, &a2)));
    c.bench_function("Point Mul", |b| b.iter(|| Ristretto::mul(&a2, &p)));
    c.bench_function("Hash to Scalar", |b| {
        b.iter(|| Ristretto::hash_to_scalar("bench", &[b"label", b"transcript"]))
    });
}

fn sharing(c: &mut Criterion) {
    for (k, n) in BENCH_K_N {
        let mut rng = rand::rng();
        let secret = random_scalar::<Ristretto, _>(&mut rng).unwrap();

        c.bench_function(&format!("(k: {}, n: {}) | Generate Shares", k, n), |b| {
            b.iter_batched(
                rand::rng,
                |mut rng| generate_shares::<Ristretto, _>(&mut rng, n, k, &secret),
                BatchSize::PerIteration,
            )
        });

        let (f, shares) = generate_shares::<Ristretto, _>(&mut rng, n, k, &secret).unwrap();
        let commitments = f.commit();
        let vks = verification_keys::<Ristretto>(&shares);

        c.bench_function(&format!("(k: {}, n: {}) | Verification Keys", k, n), |b| {
            b.iter(|| verification_keys::<Ristretto>(&shares))
        });

        c.bench_function(
            &format!("(k: {}, n: {}) | Feldman Check All Keys", k, n),
            |b| {
                b.iter(|| {
                    assert!(verify_verification_keys::<Ristretto>(&commitments, &vks).is_empty())
                })
            },
        );

        let qualified_set: Vec<usize> = (1..=k).collect();
        c.bench_function(&format!("(k: {}, n: {}) | Lagrange Bases", k, n), |b| {
            b.iter(|| compute_lagrange_bases::<Ristretto>(&qualified_set).unwrap())
        });

        let points: Vec<_> = qualified_set.iter().map(|i| (*i, vks[*i - 1])).collect();
        c.bench_function(
            &format!("(k: {}, n: {}) | Interpolate in Exponent", k, n),
            |b| b.iter(|| reconstruct_secret_exponent::<Ristretto>(&points).unwrap()),
        );
    }
}

fn sampling(c: &mut Criterion) {
    let n = 256;
    c.bench_function(&format!("Scalar Sampling: n = {}", n), |b| {
        b.iter_batched(
            rand::rng,
            |mut rng| random_scalars::<Ristretto, _>(&mut rng, n).unwrap(),
            BatchSize::PerIteration,
        )
    });
}

criterion_group!(benches, add_mul, sharing, sampling);
criterion_main!(benches);
