use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const ENV_NAME: &str = "SMTRIE_LOG";

/// Install a test subscriber once per test binary. Controlled by `SMTRIE_LOG`.
pub fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(ENV_NAME)
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// The eight single-letter items `A` through `H`.
#[allow(dead_code)]
pub fn letters() -> Vec<Vec<u8>> {
    (b'A'..=b'H').map(|c| vec![c]).collect()
}

/// Items of varying length, reproducible from the seed.
#[allow(dead_code)]
pub fn random_items(seed: u64, count: usize) -> Vec<Vec<u8>> {
    use rand::{Rng as _, SeedableRng as _};
    let mut s = [0; 16];
    s[0..8].copy_from_slice(&seed.to_le_bytes());
    let mut rng = rand_pcg::Lcg64Xsh32::from_seed(s);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..64);
            (0..len).map(|_| rng.gen()).collect()
        })
        .collect()
}
