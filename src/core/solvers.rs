use roots::{find_root_brent, SimpleConvergency};
use tracing::trace;

/// Finds the root of `func` bracketed by `[a, b]`, where `func(a)` and `func(b)` have
/// opposite signs (or one of them is zero).
///
/// Named after scipy's `bisect` but backed by the Brent solver, which converges much
/// faster on the smooth curves used here.
pub(crate) fn bisect(func: impl Fn(f64) -> f64, a: f64, b: f64, xtol: f64) -> anyhow::Result<f64> {
    let mut convergency = SimpleConvergency {
        eps: xtol,
        max_iter: 100, // default for bisect in scipy
    };

    let root = find_root_brent::<f64, _>(a, b, &func, &mut convergency)
        .map_err(|e| anyhow::anyhow!("no root found in [{a}, {b}]: {e}"))?;
    trace!(a, b, root, "bracketed root found");

    Ok(root)
}
