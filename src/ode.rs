//! Fixed-step integration of small systems of ordinary differential equations.

/// Classical fourth order Runge-Kutta integrator with a fixed step.
///
/// The right hand side is any closure `f(t, x) -> dx/dt`.  It takes `&mut` access to its
/// environment, so a model may record fluxes while it is being integrated.  Every step calls `f`
/// exactly four times, at `t`, `t + dt/2`, `t + dt/2` and `t + dt`, in that order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rk4 {
    dt: f64,
}

impl Default for Rk4 {
    fn default() -> Self {
        Rk4 { dt: 1.0 }
    }
}

impl Rk4 {
    /// Integrator with step size `dt`.
    pub fn new(dt: f64) -> Self {
        Rk4 { dt }
    }

    /// Step size.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Advance state `x` at time `t` by one step.
    pub fn step<F, const N: usize>(&self, f: &mut F, t: f64, x: &[f64; N]) -> [f64; N]
    where
        F: FnMut(f64, &[f64; N]) -> [f64; N],
    {
        let h = self.dt;
        let k1 = scale(h, &f(t, x));
        let k2 = scale(h, &f(t + 0.5 * h, &add(x, 0.5, &k1)));
        let k3 = scale(h, &f(t + 0.5 * h, &add(x, 0.5, &k2)));
        let k4 = scale(h, &f(t + h, &add(x, 1.0, &k3)));

        let mut next = *x;
        for i in 0..N {
            next[i] = x[i] + (k1[i] + 2.0 * (k2[i] + k3[i]) + k4[i]) / 6.0;
        }
        next
    }

    /// Integrate from `x0` at time zero through `steps` steps, returning the final state.
    pub fn solve<F, const N: usize>(&self, mut f: F, x0: [f64; N], steps: usize) -> [f64; N]
    where
        F: FnMut(f64, &[f64; N]) -> [f64; N],
    {
        let mut x = x0;
        for i in 0..steps {
            x = self.step(&mut f, i as f64 * self.dt, &x);
        }
        x
    }
}

// x + a * k
fn add<const N: usize>(x: &[f64; N], a: f64, k: &[f64; N]) -> [f64; N] {
    let mut out = *x;
    for i in 0..N {
        out[i] += a * k[i];
    }
    out
}

fn scale<const N: usize>(a: f64, k: &[f64; N]) -> [f64; N] {
    let mut out = *k;
    for v in out.iter_mut() {
        *v *= a;
    }
    out
}
