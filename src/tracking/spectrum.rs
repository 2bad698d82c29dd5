use ndarray::{Array2, Zip};
use std::f64::consts::PI;

/// Complex 2-D spectrum stored as separate real and imaginary planes
#[derive(Debug, Clone)]
pub struct Spectrum {
    pub re: Array2<f32>,
    pub im: Array2<f32>,
}

impl Spectrum {
    /// Element-wise `self * conj(other)`
    pub fn mul_conj(&self, other: &Spectrum) -> Spectrum {
        Spectrum {
            re: &self.re * &other.re + &self.im * &other.im,
            im: &self.im * &other.re - &self.re * &other.im,
        }
    }

    /// Element-wise `self * other`
    pub fn mul(&self, other: &Spectrum) -> Spectrum {
        Spectrum {
            re: &self.re * &other.re - &self.im * &other.im,
            im: &self.re * &other.im + &self.im * &other.re,
        }
    }

    /// Element-wise `self / (other + lambda)`
    pub fn div_regularized(&self, other: &Spectrum, lambda: f32) -> Spectrum {
        let mut re = Array2::zeros(self.re.raw_dim());
        let mut im = Array2::zeros(self.re.raw_dim());

        Zip::from(&mut re)
            .and(&mut im)
            .and(&self.re)
            .and(&self.im)
            .and(&other.re)
            .and(&other.im)
            .for_each(|re, im, &ar, &ai, &br, &bi| {
                let br = br + lambda;
                let norm = br * br + bi * bi;
                *re = (ar * br + ai * bi) / norm;
                *im = (ai * br - ar * bi) / norm;
            });

        Spectrum { re, im }
    }

    /// Linear interpolation towards `other`: `(1 - factor) * self + factor * other`
    pub fn blend(&mut self, other: &Spectrum, factor: f32) {
        self.re *= 1.0 - factor;
        self.re.scaled_add(factor, &other.re);
        self.im *= 1.0 - factor;
        self.im.scaled_add(factor, &other.im);
    }
}

/// Dense 2-D discrete Fourier transform for a fixed patch shape
///
/// Transforms are evaluated as `W_rows · x · W_cols` with precomputed
/// twiddle matrices, which is fast enough for template-sized patches.
pub struct Dft {
    rows_cos: Array2<f32>,
    rows_sin: Array2<f32>,
    cols_cos: Array2<f32>,
    cols_sin: Array2<f32>,
    norm: f32,
}

impl Dft {
    pub fn new(rows: usize, cols: usize) -> Self {
        let (rows_cos, rows_sin) = twiddles(rows);
        let (cols_cos, cols_sin) = twiddles(cols);

        Self {
            rows_cos,
            rows_sin,
            cols_cos,
            cols_sin,
            norm: 1.0 / (rows * cols) as f32,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows_cos.nrows(), self.cols_cos.nrows())
    }

    /// Forward transform of a real patch
    pub fn forward(&self, x: &Array2<f32>) -> Spectrum {
        // (C - iS) x
        let tr = self.rows_cos.dot(x);
        let ti = -self.rows_sin.dot(x);

        // (tr + i ti)(C - iS)
        Spectrum {
            re: tr.dot(&self.cols_cos) + ti.dot(&self.cols_sin),
            im: ti.dot(&self.cols_cos) - tr.dot(&self.cols_sin),
        }
    }

    /// Inverse transform, keeping only the real part
    pub fn inverse_real(&self, spectrum: &Spectrum) -> Array2<f32> {
        // (C + iS)(re + i im)
        let tr = self.rows_cos.dot(&spectrum.re) - self.rows_sin.dot(&spectrum.im);
        let ti = self.rows_cos.dot(&spectrum.im) + self.rows_sin.dot(&spectrum.re);

        // Re((tr + i ti)(C + iS))
        let mut out = tr.dot(&self.cols_cos) - ti.dot(&self.cols_sin);
        out *= self.norm;
        out
    }
}

fn twiddles(n: usize) -> (Array2<f32>, Array2<f32>) {
    let angle = |k: usize, j: usize| 2.0 * PI * ((k * j) % n) as f64 / n as f64;

    (
        Array2::from_shape_fn((n, n), |(k, j)| angle(k, j).cos() as f32),
        Array2::from_shape_fn((n, n), |(k, j)| angle(k, j).sin() as f32),
    )
}

/// Swap quadrants so that the zero-lag element moves to `(rows / 2, cols / 2)`
pub fn fftshift(x: &Array2<f32>) -> Array2<f32> {
    let (rows, cols) = x.dim();
    let (hr, hc) = (rows / 2, cols / 2);

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        x[[(r + rows - hr) % rows, (c + cols - hc) % cols]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Array2<f32>, b: &Array2<f32>, tol: f32) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tol, "{} != {}", x, y);
        }
    }

    #[test]
    fn test_forward_inverse() {
        let x = Array2::from_shape_fn((6, 8), |(r, c)| ((r * 7 + c * 3) % 5) as f32 - 2.0);
        let dft = Dft::new(6, 8);
        assert_eq!(dft.shape(), (6, 8));

        let back = dft.inverse_real(&dft.forward(&x));
        assert_close(&back, &x, 1e-4);
    }

    #[test]
    fn test_dc_component() {
        let x = Array2::from_elem((4, 4), 2.0f32);
        let spectrum = Dft::new(4, 4).forward(&x);

        assert!((spectrum.re[[0, 0]] - 32.0).abs() < 1e-4);
        for ((r, c), v) in spectrum.re.indexed_iter() {
            if (r, c) != (0, 0) {
                assert!(v.abs() < 1e-4);
            }
        }
        assert!(spectrum.im.iter().all(|v| v.abs() < 1e-4));
    }

    #[test]
    fn test_correlation_peak_at_shift() {
        // x is z circularly shifted by (1, 2); the correlation peaks at that lag
        let z = Array2::from_shape_fn((8, 8), |(r, c)| if r == 3 && c == 2 { 1.0 } else { 0.0 });
        let x = Array2::from_shape_fn((8, 8), |(r, c)| if r == 4 && c == 4 { 1.0 } else { 0.0 });
        let dft = Dft::new(8, 8);

        let corr = dft.inverse_real(&dft.forward(&x).mul_conj(&dft.forward(&z)));
        assert!((corr[[1, 2]] - 1.0).abs() < 1e-4);

        let shifted = fftshift(&corr);
        assert!((shifted[[5, 6]] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_div_regularized() {
        let a = Spectrum {
            re: Array2::from_elem((1, 1), 1.0),
            im: Array2::from_elem((1, 1), 1.0),
        };
        let b = Spectrum {
            re: Array2::from_elem((1, 1), 1.0),
            im: Array2::from_elem((1, 1), -1.0),
        };

        // (1 + i) / (1 - i) = i
        let q = a.div_regularized(&b, 0.0);
        assert!(q.re[[0, 0]].abs() < 1e-6);
        assert!((q.im[[0, 0]] - 1.0).abs() < 1e-6);

        let p = q.mul(&b);
        assert!((p.re[[0, 0]] - 1.0).abs() < 1e-6);
        assert!((p.im[[0, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_blend() {
        let mut a = Spectrum {
            re: Array2::from_elem((2, 2), 0.0),
            im: Array2::from_elem((2, 2), 1.0),
        };
        let b = Spectrum {
            re: Array2::from_elem((2, 2), 1.0),
            im: Array2::from_elem((2, 2), 0.0),
        };

        a.blend(&b, 0.25);
        assert!(a.re.iter().all(|v| (v - 0.25).abs() < 1e-6));
        assert!(a.im.iter().all(|v| (v - 0.75).abs() < 1e-6));
    }
}
