use super::features::{gaussian_peak, hann_window, intensity_plane, sample_window};
use super::spectrum::{fftshift, Dft, Spectrum};
use super::types::Tracker;
use crate::geometry::Region;
use anyhow::{bail, Result};
use image::RgbImage;
use ndarray::Array2;

/// Kernelized correlation filter parameters
#[derive(Debug, Clone)]
pub struct KcfConfig {
    /// Longest side of the resampled search window, in template pixels
    pub template_size: u32,
    /// Search window size relative to the target
    pub padding: f32,
    /// Ridge regularization
    pub lambda: f32,
    /// Gaussian kernel bandwidth
    pub sigma: f32,
    /// Regression target bandwidth, relative to the target size
    pub output_sigma_factor: f32,
    /// Model adaptation rate
    pub interp_factor: f32,
    /// Ratio between tested scales; 1.0 disables scale search
    pub scale_step: f32,
    /// Penalty applied to responses at a changed scale
    pub scale_weight: f32,
}

impl Default for KcfConfig {
    fn default() -> Self {
        Self {
            template_size: 96,
            padding: 2.5,
            lambda: 0.0001,
            sigma: 0.2,
            output_sigma_factor: 0.125,
            interp_factor: 0.075,
            scale_step: 1.05,
            scale_weight: 0.95,
        }
    }
}

/// KCF tracker over grayscale intensity features
///
/// The filter is learned in the Fourier domain from a Hann-windowed patch
/// around the target. Each update correlates the learned template with
/// patches at three scales, moves to the strongest response and blends
/// the new appearance into the model.
pub struct KcfTracker {
    config: KcfConfig,
    state: Option<FilterState>,
}

struct FilterState {
    roi: Region,
    /// Image pixels per template pixel
    scale: f32,
    dft: Dft,
    hann: Array2<f32>,
    yf: Spectrum,
    alphaf: Spectrum,
    template: Array2<f32>,
}

impl KcfTracker {
    pub fn new(config: KcfConfig) -> Self {
        tracing::debug!("Creating KCF tracker with {:?}", config);
        Self {
            config,
            state: None,
        }
    }

    /// Features of the search window around the current region, with the
    /// window scaled by `scale_adjust`
    fn features(&self, state: &FilterState, plane: &Array2<f32>, scale_adjust: f32) -> Array2<f32> {
        let (rows, cols) = state.dft.shape();
        let extent = (
            scale_adjust * state.scale * cols as f32,
            scale_adjust * state.scale * rows as f32,
        );

        sample_window(plane, state.roi.center(), extent, (rows, cols)) * &state.hann
    }

    fn gaussian_correlation(&self, dft: &Dft, x1: &Array2<f32>, x2: &Array2<f32>) -> Array2<f32> {
        let (rows, cols) = dft.shape();
        let c = fftshift(&dft.inverse_real(&dft.forward(x1).mul_conj(&dft.forward(x2))));

        let xx: f32 = x1.iter().map(|v| v * v).sum();
        let yy: f32 = x2.iter().map(|v| v * v).sum();
        let n = (rows * cols) as f32;
        let sigma2 = self.config.sigma * self.config.sigma;

        c.mapv(|c| {
            let d = (xx + yy - 2.0 * c).max(0.0) / n;
            (-d / sigma2).exp()
        })
    }

    /// Displacement (in template pixels) of the response peak from the
    /// window center, and the peak value
    fn detect(&self, state: &FilterState, x: &Array2<f32>) -> ((f32, f32), f32) {
        let k = self.gaussian_correlation(&state.dft, x, &state.template);
        let response = state
            .dft
            .inverse_real(&state.alphaf.mul(&state.dft.forward(&k)));

        let (rows, cols) = response.dim();
        let mut best = (0, 0);
        let mut peak = f32::NEG_INFINITY;
        for ((r, c), &v) in response.indexed_iter() {
            if v > peak {
                peak = v;
                best = (r, c);
            }
        }

        let (r, c) = best;
        let mut px = c as f32;
        let mut py = r as f32;

        if c > 0 && c < cols - 1 {
            px += sub_pixel_peak(response[[r, c - 1]], peak, response[[r, c + 1]]);
        }
        if r > 0 && r < rows - 1 {
            py += sub_pixel_peak(response[[r - 1, c]], peak, response[[r + 1, c]]);
        }

        ((px - (cols / 2) as f32, py - (rows / 2) as f32), peak)
    }

    fn train(&self, state: &mut FilterState, x: Array2<f32>, factor: f32) {
        let k = self.gaussian_correlation(&state.dft, &x, &x);
        let alphaf = state
            .yf
            .div_regularized(&state.dft.forward(&k), self.config.lambda);

        state.template *= 1.0 - factor;
        state.template.scaled_add(factor, &x);
        state.alphaf.blend(&alphaf, factor);
    }
}

impl Tracker for KcfTracker {
    fn init(&mut self, seed: Region, frame: &RgbImage) -> Result<()> {
        let _span = tracing::debug_span!("kcf_init").entered();
        self.state = None;

        if frame.width() == 0 || frame.height() == 0 {
            bail!("KCF tracker cannot be initialized on an empty frame");
        }

        // Degenerate seeds still get a one-pixel target
        let roi = Region::new(seed.x, seed.y, seed.width.max(1.0), seed.height.max(1.0));

        let padded_w = roi.width * self.config.padding;
        let padded_h = roi.height * self.config.padding;

        let scale = if self.config.template_size > 1 {
            padded_w.max(padded_h) / self.config.template_size as f32
        } else {
            1.0
        };

        let cols = even_size(padded_w / scale);
        let rows = even_size(padded_h / scale);

        tracing::debug!(
            "KCF init at ({:.1}, {:.1}, {:.1}, {:.1}), template {}x{}",
            roi.x,
            roi.y,
            roi.width,
            roi.height,
            cols,
            rows
        );

        let output_sigma =
            ((rows * cols) as f32).sqrt() / self.config.padding * self.config.output_sigma_factor;
        let dft = Dft::new(rows, cols);
        let yf = dft.forward(&gaussian_peak(rows, cols, output_sigma));
        let zeros = Spectrum {
            re: Array2::zeros((rows, cols)),
            im: Array2::zeros((rows, cols)),
        };

        let mut state = FilterState {
            roi,
            scale,
            dft,
            hann: hann_window(rows, cols),
            yf,
            alphaf: zeros,
            template: Array2::zeros((rows, cols)),
        };

        let plane = intensity_plane(frame);
        let x = self.features(&state, &plane, 1.0);
        self.train(&mut state, x, 1.0);

        self.state = Some(state);
        Ok(())
    }

    fn update(&mut self, frame: &RgbImage) -> Result<Region> {
        let _span = tracing::debug_span!("kcf_update").entered();

        let Some(mut state) = self.state.take() else {
            bail!("KCF tracker updated before init");
        };

        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            self.state = Some(state);
            bail!("KCF tracker cannot be updated with an empty frame");
        }

        let plane = intensity_plane(frame);
        keep_in_view(&mut state.roi, width as f32, height as f32);

        let (cx, cy) = state.roi.center();
        let x = self.features(&state, &plane, 1.0);
        let (mut shift, mut peak) = self.detect(&state, &x);

        let step = self.config.scale_step;
        if step != 1.0 {
            let x = self.features(&state, &plane, 1.0 / step);
            let (smaller_shift, smaller_peak) = self.detect(&state, &x);
            if self.config.scale_weight * smaller_peak > peak {
                shift = smaller_shift;
                peak = smaller_peak;
                state.scale /= step;
                state.roi.width /= step;
                state.roi.height /= step;
            }

            let x = self.features(&state, &plane, step);
            let (larger_shift, larger_peak) = self.detect(&state, &x);
            if self.config.scale_weight * larger_peak > peak {
                shift = larger_shift;
                peak = larger_peak;
                state.scale *= step;
                state.roi.width *= step;
                state.roi.height *= step;
            }
        }

        tracing::trace!("KCF peak {:.4} at shift {:?}", peak, shift);

        state.roi.x = cx - state.roi.width / 2.0 + shift.0 * state.scale;
        state.roi.y = cy - state.roi.height / 2.0 + shift.1 * state.scale;
        keep_in_view(&mut state.roi, width as f32, height as f32);

        let x = self.features(&state, &plane, 1.0);
        self.train(&mut state, x, self.config.interp_factor);

        let roi = state.roi;
        self.state = Some(state);
        Ok(roi)
    }

    fn method(&self) -> &str {
        "KCF"
    }
}

/// Template side rounded down to an even number of pixels
fn even_size(v: f32) -> usize {
    ((v as usize) / 2 * 2).max(2)
}

/// Parabolic interpolation of a peak from its two neighbours
fn sub_pixel_peak(left: f32, center: f32, right: f32) -> f32 {
    let divisor = 2.0 * center - right - left;
    if divisor == 0.0 {
        return 0.0;
    }
    0.5 * (right - left) / divisor
}

/// Keep at least part of the region inside a `width` x `height` frame
fn keep_in_view(roi: &mut Region, width: f32, height: f32) {
    if roi.x >= width - 1.0 {
        roi.x = width - 1.0;
    }
    if roi.y >= height - 1.0 {
        roi.y = height - 1.0;
    }
    if roi.x + roi.width <= 0.0 {
        roi.x = -roi.width + 2.0;
    }
    if roi.y + roi.height <= 0.0 {
        roi.y = -roi.height + 2.0;
    }
}
