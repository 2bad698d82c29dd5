use image::{imageops, RgbImage};
use ndarray::Array2;
use std::f32::consts::PI;

/// Grayscale intensity plane of a frame, centered to `[-0.5, 0.5]`
pub fn intensity_plane(frame: &RgbImage) -> Array2<f32> {
    let gray = imageops::grayscale(frame);
    let (width, height) = gray.dimensions();

    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        gray.get_pixel(x as u32, y as u32)[0] as f32 / 255.0 - 0.5
    })
}

/// Resample the window of `width` x `height` pixels centered at `(cx, cy)`
/// onto a `rows` x `cols` grid
///
/// Uses bilinear interpolation; samples outside the plane replicate the border.
pub fn sample_window(
    plane: &Array2<f32>,
    (cx, cy): (f32, f32),
    (width, height): (f32, f32),
    (rows, cols): (usize, usize),
) -> Array2<f32> {
    let (plane_rows, plane_cols) = plane.dim();
    let x0 = cx - width / 2.0;
    let y0 = cy - height / 2.0;
    let step_x = width / cols as f32;
    let step_y = height / rows as f32;

    let clamp = |v: isize, len: usize| v.clamp(0, len as isize - 1) as usize;

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let sx = x0 + (c as f32 + 0.5) * step_x - 0.5;
        let sy = y0 + (r as f32 + 0.5) * step_y - 0.5;

        let fx = sx.floor();
        let fy = sy.floor();
        let ax = sx - fx;
        let ay = sy - fy;

        let x1 = clamp(fx as isize, plane_cols);
        let x2 = clamp(fx as isize + 1, plane_cols);
        let y1 = clamp(fy as isize, plane_rows);
        let y2 = clamp(fy as isize + 1, plane_rows);

        let top = plane[[y1, x1]] * (1.0 - ax) + plane[[y1, x2]] * ax;
        let bottom = plane[[y2, x1]] * (1.0 - ax) + plane[[y2, x2]] * ax;

        top * (1.0 - ay) + bottom * ay
    })
}

/// Separable Hann window
pub fn hann_window(rows: usize, cols: usize) -> Array2<f32> {
    let hann = |i: usize, n: usize| {
        if n < 2 {
            1.0
        } else {
            0.5 * (1.0 - (2.0 * PI * i as f32 / (n - 1) as f32).cos())
        }
    };

    Array2::from_shape_fn((rows, cols), |(r, c)| hann(r, rows) * hann(c, cols))
}

/// Gaussian regression target peaking at `(rows / 2, cols / 2)`
pub fn gaussian_peak(rows: usize, cols: usize, sigma: f32) -> Array2<f32> {
    let mult = -0.5 / (sigma * sigma);
    let (cy, cx) = ((rows / 2) as f32, (cols / 2) as f32);

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let dy = r as f32 - cy;
        let dx = c as f32 - cx;
        (mult * (dy * dy + dx * dx)).exp()
    })
}
