// src/algorithms/slic.rs
//! SLIC superpixel segmentation.
//!
//! Groups perceptually similar, spatially contiguous pixels into at most
//! `n_segments` regions. Color images are clustered in CIELAB after a Gaussian
//! pre-filter; the `compactness` weight trades color similarity against a regular,
//! grid-like shape. A final connectivity pass guarantees every returned label is a
//! single 4-connected region and that labels run contiguously from zero.

use crate::core::{ComponentError, Result};
use ndarray::{Array2, Array3, Axis};
use std::collections::VecDeque;

/// Parameters for [`slic`].
#[derive(Debug, Clone)]
pub struct SlicParams {
    /// Upper bound on the number of segments.
    pub n_segments: usize,
    /// Weight of spatial distance relative to color distance.
    pub compactness: f64,
    /// Standard deviation of the Gaussian pre-filter, in pixels. `0` disables it.
    pub sigma: f64,
    pub max_iter: usize,
}

impl Default for SlicParams {
    fn default() -> Self {
        SlicParams {
            n_segments: 100,
            compactness: 10.0,
            sigma: 0.0,
            max_iter: 10,
        }
    }
}

#[derive(Debug, Clone)]
struct Center {
    y: f64,
    x: f64,
    color: Vec<f64>,
}

/// Segments a `(height, width, channels)` image, returning a `(height, width)` label map.
pub fn slic(image: &Array3<u8>, params: &SlicParams) -> Result<Array2<usize>> {
    if params.n_segments == 0 {
        return Err(ComponentError::InvalidConfiguration(
            "number of segments must be at least 1".to_string(),
        ));
    }
    let (h, w, _) = image.dim();
    if h == 0 || w == 0 {
        return Ok(Array2::zeros((h, w)));
    }

    let mut features = to_feature_space(image);
    if params.sigma > 0.0 {
        gaussian_smooth(&mut features, params.sigma);
    }

    let (mut centers, spacing) = grid_centers(&features, params.n_segments);
    let step = ((h * w) as f64 / params.n_segments as f64).sqrt().max(1.0);
    let labels = cluster(&features, &mut centers, step, spacing, params);

    let min_size = ((h * w) as f64 / centers.len() as f64 * 0.5) as usize;
    let mut labels = enforce_connectivity(&labels, min_size);
    cap_segments(&mut labels, params.n_segments);

    tracing::debug!(
        height = h,
        width = w,
        requested = params.n_segments,
        segments = count_labels(&labels),
        "slic segmentation finished"
    );
    Ok(labels)
}

/// Number of distinct labels in a contiguous label map.
pub fn count_labels(labels: &Array2<usize>) -> usize {
    labels.iter().copied().max().map_or(0, |m| m + 1)
}

/// Color images go to CIELAB; gray images are scaled onto the same 0..100 lightness range.
fn to_feature_space(image: &Array3<u8>) -> Array3<f64> {
    let (h, w, c) = image.dim();
    if c >= 3 {
        let mut lab = Array3::<f64>::zeros((h, w, 3));
        for y in 0..h {
            for x in 0..w {
                let [l, a, b] = rgb_to_lab(image[[y, x, 0]], image[[y, x, 1]], image[[y, x, 2]]);
                lab[[y, x, 0]] = l;
                lab[[y, x, 1]] = a;
                lab[[y, x, 2]] = b;
            }
        }
        lab
    } else {
        Array3::from_shape_fn((h, w, 1), |(y, x, _)| f64::from(image[[y, x, 0]]) / 255.0 * 100.0)
    }
}

fn rgb_to_lab(r: u8, g: u8, b: u8) -> [f64; 3] {
    fn linear(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    fn f(t: f64) -> f64 {
        if t > 0.008856 {
            t.cbrt()
        } else {
            7.787 * t + 16.0 / 116.0
        }
    }
    let (r, g, b) = (linear(r), linear(g), linear(b));
    // D65 reference white.
    let x = (0.412453 * r + 0.357580 * g + 0.180423 * b) / 0.95047;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = (0.019334 * r + 0.119193 * g + 0.950227 * b) / 1.08883;
    let (fx, fy, fz) = (f(x), f(y), f(z));
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Half-sample symmetric reflection of an out-of-range index.
fn reflect(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            return i as usize;
        }
    }
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (4.0 * sigma + 0.5) as isize;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|i| (-0.5 * (i as f64 / sigma).powi(2)).exp())
        .collect();
    let total: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= total);
    kernel
}

/// Separable Gaussian blur over the two spatial axes, channel by channel.
fn gaussian_smooth(features: &mut Array3<f64>, sigma: f64) {
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    for axis in [Axis(0), Axis(1)] {
        let source = features.clone();
        let len = source.len_of(axis);
        for ((y, x, c), out) in features.indexed_iter_mut() {
            let pos = (if axis == Axis(0) { y } else { x }) as isize;
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let j = reflect(pos + k as isize - radius, len);
                let v = if axis == Axis(0) {
                    source[[j, x, c]]
                } else {
                    source[[y, j, c]]
                };
                acc += weight * v;
            }
            *out = acc;
        }
    }
}

/// Seeds a regular grid of at most `n_segments` centers. Also returns the
/// `(row, column)` spacing of the grid.
fn grid_centers(features: &Array3<f64>, n_segments: usize) -> (Vec<Center>, (f64, f64)) {
    let (h, w, _) = features.dim();
    let step = ((h * w) as f64 / n_segments as f64).sqrt();
    let rows = ((h as f64 / step).floor() as usize).clamp(1, n_segments.min(h));
    let cols = ((w as f64 / step).floor() as usize).clamp(1, (n_segments / rows).min(w).max(1));

    let mut centers = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            let y = (i as f64 + 0.5) * h as f64 / rows as f64;
            let x = (j as f64 + 0.5) * w as f64 / cols as f64;
            let (py, px) = ((y as usize).min(h - 1), (x as usize).min(w - 1));
            centers.push(Center {
                y,
                x,
                color: features.slice(ndarray::s![py, px, ..]).to_vec(),
            });
        }
    }
    (centers, (h as f64 / rows as f64, w as f64 / cols as f64))
}

fn color_distance(features: &Array3<f64>, y: usize, x: usize, center: &Center) -> f64 {
    center
        .color
        .iter()
        .enumerate()
        .map(|(c, v)| (features[[y, x, c]] - v).powi(2))
        .sum()
}

/// Localized k-means over `(y, x, color)`.
fn cluster(
    features: &Array3<f64>,
    centers: &mut [Center],
    step: f64,
    (spacing_y, spacing_x): (f64, f64),
    params: &SlicParams,
) -> Array2<usize> {
    let (h, w, channels) = features.dim();
    let spatial_weight = (params.compactness / step).powi(2);
    let mut labels = Array2::from_elem((h, w), usize::MAX);
    let mut distances = Array2::from_elem((h, w), f64::INFINITY);

    // The search window must reach past the seed spacing so every pixel is
    // visited on the first pass.
    let reach_y = (2.0 * step).max(spacing_y);
    let reach_x = (2.0 * step).max(spacing_x);

    for _ in 0..params.max_iter.max(1) {
        distances.fill(f64::INFINITY);
        let previous = labels.clone();

        for (k, center) in centers.iter().enumerate() {
            let y0 = (center.y - reach_y).floor().max(0.0) as usize;
            let y1 = ((center.y + reach_y).ceil() as usize).min(h);
            let x0 = (center.x - reach_x).floor().max(0.0) as usize;
            let x1 = ((center.x + reach_x).ceil() as usize).min(w);
            for y in y0..y1 {
                for x in x0..x1 {
                    let dy = y as f64 + 0.5 - center.y;
                    let dx = x as f64 + 0.5 - center.x;
                    let d = color_distance(features, y, x, center)
                        + (dy * dy + dx * dx) * spatial_weight;
                    if d < distances[[y, x]] {
                        distances[[y, x]] = d;
                        labels[[y, x]] = k;
                    }
                }
            }
        }

        // Pixels no window reached go to the spatially nearest center.
        for ((y, x), label) in labels.indexed_iter_mut() {
            if *label == usize::MAX {
                *label = nearest_center(centers, y, x);
            }
        }

        let mut sums = vec![(0.0, 0.0, vec![0.0; channels], 0usize); centers.len()];
        for ((y, x), &k) in labels.indexed_iter() {
            let entry = &mut sums[k];
            entry.0 += y as f64 + 0.5;
            entry.1 += x as f64 + 0.5;
            for c in 0..channels {
                entry.2[c] += features[[y, x, c]];
            }
            entry.3 += 1;
        }
        for (center, (sy, sx, color, count)) in centers.iter_mut().zip(sums) {
            if count > 0 {
                let n = count as f64;
                center.y = sy / n;
                center.x = sx / n;
                center.color = color.into_iter().map(|v| v / n).collect();
            }
        }

        if labels == previous {
            break;
        }
    }
    labels
}

fn nearest_center(centers: &[Center], y: usize, x: usize) -> usize {
    let (py, px) = (y as f64 + 0.5, x as f64 + 0.5);
    centers
        .iter()
        .enumerate()
        .map(|(k, c)| (k, (c.y - py).powi(2) + (c.x - px).powi(2)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
        .0
}

const NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn neighbors(y: usize, x: usize, h: usize, w: usize) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBORS.iter().filter_map(move |&(dy, dx)| {
        let ny = y as isize + dy;
        let nx = x as isize + dx;
        if ny >= 0 && nx >= 0 && (ny as usize) < h && (nx as usize) < w {
            Some((ny as usize, nx as usize))
        } else {
            None
        }
    })
}

/// Relabels 4-connected components in raster order, folding components smaller
/// than `min_size` into the already-labeled region touching their first pixel.
fn enforce_connectivity(labels: &Array2<usize>, min_size: usize) -> Array2<usize> {
    let (h, w) = labels.dim();
    let mut out = Array2::from_elem((h, w), usize::MAX);
    let mut next = 0usize;
    let mut queue = VecDeque::new();
    let mut component = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if out[[y, x]] != usize::MAX {
                continue;
            }
            let original = labels[[y, x]];
            let adjacent = if x > 0 {
                Some(out[[y, x - 1]])
            } else if y > 0 {
                Some(out[[y - 1, x]])
            } else {
                None
            };

            component.clear();
            out[[y, x]] = next;
            queue.push_back((y, x));
            while let Some((cy, cx)) = queue.pop_front() {
                component.push((cy, cx));
                for (ny, nx) in neighbors(cy, cx, h, w) {
                    if out[[ny, nx]] == usize::MAX && labels[[ny, nx]] == original {
                        out[[ny, nx]] = next;
                        queue.push_back((ny, nx));
                    }
                }
            }

            match adjacent {
                Some(target) if component.len() < min_size => {
                    for &(cy, cx) in &component {
                        out[[cy, cx]] = target;
                    }
                }
                _ => next += 1,
            }
        }
    }
    out
}

/// Merges the smallest segment into its most-bordering neighbor until at most
/// `limit` segments remain, keeping labels contiguous.
fn cap_segments(labels: &mut Array2<usize>, limit: usize) {
    let (h, w) = labels.dim();
    loop {
        let count = count_labels(labels);
        if count <= limit.max(1) {
            return;
        }
        let mut sizes = vec![0usize; count];
        labels.iter().for_each(|&l| sizes[l] += 1);
        let smallest = (0..count).min_by_key(|&l| sizes[l]).unwrap_or(0);

        let mut border = vec![0usize; count];
        for ((y, x), &l) in labels.indexed_iter() {
            if l != smallest {
                continue;
            }
            for (ny, nx) in neighbors(y, x, h, w) {
                let other = labels[[ny, nx]];
                if other != smallest {
                    border[other] += 1;
                }
            }
        }
        let target = (0..count)
            .filter(|&l| l != smallest)
            .max_by_key(|&l| border[l])
            .unwrap_or(0);

        labels.mapv_inplace(|l| {
            let l = if l == smallest { target } else { l };
            if l > smallest {
                l - 1
            } else {
                l
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use std::collections::HashSet;

    fn two_tone(h: usize, w: usize) -> Array3<u8> {
        Array3::from_shape_fn((h, w, 3), |(_, x, c)| {
            if x < w / 2 {
                [220, 30, 30][c]
            } else {
                [20, 40, 200][c]
            }
        })
    }

    fn is_connected(labels: &Array2<usize>, label: usize) -> bool {
        let (h, w) = labels.dim();
        let pixels: Vec<_> = labels
            .indexed_iter()
            .filter(|&(_, &l)| l == label)
            .map(|(p, _)| p)
            .collect();
        let Some(&start) = pixels.first() else {
            return false;
        };
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some((y, x)) = queue.pop_front() {
            for n in neighbors(y, x, h, w) {
                if labels[n] == label && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == pixels.len()
    }

    #[test]
    fn labels_are_contiguous_connected_and_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = Normal::new(0.0, 12.0).unwrap();
        let image = two_tone(40, 48).mapv(|v| {
            (f64::from(v) + noise.sample(&mut rng)).clamp(0.0, 255.0) as u8
        });
        let params = SlicParams {
            n_segments: 16,
            sigma: 1.0,
            ..SlicParams::default()
        };
        let labels = slic(&image, &params).unwrap();
        assert_eq!(labels.dim(), (40, 48));

        let n = count_labels(&labels);
        assert!(n >= 1 && n <= 16, "got {} segments", n);
        let present: HashSet<usize> = labels.iter().copied().collect();
        assert_eq!(present, (0..n).collect::<HashSet<_>>());
        for l in 0..n {
            assert!(is_connected(&labels, l), "segment {} is split", l);
        }
    }

    #[test]
    fn segments_respect_a_strong_color_edge() {
        let labels = slic(
            &two_tone(32, 32),
            &SlicParams {
                n_segments: 4,
                sigma: 1.0,
                ..SlicParams::default()
            },
        )
        .unwrap();
        // No segment should straddle the red/blue boundary far from it.
        for y in 0..32 {
            assert_ne!(labels[[y, 2]], labels[[y, 29]]);
        }
    }

    #[test]
    fn single_segment_covers_everything() {
        let labels = slic(
            &two_tone(10, 10),
            &SlicParams {
                n_segments: 1,
                ..SlicParams::default()
            },
        )
        .unwrap();
        assert!(labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn grayscale_images_are_supported() {
        let gray = Array3::from_shape_fn((12, 12, 1), |(y, _, _)| if y < 6 { 0 } else { 255 });
        let labels = slic(
            &gray,
            &SlicParams {
                n_segments: 4,
                ..SlicParams::default()
            },
        )
        .unwrap();
        assert!(count_labels(&labels) <= 4);
        assert_ne!(labels[[0, 0]], labels[[11, 0]]);
    }

    #[test]
    fn tiny_images_never_exceed_pixel_count() {
        let image = two_tone(2, 2);
        let labels = slic(
            &image,
            &SlicParams {
                n_segments: 50,
                ..SlicParams::default()
            },
        )
        .unwrap();
        assert!(count_labels(&labels) <= 4);
    }

    #[test]
    fn zero_segments_is_a_configuration_error() {
        let params = SlicParams {
            n_segments: 0,
            ..SlicParams::default()
        };
        assert!(matches!(
            slic(&two_tone(4, 4), &params),
            Err(ComponentError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn lab_of_white_and_black() {
        let white = rgb_to_lab(255, 255, 255);
        assert!((white[0] - 100.0).abs() < 0.01);
        assert!(white[1].abs() < 0.01 && white[2].abs() < 0.01);
        assert!(rgb_to_lab(0, 0, 0)[0].abs() < 0.01);
    }

    #[test]
    fn reflect_mirrors_out_of_range_indices() {
        assert_eq!(reflect(-1, 5), 0);
        assert_eq!(reflect(-2, 5), 1);
        assert_eq!(reflect(5, 5), 4);
        assert_eq!(reflect(6, 5), 3);
        assert_eq!(reflect(2, 5), 2);
    }
}
