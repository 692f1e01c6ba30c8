use crate::raster::RasterImage;
use rayon::prelude::*;

/// Apply the 3x3 unsharp convolution and return a fresh raster.
///
/// Kernel: center `1 + 4*intensity`, orthogonal neighbors `-intensity`,
/// diagonals 0, accumulated as a delta onto the unmodified base sample:
/// `out = clamp(base + intensity * sum(base - orthogonal))`. The pass reads
/// only from the input snapshot, so neighbor reads never observe partially
/// written output. The outermost one-pixel border is copied unchanged (no
/// wraparound, no edge-clamp extension); alpha passes through.
pub(crate) fn sharpen(source: &RasterImage, intensity: f32) -> RasterImage {
    if intensity <= 0.0 || source.width < 3 || source.height < 3 {
        return source.clone();
    }

    let w = source.width as usize;
    let row_bytes = w * 4;
    let mut out = source.clone();

    let src = &source.data;
    out.data[row_bytes..]
        .par_chunks_exact_mut(row_bytes)
        .take(source.height as usize - 2)
        .enumerate()
        .for_each(|(i, out_row)| {
            let y = i + 1;
            let above = &src[(y - 1) * row_bytes..y * row_bytes];
            let here = &src[y * row_bytes..(y + 1) * row_bytes];
            let below = &src[(y + 1) * row_bytes..(y + 2) * row_bytes];

            for x in 1..w - 1 {
                let idx = x * 4;
                for ch in 0..3 {
                    let base = f32::from(here[idx + ch]);
                    let left = f32::from(here[idx - 4 + ch]);
                    let right = f32::from(here[idx + 4 + ch]);
                    let up = f32::from(above[idx + ch]);
                    let down = f32::from(below[idx + ch]);

                    let delta = intensity * (4.0 * base - left - right - up - down);
                    out_row[idx + ch] = (base + delta).round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    out
}
