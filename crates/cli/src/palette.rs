//! Fixed render palette: color ids wrap around seven RGB triples.

/// 8-bit RGB triples, indexed by `color % PALETTE.len()`.
pub const PALETTE: [[u8; 3]; 7] = [
    [230, 25, 75],
    [60, 180, 75],
    [255, 225, 25],
    [0, 130, 200],
    [245, 130, 48],
    [145, 30, 180],
    [70, 240, 240],
];

/// RGB triple for a color id.
#[inline]
pub fn rgb(color: usize) -> [u8; 3] {
    PALETTE[color % PALETTE.len()]
}

/// RGB scaled to `[0, 1]` as renderers expect.
pub fn rgb_unit(color: usize) -> [f64; 3] {
    rgb(color).map(|c| f64::from(c) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_and_normalizes() {
        assert_eq!(rgb(0), rgb(7));
        assert_ne!(rgb(1), rgb(2));
        let unit = rgb_unit(3);
        assert!(unit.iter().all(|c| (0.0..=1.0).contains(c)));
        assert!((unit[2] - 200.0 / 255.0).abs() < 1e-12);
    }
}
