//! Named color resolution for color attributes.
//!
//! Catalog data records colors by name. Each name maps to an RGB triple
//! whose channels are scaled from `0..=255` down to `[0, 1]` so they can
//! sit directly in a feature vector. Names outside the palette resolve to
//! black rather than failing, since color wording in plant data is messy.

/// Channels emitted for names outside the palette.
pub const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// Every name the palette recognizes.
pub const PALETTE: [&str; 13] = [
    "Black",
    "Blue",
    "Brown",
    "Dark Green",
    "Gray-Green",
    "Green",
    "Orange",
    "Purple",
    "Red",
    "White",
    "White-Gray",
    "Yellow",
    "Yellow-Green",
];

/// Resolve a named color to RGB channels in `[0, 1]`.
///
/// Returns `None` for names outside the palette. Matching is exact,
/// including case.
///
/// # Examples
///
/// ```
/// use vivero::encoding::color;
///
/// assert_eq!(color::lookup("Red"), Some([1.0, 0.0, 0.0]));
/// assert_eq!(color::lookup("Chartreuse"), None);
/// ```
#[must_use]
pub fn lookup(name: &str) -> Option<[f32; 3]> {
    let rgb: [u8; 3] = match name {
        "Black" => [0, 0, 0],
        "Blue" => [0, 0, 255],
        "Brown" => [150, 75, 0],
        "Dark Green" => [0, 100, 0],
        "Gray-Green" => [94, 113, 106],
        "Green" => [0, 255, 0],
        "Orange" => [255, 165, 0],
        "Purple" => [128, 0, 128],
        "Red" => [255, 0, 0],
        "White" => [255, 255, 255],
        "White-Gray" => [235, 236, 240],
        "Yellow" => [255, 255, 0],
        "Yellow-Green" => [154, 205, 50],
        _ => return None,
    };
    Some(rgb.map(|c| f32::from(c) / 255.0))
}

/// Resolve a named color, falling back to [`BLACK`] for unknown names.
#[must_use]
pub fn resolve(name: &str) -> [f32; 3] {
    lookup(name).unwrap_or(BLACK)
}
