use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// `n` category colours: hues step by the golden angle, lightness alternates.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    const GOLDEN_ANGLE: f32 = 137.507_76;
    let mut hue = 210.0_f32;
    let mut colors = Vec::with_capacity(n);
    for i in 0..n {
        let lightness = if i % 2 == 0 { 0.50 } else { 0.62 };
        colors.push(hsl_to_color32(hue, 0.70, lightness));
        hue = (hue + GOLDEN_ANGLE) % 360.0;
    }
    colors
}

// ---------------------------------------------------------------------------
// Diverging scale for correlations
// ---------------------------------------------------------------------------

/// Blue for -1, near white for 0, red for +1. `NaN` is grey.
pub fn coolwarm(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::GRAY;
    }
    let t = r.clamp(-1.0, 1.0) as f32;
    let hue = if t < 0.0 { 225.0 } else { 5.0 };
    let lightness = 0.92 - 0.47 * t.abs();
    hsl_to_color32(hue, 0.7, lightness)
}

/// Black or white, whichever reads better on `background`.
pub fn text_color_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(40);
        assert_eq!(colors.len(), 40);
        for pair in colors.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn coolwarm_ends_differ_and_fade_to_light() {
        let cold = coolwarm(-1.0);
        let warm = coolwarm(1.0);
        assert!(cold.b() > cold.r());
        assert!(warm.r() > warm.b());
        let mid = coolwarm(0.0);
        assert!(mid.r() > 200 && mid.g() > 200 && mid.b() > 200);
        assert_eq!(coolwarm(f64::NAN), Color32::GRAY);
    }
}
