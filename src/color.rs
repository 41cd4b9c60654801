use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Heat-map scale
// ---------------------------------------------------------------------------

/// Plasma-like colour for an intensity in `[0, 1]`: dark violet at 0
/// through magenta and orange to yellow at 1.
pub fn heat_color(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
    // Hue runs backwards from 260° (violet) past 360° to 55° (yellow).
    let hue = (260.0 + t * 155.0) % 360.0;
    let lightness = 0.25 + t * 0.35;
    hsl_to_color32(Hsl::new(hue, 0.85, lightness))
}

/// Colour of `value` scaled between `min` and `max`.
pub fn heat_color_in(value: f64, min: f64, max: f64) -> Color32 {
    if max > min {
        heat_color((value - min) / (max - min))
    } else {
        heat_color(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_heat_scale_ends_differ() {
        assert_ne!(heat_color(0.0), heat_color(1.0));
        assert_eq!(heat_color(-3.0), heat_color(0.0));
        assert_eq!(heat_color(f64::NAN), heat_color(0.0));
        assert_eq!(heat_color_in(5.0, 5.0, 5.0), heat_color(1.0));
    }

    #[test]
    fn test_heat_scale_gets_lighter() {
        let dark = heat_color(0.0);
        let light = heat_color(1.0);
        let luma = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(luma(light) > luma(dark));
    }
}
