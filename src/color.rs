use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use worldbank_dashboard::ChartDescriptor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue step between consecutive colours, in degrees.
const GOLDEN_ANGLE: f32 = 137.507_77;

/// `n` colours whose hues step by the golden angle, alternating between two
/// lightness levels. Neighbouring legend entries never end up with similar
/// hues, and growing `n` leaves the existing colours where they were.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * GOLDEN_ANGLE) % 360.0;
            let lightness = if i % 2 == 0 { 0.48 } else { 0.62 };
            let hsl: Hsl = Hsl::new(hue, 0.70, lightness);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: trace name → Color32
// ---------------------------------------------------------------------------

/// Gives every trace name (a country, or a year for bar groups) one colour
/// shared by all charts, so a country looks the same everywhere.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map over all trace names of `charts`.
    pub fn from_charts(charts: &[ChartDescriptor]) -> Self {
        let mut names: Vec<&str> = charts
            .iter()
            .flat_map(|c| c.traces.iter().map(|t| t.name()))
            .collect();
        names.sort_unstable();
        names.dedup();

        let palette = generate_palette(names.len());
        let mapping = names
            .into_iter()
            .zip(palette)
            .map(|(name, c)| (name.to_string(), c))
            .collect();

        ColorMap { mapping }
    }

    /// Look up the colour for a trace name.
    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping.get(name).copied().unwrap_or(Color32::GRAY)
    }

    /// Return the legend entries (name → colour) for the UI.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, Color32)> {
        self.mapping.iter().map(|(n, c)| (n.as_str(), *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldbank_dashboard::{Layout, TraceSpec};

    fn chart(names: &[&str]) -> ChartDescriptor {
        ChartDescriptor {
            traces: names
                .iter()
                .map(|n| TraceSpec::Line {
                    name: n.to_string(),
                    x: vec![1990],
                    y: vec![Some(1.0)],
                })
                .collect(),
            layout: Layout::default(),
        }
    }

    #[test]
    fn test_palette_is_distinct() {
        let palette = generate_palette(10);
        assert_eq!(palette.len(), 10);
        for (i, a) in palette.iter().enumerate() {
            assert!(palette[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn test_palette_is_stable_as_it_grows() {
        assert!(generate_palette(0).is_empty());
        let small = generate_palette(4);
        assert_eq!(generate_palette(12)[..4], small[..]);
    }

    #[test]
    fn test_same_country_same_colour_across_charts() {
        let charts = [chart(&["China", "India"]), chart(&["India", "Japan"])];
        let map = ColorMap::from_charts(&charts);
        assert_eq!(map.legend_entries().count(), 3);
        assert_ne!(map.color_for("China"), map.color_for("India"));
        assert_eq!(map.color_for("Narnia"), Color32::GRAY);
    }
}
