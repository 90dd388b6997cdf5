//! Deterministic distinct colors and color string helpers.

use crate::label::{Label, LabelColorTable};
use crate::util::RegionMatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color; persists as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    /// Formats as `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(v: [u8; 3]) -> Self {
        Rgb(v)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.0
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgb(c.0)
    }
}

/// CSS form `rgb(r, g, b)`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "rgb({r}, {g}, {b})")
    }
}

/// Parses `rgb(r, g, b)`, `rgba(r, g, b, a)` (alpha dropped) or `#rrggbb`.
impl FromStr for Rgb {
    type Err = RegionMatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return Rgb::from_hex(s).ok_or(RegionMatchError::InvalidInput("invalid hex color"));
        }
        let inner = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(RegionMatchError::InvalidInput("invalid rgb color"))?;
        let mut channels = inner.split(',').map(|part| part.trim().parse::<f32>());
        let mut next = || -> Result<u8, RegionMatchError> {
            match channels.next() {
                Some(Ok(v)) if (0.0..=255.0).contains(&v) => Ok(v as u8),
                _ => Err(RegionMatchError::InvalidInput("invalid rgb channel")),
            }
        };
        Ok(Rgb([next()?, next()?, next()?]))
    }
}

/// Converts HSV (all components in `[0, 1]`) to RGB.
///
/// Channels are scaled by 255 and truncated.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let (r, g, b) = if s == 0.0 {
        (v, v, v)
    } else {
        let sector = (h * 6.0).floor();
        let f = h * 6.0 - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        match (sector as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    };
    let to_u8 = |c: f64| (c * 255.0).clamp(0.0, 255.0) as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}

/// Assigns one fully saturated color per label.
///
/// The hue circle is split into `N + 1` sectors for `N` labels and label `i`
/// takes hue `i / (N + 1)`; the spare sector keeps the first and last labels
/// apart. Duplicate labels keep their first color.
pub fn assign_colors<'a, I>(labels: I) -> LabelColorTable
where
    I: IntoIterator<Item = &'a Label>,
{
    let mut unique: Vec<&Label> = Vec::new();
    for label in labels {
        if !unique.contains(&label) {
            unique.push(label);
        }
    }

    let sectors = unique.len() + 1;
    let mut table = LabelColorTable::new();
    for (idx, label) in unique.into_iter().enumerate() {
        let hue = idx as f64 / sectors as f64;
        table.insert(label.clone(), hsv_to_rgb(hue, 1.0, 1.0));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::{assign_colors, hsv_to_rgb, Rgb};
    use crate::label::Label;
    use std::collections::HashSet;

    fn labels(n: usize) -> Vec<Label> {
        (0..n).map(|i| Label::new(format!("L{i}")).unwrap()).collect()
    }

    #[test]
    fn primary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb([255, 0, 0]));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb([0, 255, 0]));
        assert_eq!(hsv_to_rgb(0.5, 1.0, 1.0), Rgb([0, 255, 255]));
    }

    #[test]
    fn colors_are_distinct_and_deterministic() {
        for n in [1, 2, 3, 7, 12, 40] {
            let names = labels(n);
            let first = assign_colors(&names);
            let second = assign_colors(&names);
            assert_eq!(first, second);
            let distinct: HashSet<Rgb> = first.iter().map(|(_, c)| c).collect();
            assert_eq!(distinct.len(), n);
        }
    }

    #[test]
    fn two_labels_use_thirds_of_the_circle() {
        let names = labels(2);
        let table = assign_colors(&names);
        assert_eq!(table.get(&names[0]), Some(Rgb([255, 0, 0])));
        assert_eq!(table.get(&names[1]), Some(Rgb([0, 255, 0])));
    }

    #[test]
    fn hex_and_css_round_trip() {
        let color = Rgb([255, 168, 77]);
        assert_eq!(color.to_hex(), "#ffa84d");
        assert_eq!(Rgb::from_hex("#ffa84d"), Some(color));
        assert_eq!(color.to_string(), "rgb(255, 168, 77)");
        assert_eq!("rgb(255, 168, 77)".parse::<Rgb>().unwrap(), color);
        assert_eq!("rgba(255, 168, 77, 0.5)".parse::<Rgb>().unwrap(), color);
        assert!("rgb(1, 2)".parse::<Rgb>().is_err());
    }
}
