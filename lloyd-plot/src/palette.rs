use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;

use crate::PlotError;

const SET1: [RGBColor; 9] = [
    RGBColor(228, 26, 28),
    RGBColor(55, 126, 184),
    RGBColor(77, 175, 74),
    RGBColor(152, 78, 163),
    RGBColor(255, 127, 0),
    RGBColor(255, 255, 51),
    RGBColor(166, 86, 40),
    RGBColor(247, 129, 191),
    RGBColor(153, 153, 153),
];

const TAB20: [RGBColor; 20] = [
    RGBColor(31, 119, 180),
    RGBColor(174, 199, 232),
    RGBColor(255, 127, 14),
    RGBColor(255, 187, 120),
    RGBColor(44, 160, 44),
    RGBColor(152, 223, 138),
    RGBColor(214, 39, 40),
    RGBColor(255, 152, 150),
    RGBColor(148, 103, 189),
    RGBColor(197, 176, 213),
    RGBColor(140, 86, 75),
    RGBColor(196, 156, 148),
    RGBColor(227, 119, 194),
    RGBColor(247, 182, 210),
    RGBColor(127, 127, 127),
    RGBColor(199, 199, 199),
    RGBColor(188, 189, 34),
    RGBColor(219, 219, 141),
    RGBColor(23, 190, 207),
    RGBColor(158, 218, 229),
];

/// Discrete color maps used to tell clusters apart
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    /// Nine well separated colors
    Set1,
    /// Ten hues, each in a dark and a light shade
    Tab20,
}

impl Palette {
    /// The smallest palette with a distinct color for each of `n_clusters` clusters
    pub fn for_clusters(n_clusters: usize) -> Self {
        if n_clusters <= SET1.len() {
            Palette::Set1
        } else {
            Palette::Tab20
        }
    }

    pub fn colors(&self) -> &'static [RGBColor] {
        match self {
            Palette::Set1 => &SET1,
            Palette::Tab20 => &TAB20,
        }
    }

    /// Color of cluster `label`; labels past the end of the palette wrap around.
    pub fn color(&self, label: usize) -> RGBColor {
        let colors = self.colors();
        colors[label % colors.len()]
    }
}

impl FromStr for Palette {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "set1" => Ok(Palette::Set1),
            "tab20" => Ok(Palette::Tab20),
            _ => Err(PlotError::UnknownPalette(s.to_string())),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Palette::Set1 => write!(f, "set1"),
            Palette::Tab20 => write!(f, "tab20"),
        }
    }
}
