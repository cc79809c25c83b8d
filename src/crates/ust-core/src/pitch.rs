//! Mode2 pitch-bend fields.
//!
//! A curve starts at `PBS` (offset in ms from the note start, optional
//! height) and continues through one point per `PBW` width. `PBY` holds
//! the heights of those points in tenths of a semitone; missing trailing
//! heights are zero. `PBM` holds the shape of each segment.

/// `PBS=offset;height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchStart {
    pub offset: f64,
    pub height: Option<f64>,
}

impl PitchStart {
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split([';', ',']);
        let offset = parse_number(parts.next()?)?;
        let height = match parts.next() {
            Some(text) if !text.trim().is_empty() => Some(parse_number(text)?),
            _ => None,
        };
        Some(PitchStart { offset, height })
    }

    pub fn format(&self) -> String {
        match self.height {
            Some(height) => format!("{};{}", format_number(self.offset), format_number(height)),
            None => format_number(self.offset),
        }
    }
}

/// Segment shape in `PBM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchShape {
    /// Empty entry, the default S-curve
    Curve,
    Straight,
    RShape,
    JShape,
}

impl PitchShape {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "s" => PitchShape::Straight,
            "r" => PitchShape::RShape,
            "j" => PitchShape::JShape,
            _ => PitchShape::Curve,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PitchShape::Curve => "",
            PitchShape::Straight => "s",
            PitchShape::RShape => "r",
            PitchShape::JShape => "j",
        }
    }

    /// Next shape in the editor's toggle order
    pub fn next(self) -> Self {
        match self {
            PitchShape::Curve => PitchShape::Straight,
            PitchShape::Straight => PitchShape::RShape,
            PitchShape::RShape => PitchShape::JShape,
            PitchShape::JShape => PitchShape::Curve,
        }
    }
}

/// A whole pitch-bend curve, gathered from the four fields
#[derive(Debug, Clone, PartialEq)]
pub struct PitchCurve {
    pub start: PitchStart,
    pub widths: Vec<f64>,
    pub heights: Vec<f64>,
    pub shapes: Vec<PitchShape>,
}

impl PitchCurve {
    /// Number of points after the start point
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Height of point `k`; point 0 is the start point
    pub fn height(&self, k: usize) -> f64 {
        if k == 0 {
            self.start.height.unwrap_or(0.0)
        } else {
            self.heights.get(k - 1).copied().unwrap_or(0.0)
        }
    }
}

/// Parse a comma list of numbers; empty items count as zero
pub fn parse_number_list(value: &str) -> Option<Vec<f64>> {
    if value.trim().is_empty() {
        return Some(Vec::new());
    }
    value
        .split(',')
        .map(|item| {
            if item.trim().is_empty() {
                Some(0.0)
            } else {
                parse_number(item)
            }
        })
        .collect()
}

pub fn format_number_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|&v| format_number(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// `PBM=` with nothing after it is one default-shaped segment
pub fn parse_shape_list(value: &str) -> Vec<PitchShape> {
    value.split(',').map(PitchShape::parse).collect()
}

pub fn format_shape_list(shapes: &[PitchShape]) -> String {
    shapes
        .iter()
        .map(|shape| shape.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format with at most three decimals and no trailing zeros or `-0`
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}
