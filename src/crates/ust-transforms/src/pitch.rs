//! Pitch-bend cleanup: fewer points, rounded positions and heights,
//! uniform segment shapes

use std::collections::BTreeSet;

use ust_core::{PitchCurve, PitchShape, UstFile};

use crate::error::{Result, TransformError};

/// Widths are snapped to this fraction of a whole note
pub const WIDTH_GRID_DIVISION: f64 = 32.0;

/// `PBY` unit is a tenth of a semitone
pub const HEIGHT_GRID: f64 = 10.0;

/// Round half away from zero to a multiple of `unit`
pub fn quantize(value: f64, unit: f64) -> f64 {
    (value / unit).round() * unit
}

/// Milliseconds per grid step at a tempo
pub fn width_unit_ms(tempo: f64) -> f64 {
    60_000.0 / tempo / (WIDTH_GRID_DIVISION / 4.0)
}

/// Remove interior points whose height matches both neighbours. The
/// width of a removed segment moves into the next kept one, so the
/// curve keeps its total span.
pub fn reduce_points(curve: &PitchCurve) -> PitchCurve {
    let n = curve.len();
    let mut widths = Vec::with_capacity(n);
    let mut heights = Vec::with_capacity(curve.heights.len());
    let mut shapes = Vec::with_capacity(curve.shapes.len());
    let mut carry = 0.0;

    for k in 1..=n {
        let width = curve.widths[k - 1];
        let flat = k < n
            && curve.height(k - 1) == curve.height(k)
            && curve.height(k) == curve.height(k + 1);
        if flat {
            carry += width;
            continue;
        }
        widths.push(width + carry);
        carry = 0.0;
        if k <= curve.heights.len() {
            heights.push(curve.height(k));
        }
        if let Some(&shape) = curve.shapes.get(k - 1) {
            shapes.push(shape);
        }
    }

    PitchCurve {
        start: curve.start,
        widths,
        heights,
        shapes,
    }
}

pub fn reduce_pitch_points(file: &mut UstFile) -> Result<()> {
    for note in &mut file.notes {
        let Some(curve) = note.pitch_curve()? else {
            continue;
        };
        let reduced = reduce_points(&curve);
        if reduced.len() != curve.len() {
            tracing::debug!(
                "{}: {} pitch points removed",
                note.tag(),
                curve.len() - reduced.len()
            );
            note.set_pitch_curve(&reduced);
        }
    }
    Ok(())
}

/// Snap the start offset and every width to a 32nd note at the note's
/// tempo
pub fn round_pitch_widths(file: &mut UstFile) -> Result<()> {
    for i in 0..file.notes.len() {
        let Some(widths) = file.notes[i].pbw()? else {
            continue;
        };
        let tempo = file
            .tempo_at(i)?
            .filter(|t| *t > 0.0)
            .ok_or_else(|| TransformError::MissingTempo {
                tag: file.notes[i].tag().to_string(),
            })?;
        let unit = width_unit_ms(tempo);

        let note = &mut file.notes[i];
        if let Some(mut start) = note.pbs()? {
            start.offset = quantize(start.offset, unit);
            note.set_pbs(start);
        }
        let rounded: Vec<f64> = widths.iter().map(|&w| quantize(w, unit)).collect();
        note.set_pbw(&rounded);
    }
    Ok(())
}

/// Point reduction followed by width rounding
pub fn round_pitch(file: &mut UstFile) -> Result<()> {
    reduce_pitch_points(file)?;
    round_pitch_widths(file)
}

/// Snap the start height and every `PBY` height to whole semitones
pub fn round_pitch_heights(file: &mut UstFile) -> Result<()> {
    for note in &mut file.notes {
        if let Some(mut start) = note.pbs()? {
            if let Some(height) = start.height {
                start.height = Some(quantize(height, HEIGHT_GRID));
                note.set_pbs(start);
            }
        }
        if let Some(heights) = note.pby()? {
            let rounded: Vec<f64> = heights.iter().map(|&h| quantize(h, HEIGHT_GRID)).collect();
            note.set_pby(&rounded);
        }
    }
    Ok(())
}

/// Shape every selected segment gets: the next shape in the toggle order
/// when the selection uses exactly one, otherwise the default curve
pub fn next_uniform_shape(used: &BTreeSet<PitchShape>) -> PitchShape {
    match used.iter().next() {
        Some(&only) if used.len() == 1 => only.next(),
        _ => PitchShape::Curve,
    }
}

/// Toggle all segment shapes together, like pressing the shape button on
/// every point at once
pub fn cycle_pitch_shapes(file: &mut UstFile) -> Result<()> {
    if !file.settings().mode2() {
        return Err(TransformError::Mode2Disabled);
    }

    let used: BTreeSet<PitchShape> = file.notes.iter().filter_map(|n| n.pbm()).flatten().collect();
    let shape = next_uniform_shape(&used);
    tracing::info!("Setting all pitch shapes to {:?}", shape);

    for note in &mut file.notes {
        if let Some(shapes) = note.pbm() {
            note.set_pbm(&vec![shape; shapes.len()]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ust_core::PitchStart;

    fn curve(widths: &[f64], heights: &[f64]) -> PitchCurve {
        PitchCurve {
            start: PitchStart {
                offset: -30.0,
                height: None,
            },
            widths: widths.to_vec(),
            heights: heights.to_vec(),
            shapes: vec![PitchShape::Curve; widths.len()],
        }
    }

    #[test]
    fn test_reduce_flat_run() {
        // start 0, then 0, 0, 0, 5, end 0
        let reduced = reduce_points(&curve(&[10.0, 20.0, 30.0, 40.0, 50.0], &[0.0, 0.0, 0.0, 5.0]));
        assert_eq!(reduced.widths, vec![60.0, 40.0, 50.0]);
        assert_eq!(reduced.heights, vec![0.0, 5.0]);
        assert_eq!(reduced.shapes.len(), 3);
        let total: f64 = reduced.widths.iter().sum();
        assert_eq!(total, 150.0);
    }

    #[test]
    fn test_reduce_keeps_changes() {
        let c = curve(&[10.0, 20.0, 30.0], &[5.0, -5.0]);
        assert_eq!(reduce_points(&c), c);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(14.0, 10.0), 10.0);
        assert_eq!(quantize(15.0, 10.0), 20.0);
        assert_eq!(quantize(-15.0, 10.0), -20.0);
        assert_eq!(width_unit_ms(120.0), 62.5);
    }

    #[test]
    fn test_round_pitch_file() {
        let mut file = UstFile::parse(
            "[#SETTING]\nTempo=120.00\n\
             [#0000]\nLength=480\nLyric=あ\nNoteNum=60\nPBS=-40;3\nPBW=50,60,70,100,40\nPBY=0,0,0,-14\nPBM=s,,r,,j\n",
        );
        round_pitch(&mut file).unwrap();
        let note = &file.notes[0];
        // point 2 sits between two zero-height points
        assert_eq!(note.get("PBS"), Some("-62.5;3"));
        assert_eq!(note.get("PBW"), Some("62.5,125,125,62.5"));
        assert_eq!(note.get("PBY"), Some("0,0,-14"));
        assert_eq!(note.get("PBM"), Some("s,r,,j"));

        round_pitch_heights(&mut file).unwrap();
        let note = &file.notes[0];
        assert_eq!(note.get("PBS"), Some("-62.5;0"));
        assert_eq!(note.get("PBY"), Some("0,0,-10"));
    }

    #[test]
    fn test_round_widths_needs_tempo() {
        let mut file = UstFile::parse("[#0000]\nLength=480\nLyric=あ\nPBW=50\n");
        assert!(matches!(
            round_pitch_widths(&mut file),
            Err(TransformError::MissingTempo { .. })
        ));
    }

    #[test]
    fn test_cycle_shapes() {
        let text = "[#SETTING]\nMode2=True\n\
                    [#0000]\nLength=480\nLyric=あ\nPBM=s,s\n\
                    [#0001]\nLength=480\nLyric=い\nPBM=s\n\
                    [#0002]\nLength=480\nLyric=う\n";
        let mut file = UstFile::parse(text);
        cycle_pitch_shapes(&mut file).unwrap();
        assert_eq!(file.notes[0].get("PBM"), Some("r,r"));
        assert_eq!(file.notes[1].get("PBM"), Some("r"));
        assert!(!file.notes[2].contains("PBM"));

        file.notes[1].set("PBM", "j");
        cycle_pitch_shapes(&mut file).unwrap();
        assert_eq!(file.notes[0].get("PBM"), Some(","));
    }

    #[test]
    fn test_cycle_shapes_without_pbm() {
        let mut file = UstFile::parse(
            "[#SETTING]\nMode2=True\n[#0000]\nLength=480\nLyric=あ\nPBS=0\nPBW=50\n",
        );
        let before = file.clone();
        cycle_pitch_shapes(&mut file).unwrap();
        assert_eq!(file, before);
        assert_eq!(file.notes[0].get("PBM"), None);
    }

    #[test]
    fn test_cycle_shapes_requires_mode2() {
        let mut file = UstFile::parse("[#SETTING]\nMode2=False\n[#0000]\nLyric=a\nPBM=s\n");
        assert!(matches!(
            cycle_pitch_shapes(&mut file),
            Err(TransformError::Mode2Disabled)
        ));
    }

    fn arb_curve() -> impl Strategy<Value = PitchCurve> {
        (1usize..8).prop_flat_map(|n| {
            (
                -200.0f64..200.0,
                prop::collection::vec(0.0f64..500.0, n),
                prop::collection::vec(prop::sample::select(vec![-20.0, 0.0, 5.0, 10.0]), n - 1),
            )
                .prop_map(move |(offset, widths, heights)| PitchCurve {
                    start: PitchStart {
                        offset,
                        height: Some(0.0),
                    },
                    shapes: vec![PitchShape::Straight; widths.len()],
                    widths,
                    heights,
                })
        })
    }

    proptest! {
        #[test]
        fn reduce_points_is_idempotent(c in arb_curve()) {
            let once = reduce_points(&c);
            prop_assert_eq!(reduce_points(&once), once.clone());
            prop_assert_eq!(once.widths.len(), once.shapes.len());
        }

        #[test]
        fn quantize_is_idempotent(value in -5000.0f64..5000.0, tempo in 40.0f64..300.0) {
            let unit = width_unit_ms(tempo);
            let once = quantize(value, unit);
            prop_assert_eq!(quantize(once, unit), once);
        }
    }
}
