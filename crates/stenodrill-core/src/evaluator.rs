use crate::types::{Chord, KeyColor, KeyColors, Outline, StenoKey};
use tracing::debug;

/// Judges chords against the alternative outlines of one word.
///
/// Tracks the position inside a multi-stroke outline. Every alternative that
/// still has a stroke at the current position contributes a target.
#[derive(Debug, Clone)]
pub struct ChordEvaluator {
    outlines: Vec<Outline>,
    stroke_pos: usize,
}

impl ChordEvaluator {
    pub fn new(outlines: Vec<Outline>) -> Self {
        Self {
            outlines,
            stroke_pos: 0,
        }
    }

    pub fn outlines(&self) -> &[Outline] {
        &self.outlines
    }

    pub fn stroke_position(&self) -> usize {
        self.stroke_pos
    }

    /// Length of the longest alternative.
    pub fn max_sequence_length(&self) -> usize {
        self.outlines.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Stroke at the current position from every alternative long enough to have one,
    /// in dictionary order.
    pub fn current_targets(&self) -> Vec<Chord> {
        self.outlines
            .iter()
            .filter_map(|alt| alt.get(self.stroke_pos).copied())
            .collect()
    }

    /// Targets that are still reachable by pressing more keys.
    pub fn compatible_strokes(&self, chord: Chord) -> Vec<Chord> {
        self.current_targets()
            .into_iter()
            .filter(|target| chord.is_subset(*target))
            .collect()
    }

    /// Target with the most keys in common with `chord`, preferring the
    /// smaller target, then the one listed first.
    pub fn nearest_stroke(&self, chord: Chord) -> Chord {
        let mut best: Option<(usize, usize, Chord)> = None;
        for target in self.current_targets() {
            let overlap = chord.intersection(target).len();
            let size = target.len();
            let better = match best {
                None => true,
                Some((best_overlap, best_size, _)) => {
                    overlap > best_overlap || (overlap == best_overlap && size < best_size)
                }
            };
            if better {
                best = Some((overlap, size, target));
            }
        }
        best.map(|(_, _, target)| target).unwrap_or(Chord::EMPTY)
    }

    /// Stroke used to classify keys as right or wrong: the tightest
    /// compatible target, or the nearest one when nothing is compatible.
    pub fn reference_stroke(&self, chord: Chord) -> Chord {
        // min_by_key keeps the first of equal elements.
        self.compatible_strokes(chord)
            .into_iter()
            .min_by_key(|target| target.len())
            .unwrap_or_else(|| self.nearest_stroke(chord))
    }

    pub fn key_colors(&self, chord: Chord, pressed: Chord) -> KeyColors {
        let reference = self.reference_stroke(chord);
        let mut colors = KeyColors::default();

        for key in StenoKey::ALL {
            let color = if !chord.contains(key) {
                KeyColor::Untouched
            } else if reference.contains(key) {
                if pressed.contains(key) {
                    KeyColor::CorrectHeld
                } else {
                    KeyColor::CorrectReleased
                }
            } else if pressed.contains(key) {
                KeyColor::WrongHeld
            } else {
                KeyColor::WrongReleased
            };
            colors.set(key, color);
        }

        colors
    }

    /// True when `chord` is exactly one of the current targets.
    pub fn evaluate_chord(&self, chord: Chord) -> bool {
        let hit = self.current_targets().contains(&chord);
        debug!(
            "Evaluate {} at stroke {}: {}",
            chord,
            self.stroke_pos,
            if hit { "match" } else { "miss" }
        );
        hit
    }

    /// Move to the next stroke after a correct chord.
    /// Returns true once the shortest alternative is exhausted.
    pub fn advance(&mut self) -> bool {
        self.stroke_pos += 1;
        self.outlines.iter().any(|alt| self.stroke_pos >= alt.len())
    }

    pub fn reset(&mut self) {
        self.stroke_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_outline, parse_stroke};
    use proptest::prelude::*;
    use StenoKey::*;

    fn chord(keys: &[StenoKey]) -> Chord {
        Chord::from_keys(keys)
    }

    fn evaluator(outlines: &[&str]) -> ChordEvaluator {
        ChordEvaluator::new(
            outlines
                .iter()
                .map(|o| parse_outline(o).expect("valid outline"))
                .collect(),
        )
    }

    // A = S-, B = -T, C = -S, D = *
    fn ab_ac() -> ChordEvaluator {
        ChordEvaluator::new(vec![
            vec![chord(&[LeftS, RightT])],
            vec![chord(&[LeftS, RightS])],
        ])
    }

    #[test]
    fn test_exact_match_completes_word() {
        let mut ev = ab_ac();
        assert!(ev.evaluate_chord(chord(&[LeftS, RightT])));
        assert!(ev.advance());
        assert_eq!(ev.stroke_position(), 1);
    }

    #[test]
    fn test_subset_is_not_a_match() {
        let ev = ab_ac();
        assert!(!ev.evaluate_chord(chord(&[LeftS])));
        assert!(!ev.evaluate_chord(chord(&[LeftS, RightT, RightS])));
    }

    #[test]
    fn test_miss_then_reset() {
        let mut ev = evaluator(&["PEUBG/KHUR"]);
        assert!(ev.evaluate_chord(parse_stroke("PEUBG").unwrap()));
        assert!(!ev.advance());
        assert!(!ev.evaluate_chord(chord(&[LeftS, Star])));
        ev.reset();
        assert_eq!(ev.stroke_position(), 0);
        assert_eq!(ev.current_targets(), vec![parse_stroke("PEUBG").unwrap()]);
    }

    #[test]
    fn test_compatible_strokes_both_supersets() {
        let ev = ab_ac();
        assert_eq!(
            ev.compatible_strokes(chord(&[LeftS])),
            vec![chord(&[LeftS, RightT]), chord(&[LeftS, RightS])]
        );
        assert_eq!(
            ev.compatible_strokes(chord(&[LeftS, RightS])),
            vec![chord(&[LeftS, RightS])]
        );
        assert!(ev.compatible_strokes(chord(&[Star])).is_empty());
    }

    #[test]
    fn test_reference_stroke_prefers_smaller_then_first() {
        let ev = ab_ac();
        // Equal sizes: first listed wins, every time.
        for _ in 0..3 {
            assert_eq!(
                ev.reference_stroke(chord(&[LeftS])),
                chord(&[LeftS, RightT])
            );
        }

        let ev = evaluator(&["KAT", "KA"]);
        assert_eq!(ev.reference_stroke(chord(&[LeftK])), parse_stroke("KA").unwrap());
    }

    #[test]
    fn test_nearest_stroke_overlap_then_size_then_order() {
        let ev = evaluator(&["KAT", "KA", "TA"]);
        // {K-, *}: KAT and KA both overlap 1; KA is smaller.
        assert_eq!(
            ev.nearest_stroke(chord(&[LeftK, Star])),
            parse_stroke("KA").unwrap()
        );
        // {K-, A, -T, *}: KAT overlaps 3.
        assert_eq!(
            ev.nearest_stroke(chord(&[LeftK, A, RightT, Star])),
            parse_stroke("KAT").unwrap()
        );

        // KA and TA tie on overlap and size; the first listed wins.
        let ev = evaluator(&["TA", "KA"]);
        assert_eq!(ev.nearest_stroke(chord(&[A, Star])), parse_stroke("TA").unwrap());
        let ev = evaluator(&["KA", "TA"]);
        assert_eq!(ev.nearest_stroke(chord(&[A, Star])), parse_stroke("KA").unwrap());
    }

    #[test]
    fn test_no_targets_yields_empty_reference() {
        let mut ev = evaluator(&["KAT"]);
        ev.advance();
        assert!(ev.current_targets().is_empty());
        assert_eq!(ev.reference_stroke(chord(&[LeftK])), Chord::EMPTY);
        assert!(!ev.evaluate_chord(chord(&[LeftK])));
    }

    #[test]
    fn test_mixed_length_alternatives() {
        // "the" style entry: single stroke or two strokes.
        let mut ev = evaluator(&["-T/-T", "THE"]);
        assert_eq!(ev.max_sequence_length(), 2);
        assert!(ev.evaluate_chord(parse_stroke("-T").unwrap()));
        // The one-stroke alternative is exhausted at position 1.
        assert!(ev.advance());

        let mut ev = evaluator(&["-T/-T", "-T/HE/STKPW"]);
        assert!(!ev.advance());
        assert!(ev.advance());
        // Only the three-stroke alternative has a third stroke.
        assert_eq!(ev.current_targets(), vec![parse_stroke("STKPW").unwrap()]);
    }

    #[test]
    fn test_key_colors_five_states() {
        let ev = evaluator(&["KAT"]);
        let c = chord(&[LeftK, A, Star]);
        let pressed = chord(&[A, Star]);
        let colors = ev.key_colors(c, pressed);

        assert_eq!(colors.get(LeftK), KeyColor::CorrectReleased);
        assert_eq!(colors.get(A), KeyColor::CorrectHeld);
        assert_eq!(colors.get(Star), KeyColor::WrongHeld);
        assert_eq!(colors.get(RightT), KeyColor::Untouched);

        let colors = ev.key_colors(c, Chord::EMPTY);
        assert_eq!(colors.get(Star), KeyColor::WrongReleased);
        assert_eq!(colors.keys_with(KeyColor::Untouched).len(), 20);
    }

    #[test]
    fn test_key_colors_use_tightest_compatible_target() {
        // Adding -T drops KA but KAT is still compatible, so -T is correct.
        // -S fits neither; the nearest target (KA, smaller) is the reference.
        let ev = evaluator(&["KAT", "KA"]);
        let colors = ev.key_colors(chord(&[LeftK, A, RightT]), chord(&[RightT]));
        assert_eq!(colors.get(RightT), KeyColor::CorrectHeld);

        let colors = ev.key_colors(chord(&[LeftK, A, RightS]), Chord::EMPTY);
        assert_eq!(colors.get(RightS), KeyColor::WrongReleased);
        assert_eq!(colors.get(LeftK), KeyColor::CorrectReleased);
    }

    fn arb_chord() -> impl Strategy<Value = Chord> {
        (0u32..(1 << 23)).prop_map(Chord::from_bits)
    }

    proptest! {
        #[test]
        fn prop_compatibility_narrows_as_keys_are_added(
            targets in prop::collection::vec(arb_chord(), 1..6),
            c1 in arb_chord(),
            extra in arb_chord(),
        ) {
            let ev = ChordEvaluator::new(targets.into_iter().map(|t| vec![t]).collect());
            let c2 = c1.union(extra);
            let wide = ev.compatible_strokes(c1);
            for stroke in ev.compatible_strokes(c2) {
                prop_assert!(wide.contains(&stroke));
            }
        }

        #[test]
        fn prop_colors_cover_chord(
            target in arb_chord(),
            c in arb_chord(),
            held in arb_chord(),
        ) {
            let ev = ChordEvaluator::new(vec![vec![target]]);
            let pressed = c.intersection(held);
            let colors = ev.key_colors(c, pressed);
            prop_assert_eq!(colors.keys_with(KeyColor::Untouched).len() + c.len(), 23);
            prop_assert_eq!(
                colors.keys_with(KeyColor::CorrectHeld).union(colors.keys_with(KeyColor::WrongHeld)),
                pressed
            );
        }
    }
}
