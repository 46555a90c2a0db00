use crate::types::SpliceRange;

/// Resolves a slice bound the way a sliced string does: negative values count
/// back from the end, anything past either end is pinned to it.
fn slice_bound(index: i64, len: usize) -> usize {
    if index < 0 {
        (len as i64).saturating_add(index).max(0) as usize
    } else {
        (index as usize).min(len)
    }
}

/// Deletes one 1-based inclusive range: `seq[..start - 1] + seq[end..]`.
///
/// When `end < start - 1` the head and tail overlap and the shared part is kept
/// twice. That only happens for inverted ranges and is left as is.
pub fn delete_range(sequence: &[u8], range: SpliceRange) -> Vec<u8> {
    let head = slice_bound(range.start.saturating_sub(1), sequence.len());
    let tail = slice_bound(range.end, sequence.len());

    let mut out = Vec::with_capacity(head + (sequence.len() - tail));
    out.extend_from_slice(&sequence[..head]);
    out.extend_from_slice(&sequence[tail..]);
    out
}

/// Returns `ranges` in the order they are cut: descending start, ties in input order.
pub fn cut_order(ranges: &[SpliceRange]) -> Vec<SpliceRange> {
    let mut ordered = ranges.to_vec();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));
    ordered
}

/// Applies every range to `sequence`, rightmost start first, each cut made on
/// the already shortened sequence.
///
/// For non-overlapping ranges this equals removing them all from the original
/// at once. Overlapping ranges are not merged; their result depends on the cut
/// order.
pub fn apply_splices(sequence: &[u8], ranges: &[SpliceRange]) -> Vec<u8> {
    cut_order(ranges)
        .into_iter()
        .fold(sequence.to_vec(), |current, range| delete_range(&current, range))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splice(seq: &str, ranges: &[(i64, i64)]) -> String {
        let ranges: Vec<_> = ranges.iter().map(|&(s, e)| SpliceRange::new(s, e)).collect();
        String::from_utf8(apply_splices(seq.as_bytes(), &ranges)).unwrap()
    }

    #[test]
    fn test_single_range() {
        assert_eq!(splice("ACGTACGTAC", &[(3, 5)]), "ACCGTAC");
        assert_eq!(splice("ACGTACGTAC", &[(1, 1)]), "CGTACGTAC");
        assert_eq!(splice("ACGTACGTAC", &[(10, 10)]), "ACGTACGTA");
        assert_eq!(splice("ACGTACGTAC", &[(1, 10)]), "");
    }

    #[test]
    fn test_single_range_length() {
        let seq = "AAAACCCCGGGGTTTT";
        let out = splice(seq, &[(5, 12)]);
        assert_eq!(out.len(), seq.len() - (12 - 5 + 1));
        assert_eq!(out, "AAAATTTT");
    }

    #[test]
    fn test_non_overlapping_ranges_match_simultaneous_removal() {
        let seq = "0123456789ABCDEF";
        // Input order should not matter.
        let out = splice(seq, &[(2, 3), (11, 12), (6, 8)]);
        let expected: String = seq
            .chars()
            .enumerate()
            .filter(|(i, _)| {
                let pos = *i as i64 + 1;
                !((2..=3).contains(&pos) || (6..=8).contains(&pos) || (11..=12).contains(&pos))
            })
            .map(|(_, c)| c)
            .collect();
        assert_eq!(out, expected);
        assert_eq!(out, "03489CDEF");
    }

    #[test]
    fn test_overlapping_ranges_follow_cut_order() {
        // (5,8) goes first, leaving "012389"; (3,6) then runs off the end.
        assert_eq!(splice("0123456789", &[(3, 6), (5, 8)]), "01");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranges = [SpliceRange::new(4, 5), SpliceRange::new(4, 4)];
        assert_eq!(cut_order(&ranges), ranges.to_vec());
        assert_eq!(splice("0123456789", &[(4, 5), (4, 4)]), "0126789");
    }

    #[test]
    fn test_out_of_bounds_ranges_are_clamped() {
        assert_eq!(splice("ACGT", &[(3, 100)]), "AC");
        assert_eq!(splice("ACGT", &[(10, 12)]), "ACGT");
    }

    #[test]
    fn test_zero_and_negative_bounds_slice_from_the_end() {
        // start 0 gives a head of seq[..-1], i.e. everything but the last base.
        assert_eq!(splice("ACGT", &[(0, 2)]), "ACGGT");
        assert_eq!(splice("ACGT", &[(2, -1)]), "AT");
    }

    #[test]
    fn test_inverted_range_duplicates_overlap() {
        assert_eq!(splice("ACGTAC", &[(5, 2)]), "ACGTGTAC");
    }

    #[test]
    fn test_no_ranges_is_identity() {
        assert_eq!(splice("ACGT", &[]), "ACGT");
    }
}
