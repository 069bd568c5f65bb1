//! Precomputed attack tables.
//!
//! Leaper pieces (knights, kings, pawns) get one mask per square. Sliders are
//! resolved by walking precomputed rays and cutting them at the first blocker.

use once_cell::sync::Lazy;

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn leaper_table(deltas: &[(isize, isize)]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        let mut mask = 0u64;
        for &(dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                mask |= 1u64 << ((nr as usize) * 8 + (nf as usize));
            }
        }
        *slot = mask;
    }
    attacks
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| leaper_table(&KNIGHT_DELTAS));

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| leaper_table(&KING_DELTAS));

/// `PAWN_ATTACKS[color][sq]`: squares a pawn of `color` on `sq` attacks
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    [
        leaper_table(&[(1, -1), (1, 1)]),
        leaper_table(&[(-1, -1), (-1, 1)]),
    ]
});

pub(crate) const DIR_N: usize = 0;
pub(crate) const DIR_S: usize = 1;
pub(crate) const DIR_E: usize = 2;
pub(crate) const DIR_W: usize = 3;
pub(crate) const DIR_NE: usize = 4;
pub(crate) const DIR_NW: usize = 5;
pub(crate) const DIR_SE: usize = 6;
pub(crate) const DIR_SW: usize = 7;

const STRAIGHT_DIRS: [usize; 4] = [DIR_N, DIR_S, DIR_E, DIR_W];
const DIAGONAL_DIRS: [usize; 4] = [DIR_NE, DIR_NW, DIR_SE, DIR_SW];

static RAYS: Lazy<[[u64; 64]; 8]> = Lazy::new(|| {
    let mut rays = [[0u64; 64]; 8];
    let dirs = [
        (1, 0),   // N
        (-1, 0),  // S
        (0, 1),   // E
        (0, -1),  // W
        (1, 1),   // NE
        (1, -1),  // NW
        (-1, 1),  // SE
        (-1, -1), // SW
    ];
    for (d, (dr, df)) in dirs.iter().enumerate() {
        for sq in 0..64 {
            let r = (sq / 8) as isize;
            let f = (sq % 8) as isize;
            let mut mask = 0u64;
            let mut nr = r + dr;
            let mut nf = f + df;
            while (0..8).contains(&nr) && (0..8).contains(&nf) {
                mask |= 1u64 << ((nr as usize) * 8 + (nf as usize));
                nr += dr;
                nf += df;
            }
            rays[d][sq] = mask;
        }
    }
    rays
});

fn is_increasing_dir(dir: usize) -> bool {
    matches!(dir, DIR_N | DIR_E | DIR_NE | DIR_NW)
}

fn nearest_blocker_idx(dir: usize, blockers: u64) -> usize {
    if is_increasing_dir(dir) {
        blockers.trailing_zeros() as usize
    } else {
        63 - blockers.leading_zeros() as usize
    }
}

/// Squares reached along one ray, up to and including the first blocker
fn ray_attacks(from_idx: usize, dir: usize, occupancy: u64) -> u64 {
    let ray = RAYS[dir][from_idx];
    let blockers = ray & occupancy;
    if blockers == 0 {
        return ray;
    }
    let blocker_idx = nearest_blocker_idx(dir, blockers);
    ray ^ RAYS[dir][blocker_idx]
}

/// Attack set of a bishop (`diagonal`) or rook from `from_idx` given the occupancy.
/// Own pieces are included; callers mask them out.
pub(crate) fn slider_attacks(from_idx: usize, occupancy: u64, diagonal: bool) -> u64 {
    let dirs = if diagonal {
        &DIAGONAL_DIRS
    } else {
        &STRAIGHT_DIRS
    };
    dirs.iter()
        .fold(0u64, |acc, &dir| acc | ray_attacks(from_idx, dir, occupancy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(s: &str) -> usize {
        s.parse::<crate::board::Square>().unwrap().as_index()
    }

    fn bit(s: &str) -> u64 {
        1u64 << idx(s)
    }

    #[test]
    fn test_knight_corner_and_center() {
        assert_eq!(KNIGHT_ATTACKS[idx("a1")], bit("b3") | bit("c2"));
        assert_eq!(KNIGHT_ATTACKS[idx("d4")].count_ones(), 8);
    }

    #[test]
    fn test_king_edges() {
        assert_eq!(KING_ATTACKS[idx("h8")], bit("g8") | bit("g7") | bit("h7"));
        assert_eq!(KING_ATTACKS[idx("e4")].count_ones(), 8);
    }

    #[test]
    fn test_pawn_attacks_by_color() {
        assert_eq!(PAWN_ATTACKS[0][idx("e4")], bit("d5") | bit("f5"));
        assert_eq!(PAWN_ATTACKS[1][idx("e4")], bit("d3") | bit("f3"));
        assert_eq!(PAWN_ATTACKS[0][idx("a2")], bit("b3"));
    }

    #[test]
    fn test_slider_stops_at_blocker() {
        let occupancy = bit("d6") | bit("f4");
        let rook = slider_attacks(idx("d4"), occupancy, false);
        assert_ne!(rook & bit("d6"), 0);
        assert_eq!(rook & bit("d7"), 0);
        assert_ne!(rook & bit("f4"), 0);
        assert_eq!(rook & bit("g4"), 0);
        assert_ne!(rook & bit("a4"), 0);
        assert_ne!(rook & bit("d1"), 0);
        assert_eq!(rook.count_ones(), 2 + 2 + 3 + 3);
    }

    #[test]
    fn test_bishop_empty_board() {
        assert_eq!(slider_attacks(idx("a1"), 0, true).count_ones(), 7);
        assert_eq!(slider_attacks(idx("d4"), 0, true).count_ones(), 13);
    }
}
