//! Attack tables for move generation.
//!
//! Leaper attacks (pawn, knight, king) come from small precomputed tables.
//! Sliding attacks (bishop, rook, queen) use magic bitboards: per square a
//! blocker mask, a magic multiplier and a shift map any occupancy to a slot
//! in a flat attack table via `((occ & mask) * magic) >> shift`.
//!
//! Magic multipliers are found once at startup by fixed-seed random trial,
//! so two engine instances always build identical tables. Every subset of a
//! blocker mask is enumerated through parallel bit deposit and its slot is
//! filled from a slow ray-walking reference generator.

mod tables;

pub(crate) use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};

use once_cell::sync::Lazy;
use rand::prelude::*;

use super::types::pdep;

const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

static ROOK_TABLE: Lazy<MagicTable> = Lazy::new(|| MagicTable::build(&ROOK_DIRS, 0xD00B_1E5E_ED00_0001));
static BISHOP_TABLE: Lazy<MagicTable> = Lazy::new(|| MagicTable::build(&BISHOP_DIRS, 0xD00B_1E5E_ED00_0002));

/// Per-square magic lookup parameters.
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

/// Flat attack table shared by all 64 squares, plus per-square entries.
/// The flat layout keeps slots for neighbouring indices in one allocation.
struct MagicTable {
    entries: Vec<MagicEntry>,
    attacks: Vec<u64>,
}

/// Relevant blocker mask: ray squares excluding the board edge in each
/// direction (an edge blocker never changes the attack set).
fn blocker_mask(sq: usize, dirs: &[(isize, isize); 4]) -> u64 {
    let rank = (sq / 8) as isize;
    let file = (sq % 8) as isize;
    let mut mask = 0u64;
    for &(dr, df) in dirs {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << ((r as usize) * 8 + f as usize);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Slow reference generator: walk each ray until a blocker is hit.
fn ray_attacks(sq: usize, occupancy: u64, dirs: &[(isize, isize); 4]) -> u64 {
    let rank = (sq / 8) as isize;
    let file = (sq % 8) as isize;
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << ((r as usize) * 8 + f as usize);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

impl MagicTable {
    fn build(dirs: &[(isize, isize); 4], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut entries = Vec::with_capacity(64);
        let mut attacks: Vec<u64> = Vec::new();

        for sq in 0..64 {
            let mask = blocker_mask(sq, dirs);
            let bits = mask.count_ones();
            let shift = 64 - bits;
            let size = 1usize << bits;

            // Every blocker subset paired with its reference attack set
            let subsets: Vec<(u64, u64)> = (0..size as u64)
                .map(|i| {
                    let blockers = pdep(i, mask);
                    (blockers, ray_attacks(sq, blockers, dirs))
                })
                .collect();

            let magic = find_magic(&mut rng, mask, shift, &subsets);

            let offset = attacks.len();
            attacks.resize(offset + size, 0);
            for &(blockers, attack) in &subsets {
                let idx = magic_index(blockers, magic, shift);
                attacks[offset + idx] = attack;
            }

            entries.push(MagicEntry {
                mask,
                magic,
                shift,
                offset,
            });
        }

        MagicTable { entries, attacks }
    }

    #[inline]
    fn lookup(&self, sq: usize, occupancy: u64) -> u64 {
        let entry = &self.entries[sq];
        let idx = magic_index(occupancy & entry.mask, entry.magic, entry.shift);
        self.attacks[entry.offset + idx]
    }
}

#[inline]
fn magic_index(blockers: u64, magic: u64, shift: u32) -> usize {
    (blockers.wrapping_mul(magic) >> shift) as usize
}

/// Search for a multiplier that maps every blocker subset to a distinct
/// slot, or to a slot already holding the same attack set (a constructive
/// collision). Sparse candidates converge within a few thousand trials.
fn find_magic(rng: &mut StdRng, mask: u64, shift: u32, subsets: &[(u64, u64)]) -> u64 {
    // Attack sets never cover the whole board, so all-ones marks a free slot
    const FREE: u64 = !0;
    let size = subsets.len();
    let mut slots = vec![FREE; size];

    loop {
        let candidate = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(candidate) >> 56).count_ones() < 6 {
            continue;
        }

        slots.fill(FREE);
        let mut ok = true;
        for &(blockers, attack) in subsets {
            let idx = magic_index(blockers, candidate, shift);
            if slots[idx] == FREE {
                slots[idx] = attack;
            } else if slots[idx] != attack {
                ok = false;
                break;
            }
        }
        if ok {
            return candidate;
        }
    }
}

/// Rook attacks from `sq` given board occupancy
#[inline]
pub(crate) fn rook_attacks(sq: usize, occupancy: u64) -> u64 {
    ROOK_TABLE.lookup(sq, occupancy)
}

/// Bishop attacks from `sq` given board occupancy
#[inline]
pub(crate) fn bishop_attacks(sq: usize, occupancy: u64) -> u64 {
    BISHOP_TABLE.lookup(sq, occupancy)
}

/// Queen attacks from `sq` given board occupancy
#[inline]
pub(crate) fn queen_attacks(sq: usize, occupancy: u64) -> u64 {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}
