//! Network weights and inference.

use std::fs;
use std::path::Path;

use crate::board::error::NetError;
use crate::board::{Color, Piece, Square};

use super::{INPUT_QUANT, L1_QUANT, NETWORK_SCALE};

/// Input feature count: 6 piece kinds x 2 colors x 64 squares
pub const INPUT_SIZE: usize = 768;

/// Feature transformer width
pub const L1: usize = 1792;

/// First dense layer width
pub const L2: usize = 16;

/// Second dense layer width
pub const L3: usize = 32;

/// Number of king-placement weight matrices per perspective
pub const KING_BUCKETS: usize = 12;

/// Number of material-keyed output heads
pub const OUTPUT_BUCKETS: usize = 8;

/// Network weights, parsed from the raw little-endian blob.
///
/// Section order matches the file byte layout exactly:
/// feature weights, feature biases, then the dense layers front to back.
pub struct Network {
    /// `int16[KING_BUCKETS][INPUT_SIZE][L1]`
    feature_weights: Vec<i16>,
    /// `int16[L1]`
    feature_bias: Vec<i16>,
    /// `int8[OUTPUT_BUCKETS][L1][L2]`
    l1_weights: Vec<i8>,
    /// `float[OUTPUT_BUCKETS][L2]`
    l1_bias: Vec<f32>,
    /// `float[OUTPUT_BUCKETS][2][L2][L3]`
    l2_weights: Vec<f32>,
    /// `float[OUTPUT_BUCKETS][L3]`
    l2_bias: Vec<f32>,
    /// `float[OUTPUT_BUCKETS][L3]`
    l3_weights: Vec<f32>,
    /// `float[OUTPUT_BUCKETS]`
    l3_bias: Vec<f32>,
}

impl Network {
    /// Exact byte size of a weights blob for the configured dimensions.
    #[must_use]
    pub const fn blob_size() -> usize {
        KING_BUCKETS * INPUT_SIZE * L1 * 2
            + L1 * 2
            + OUTPUT_BUCKETS * L1 * L2
            + OUTPUT_BUCKETS * L2 * 4
            + OUTPUT_BUCKETS * 2 * L2 * L3 * 4
            + OUTPUT_BUCKETS * L3 * 4
            + OUTPUT_BUCKETS * L3 * 4
            + OUTPUT_BUCKETS * 4
    }

    /// Load weights from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NetError> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Parse weights from a raw byte blob. Anything shorter than the exact
    /// computed size is rejected; trailing bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, NetError> {
        if data.len() < Self::blob_size() {
            return Err(NetError::Truncated {
                expected: Self::blob_size(),
                found: data.len(),
            });
        }

        let mut offset = 0usize;
        let feature_weights = read_i16(data, &mut offset, KING_BUCKETS * INPUT_SIZE * L1);
        let feature_bias = read_i16(data, &mut offset, L1);
        let l1_weights = read_i8(data, &mut offset, OUTPUT_BUCKETS * L1 * L2);
        let l1_bias = read_f32(data, &mut offset, OUTPUT_BUCKETS * L2);
        let l2_weights = read_f32(data, &mut offset, OUTPUT_BUCKETS * 2 * L2 * L3);
        let l2_bias = read_f32(data, &mut offset, OUTPUT_BUCKETS * L3);
        let l3_weights = read_f32(data, &mut offset, OUTPUT_BUCKETS * L3);
        let l3_bias = read_f32(data, &mut offset, OUTPUT_BUCKETS);

        Ok(Network {
            feature_weights,
            feature_bias,
            l1_weights,
            l1_bias,
            l2_weights,
            l2_bias,
            l3_weights,
            l3_bias,
        })
    }

    /// Feature transformer column for `feature` under `bucket`, length L1
    #[inline]
    pub(crate) fn feature_column(&self, bucket: usize, feature: usize) -> &[i16] {
        let start = (bucket * INPUT_SIZE + feature) * L1;
        &self.feature_weights[start..start + L1]
    }

    #[inline]
    pub(crate) fn feature_bias(&self) -> &[i16] {
        &self.feature_bias
    }

    /// Run the MLP tail over a pair of perspective accumulators.
    ///
    /// Returns centipawns, positive for the "us" perspective.
    pub(crate) fn evaluate(&self, us: &[i16; L1], them: &[i16; L1], bucket: usize) -> i32 {
        let mut l2_act = [[0f32; L2]; 2];

        for (p, acc) in [us, them].into_iter().enumerate() {
            let mut sums = [0i32; L2];
            for (i, &raw) in acc.iter().enumerate() {
                let clipped = i32::from(raw).clamp(0, INPUT_QUANT);
                if clipped == 0 {
                    continue;
                }
                let row = (bucket * L1 + i) * L2;
                for (j, sum) in sums.iter_mut().enumerate() {
                    *sum += clipped * i32::from(self.l1_weights[row + j]);
                }
            }
            for j in 0..L2 {
                let v = sums[j] as f32 / L1_QUANT as f32 + self.l1_bias[bucket * L2 + j];
                l2_act[p][j] = v.max(0.0);
            }
        }

        let mut out = self.l3_bias[bucket];
        for k in 0..L3 {
            let mut sum = self.l2_bias[bucket * L3 + k];
            for p in 0..2 {
                let base = ((bucket * 2 + p) * L2) * L3;
                for j in 0..L2 {
                    sum += l2_act[p][j] * self.l2_weights[base + j * L3 + k];
                }
            }
            out += sum.max(0.0) * self.l3_weights[bucket * L3 + k];
        }

        (out * NETWORK_SCALE) as i32
    }
}

fn read_i16(data: &[u8], offset: &mut usize, count: usize) -> Vec<i16> {
    let bytes = &data[*offset..*offset + count * 2];
    *offset += count * 2;
    bytes
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect()
}

fn read_i8(data: &[u8], offset: &mut usize, count: usize) -> Vec<i8> {
    let bytes = &data[*offset..*offset + count];
    *offset += count;
    bytes.iter().map(|&b| b as i8).collect()
}

fn read_f32(data: &[u8], offset: &mut usize, count: usize) -> Vec<f32> {
    let bytes = &data[*offset..*offset + count * 4];
    *offset += count * 4;
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Feature index of a piece from one perspective. The black perspective
/// mirrors ranks and swaps piece colors.
#[inline]
pub(crate) fn feature_index(
    piece: Piece,
    piece_color: Color,
    sq: Square,
    perspective: Color,
) -> usize {
    let (oriented_sq, oriented_color) = if perspective == Color::Black {
        (sq.index() ^ 56, piece_color.opponent())
    } else {
        (sq.index(), piece_color)
    };
    oriented_color.index() * 384 + piece.index() * 64 + oriented_sq
}

/// King-placement bucket for a perspective: four wide buckets on the back
/// ranks, then one bucket pair per advanced rank, split at the d/e border.
#[inline]
pub(crate) fn king_bucket(king_sq: Square, perspective: Color) -> usize {
    let mut rank = king_sq.rank();
    if perspective == Color::Black {
        rank = 7 - rank;
    }
    let base = if rank < 4 { 0 } else { 2 + 2 * (rank - 4) };
    base + usize::from(king_sq.file() >= 4)
}
