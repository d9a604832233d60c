//! Quantized neural evaluation.
//!
//! A perspective-oriented feature transformer with king buckets feeds a
//! small MLP with output buckets:
//!
//! `(768 -> 1792) x 2 perspectives -> 16 -> 32 -> 1`
//!
//! The first layer is maintained incrementally by [`AccumulatorStack`];
//! the float tail is recomputed per evaluation. Weights are consumed from
//! a raw little-endian blob with no header.

pub mod accumulator;
pub mod network;

pub use accumulator::AccumulatorStack;
pub use network::Network;

/// Clip applied to accumulator activations before the first dense layer
pub const INPUT_QUANT: i32 = 362;

/// Quantization divisor for the int8 first dense layer
pub const L1_QUANT: i32 = 64;

/// Scale from network output to centipawns
pub const NETWORK_SCALE: f32 = 400.0;
