//! Chaotic keystream generators.
//!
//! Three independent deterministic maps back the cipher's key material: the
//! 1-D logistic map, the 4-D Jia continuous system (integrated with RK4),
//! and a 3-D discrete Arnold cat map. Each generator is pure and
//! restartable: the same seeds, burn-in, and length always reproduce the
//! same finite sequence, on every IEEE-754 platform.
//!
//! None of the expressions here may be algebraically reassociated or fused;
//! encrypt and decrypt regenerate these sequences independently and must
//! agree bit-for-bit.

pub mod arnold;
pub mod jia;
pub mod logistic;
