//! Control law root.
//!
//! Open-loop duty selection from the remaining distance. There is no
//! velocity feedback; the stall monitor covers motion faults.

pub mod duty;
