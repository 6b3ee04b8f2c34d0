//! Background loops.

pub mod tick_loop;
