pub mod rounding;

pub use rounding::{round_to, round_money, round_weight};
