//! A parser for the game data stored in Descent `.pig` files.
//!
//! Only the parts needed to reach the polygon models are decoded. Everything else is skipped
//! using the fixed table layout of the format.

pub mod cursor;
pub mod fix;
pub mod gamedata;
pub mod polymodel;
pub mod robot;
pub mod ship;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

