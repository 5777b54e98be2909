//! `ev-binning`: traffic volume bands for map rendering.
//!
//! | Module     | Contents                                             |
//! |------------|------------------------------------------------------|
//! | [`binner`] | `VolumeBinner`, `Band`, `BinnedVolume`, median fill  |
//! | [`error`]  | `BinError`, `BinResult<T>`                           |

pub mod binner;
pub mod error;


pub use binner::{Band, BinnedVolume, VolumeBinner, median, median_fill};
pub use error::{BinError, BinResult};
