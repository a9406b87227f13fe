//! Helper items to assist the working of `aocheck`.

pub mod nucleus;
