//! Filter modules for image processing.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - borrow the input [`Image`](crate::buffer::Image), return a new one
//! - **Per channel** - RGB is three independent planes unless noted
//! - **Shape preserving** - output height, width and channels match the input
//!   (except `rgb_to_gray`, which drops to one channel)
//! - **Thread-safe** - rayon across channels and output pixels; results do
//!   not depend on scheduling
//!
//! ## Filter Categories
//!
//! | Module | Operations | Channels |
//! |--------|------------|----------|
//! | [`edge`] | sobel, prewitt, roberts, canny | 1 |
//! | [`denoise`] | average_filter, gaussian_filter, median_filter | 1 or 3 |
//! | [`frequency`] | low_pass, high_pass, magnitude_spectrum | 1 or 3 |
//! | [`noise`] | uniform, gaussian, salt-and-pepper | 1 or 3 |
//! | [`tone`] | equalize_hist, normalize, histogram | 1 or 3 |
//! | [`threshold`] | global_threshold (1 or 3), local_threshold (1) | see fn |
//! | [`grayscale`] | rgb_to_gray | 3 |
//! | [`hybrid`] | generate_hybrid_image | 1 or 3 |
//!
//! [`kernels`] and [`convolution`] are the shared building blocks of the
//! spatial filters.

pub mod kernels;
pub mod convolution;

pub mod edge;
pub mod denoise;
pub mod frequency;
pub mod noise;
pub mod tone;
pub mod threshold;
pub mod grayscale;
pub mod hybrid;
