//! ImageLab Rust Core
//!
//! Per-pixel image transforms on in-memory 8-bit raster buffers, with
//! optional Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Filters work on [`Image`] buffers shaped `(height, width, channels)`:
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//!
//! Every operation is a pure, synchronous call: it borrows its inputs and
//! returns a new buffer. Nothing is cached between calls.
//!
//! ## Example
//! ```
//! use imagelab_rust::{filters, Image};
//!
//! let rgb = Image::from_raw(2, 1, 3, vec![255, 0, 0, 0, 0, 255]).unwrap();
//! let gray = filters::grayscale::rgb_to_gray(&rgb).unwrap();
//! let edges = filters::edge::sobel(&gray).unwrap();
//! assert_eq!(edges.shape(), (1, 2, 1));
//! ```
//!
//! ## Logging
//! Operations report through the `log` facade at `debug` level. The crate
//! never installs a logger.

pub mod buffer;
pub mod error;
pub mod filters;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::Image;
pub use error::{FilterError, Result};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::Image;
    use crate::error::FilterError;
    use crate::filters::edge::{self, CannyParams};
    use crate::filters::{denoise, frequency, grayscale, hybrid, noise, tone};
    use crate::filters::threshold as threshold_mod;

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    type PyImage<'py> = PyResult<Bound<'py, PyArray3<u8>>>;

    fn to_image(image: PyReadonlyArray3<'_, u8>) -> PyResult<Image> {
        Ok(Image::from_array(image.as_array().to_owned())?)
    }

    fn to_py(py: Python<'_>, image: Image) -> Bound<'_, PyArray3<u8>> {
        image.into_array().into_pyarray(py)
    }

    // ========================================================================
    // Edge Detection
    // ========================================================================

    /// Sobel gradient magnitude of a (H, W, 1) image.
    #[pyfunction]
    pub fn sobel<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyImage<'py> {
        Ok(to_py(py, edge::sobel(&to_image(image)?)?))
    }

    /// Prewitt gradient magnitude of a (H, W, 1) image.
    #[pyfunction]
    pub fn prewitt<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyImage<'py> {
        Ok(to_py(py, edge::prewitt(&to_image(image)?)?))
    }

    /// Roberts cross gradient magnitude of a (H, W, 1) image.
    #[pyfunction]
    pub fn roberts<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyImage<'py> {
        Ok(to_py(py, edge::roberts(&to_image(image)?)?))
    }

    /// Canny edges of a (H, W, 1) image.
    ///
    /// # Arguments
    /// * `image` - Grayscale input
    /// * `low_threshold` - Hysteresis lower bound (default: 100)
    /// * `high_threshold` - Hysteresis upper bound (default: 200)
    /// * `aperture_size` - Sobel aperture, only 3 is supported
    /// * `l2_gradient` - Request the L2 gradient norm
    #[pyfunction]
    #[pyo3(signature = (image, low_threshold=100.0, high_threshold=200.0, aperture_size=3, l2_gradient=false))]
    pub fn canny<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        low_threshold: f32,
        high_threshold: f32,
        aperture_size: u8,
        l2_gradient: bool,
    ) -> PyImage<'py> {
        let params = CannyParams {
            low_threshold,
            high_threshold,
            aperture_size,
            use_l2_gradient: l2_gradient,
        };
        Ok(to_py(py, edge::canny(&to_image(image)?, &params)?))
    }

    // ========================================================================
    // Denoise
    // ========================================================================

    /// Mean filter with a `kernel_size` square window.
    #[pyfunction]
    #[pyo3(signature = (image, kernel_size=3))]
    pub fn average_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel_size: usize,
    ) -> PyImage<'py> {
        Ok(to_py(py, denoise::average_filter(&to_image(image)?, kernel_size)?))
    }

    /// Gaussian filter with a generated `(kernel_size, sigma)` kernel.
    #[pyfunction]
    #[pyo3(signature = (image, kernel_size=3, sigma=1.0))]
    pub fn gaussian_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel_size: usize,
        sigma: f64,
    ) -> PyImage<'py> {
        Ok(to_py(py, denoise::gaussian_filter(&to_image(image)?, kernel_size, sigma)?))
    }

    /// Median filter with a `kernel_size` square window.
    #[pyfunction]
    #[pyo3(signature = (image, kernel_size=3))]
    pub fn median_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel_size: usize,
    ) -> PyImage<'py> {
        Ok(to_py(py, denoise::median_filter(&to_image(image)?, kernel_size)?))
    }

    // ========================================================================
    // Frequency Domain
    // ========================================================================

    #[pyfunction]
    pub fn low_pass<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, radius: f64) -> PyImage<'py> {
        Ok(to_py(py, frequency::low_pass(&to_image(image)?, radius)?))
    }

    #[pyfunction]
    pub fn high_pass<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, radius: f64) -> PyImage<'py> {
        Ok(to_py(py, frequency::high_pass(&to_image(image)?, radius)?))
    }

    /// Centered log-magnitude spectrum, stretched to 0-255.
    #[pyfunction]
    pub fn magnitude_spectrum<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyImage<'py> {
        Ok(to_py(py, frequency::magnitude_spectrum(&to_image(image)?)))
    }

    // ========================================================================
    // Noise
    // ========================================================================

    /// Uniform noise in `[-amount * 100, amount * 100]`.
    #[pyfunction]
    #[pyo3(signature = (image, amount=0.5, seed=None))]
    pub fn uniform_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: f64,
        seed: Option<u64>,
    ) -> PyImage<'py> {
        Ok(to_py(py, noise::add_uniform_noise(&to_image(image)?, amount, seed)?))
    }

    #[pyfunction]
    #[pyo3(signature = (image, mean=0.0, stddev=0.5, seed=None))]
    pub fn gaussian_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mean: f64,
        stddev: f64,
        seed: Option<u64>,
    ) -> PyImage<'py> {
        Ok(to_py(py, noise::add_gaussian_noise(&to_image(image)?, mean, stddev, seed)?))
    }

    /// Salt-and-pepper impulses; color images get single-channel speckle.
    #[pyfunction]
    #[pyo3(signature = (image, amount=0.5, seed=None))]
    pub fn salt_pepper_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: f64,
        seed: Option<u64>,
    ) -> PyImage<'py> {
        Ok(to_py(py, noise::add_salt_and_pepper_noise(&to_image(image)?, amount, seed)?))
    }

    // ========================================================================
    // Tone Mapping
    // ========================================================================

    #[pyfunction]
    pub fn equalize_hist<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyImage<'py> {
        Ok(to_py(py, tone::equalize_hist(&to_image(image)?)))
    }

    #[pyfunction]
    pub fn normalize<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyImage<'py> {
        Ok(to_py(py, tone::normalize(&to_image(image)?)))
    }

    /// One 256-bin histogram per channel.
    #[pyfunction]
    pub fn histogram(image: PyReadonlyArray3<'_, u8>) -> PyResult<Vec<Vec<u64>>> {
        let hists = tone::histogram(&to_image(image)?);
        Ok(hists.iter().map(|h| h.to_vec()).collect())
    }

    // ========================================================================
    // Thresholding
    // ========================================================================

    #[pyfunction]
    pub fn global_threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        threshold: u8,
    ) -> PyImage<'py> {
        Ok(to_py(py, threshold_mod::global_threshold(&to_image(image)?, threshold)))
    }

    /// Adaptive mean threshold of a (H, W, 1) image.
    #[pyfunction]
    #[pyo3(signature = (image, block_size, c=0.0))]
    pub fn local_threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        block_size: usize,
        c: f64,
    ) -> PyImage<'py> {
        Ok(to_py(py, threshold_mod::local_threshold(&to_image(image)?, block_size, c)?))
    }

    // ========================================================================
    // Color Reduction and Hybrid
    // ========================================================================

    /// BT.709 luminance of a (H, W, 3) image, returned as (H, W, 1).
    #[pyfunction]
    pub fn rgb_to_gray<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyImage<'py> {
        Ok(to_py(py, grayscale::rgb_to_gray(&to_image(image)?)?))
    }

    /// Blend the low frequencies of `low_image` with the high frequencies of `high_image`.
    #[pyfunction]
    #[pyo3(signature = (low_image, high_image, low_radius=20.0, high_radius=5.0))]
    pub fn generate_hybrid<'py>(
        py: Python<'py>,
        low_image: PyReadonlyArray3<'py, u8>,
        high_image: PyReadonlyArray3<'py, u8>,
        low_radius: f64,
        high_radius: f64,
    ) -> PyImage<'py> {
        let low = to_image(low_image)?;
        let high = to_image(high_image)?;
        Ok(to_py(
            py,
            hybrid::generate_hybrid_image(&low, &high, low_radius, high_radius)?,
        ))
    }

    /// Python module definition
    #[pymodule]
    pub fn imagelab_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Edge detection
        m.add_function(wrap_pyfunction!(sobel, m)?)?;
        m.add_function(wrap_pyfunction!(prewitt, m)?)?;
        m.add_function(wrap_pyfunction!(roberts, m)?)?;
        m.add_function(wrap_pyfunction!(canny, m)?)?;

        // Denoise
        m.add_function(wrap_pyfunction!(average_filter, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_filter, m)?)?;
        m.add_function(wrap_pyfunction!(median_filter, m)?)?;

        // Frequency domain
        m.add_function(wrap_pyfunction!(low_pass, m)?)?;
        m.add_function(wrap_pyfunction!(high_pass, m)?)?;
        m.add_function(wrap_pyfunction!(magnitude_spectrum, m)?)?;

        // Noise
        m.add_function(wrap_pyfunction!(uniform_noise, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_noise, m)?)?;
        m.add_function(wrap_pyfunction!(salt_pepper_noise, m)?)?;

        // Tone mapping
        m.add_function(wrap_pyfunction!(equalize_hist, m)?)?;
        m.add_function(wrap_pyfunction!(normalize, m)?)?;
        m.add_function(wrap_pyfunction!(histogram, m)?)?;

        // Thresholding
        m.add_function(wrap_pyfunction!(global_threshold, m)?)?;
        m.add_function(wrap_pyfunction!(local_threshold, m)?)?;

        // Color reduction and hybrid images
        m.add_function(wrap_pyfunction!(rgb_to_gray, m)?)?;
        m.add_function(wrap_pyfunction!(generate_hybrid, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imagelab_rust;
