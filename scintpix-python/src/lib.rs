//! scintpix-python: PyO3 Python bindings for scintpix.
#![allow(
    clippy::doc_markdown,
    clippy::needless_pass_by_value,
    clippy::type_complexity
)]
//!
//! Exposes record import and image normalization as numpy arrays for the
//! Python model-training code.

use numpy::{IntoPyArray, PyArray1, PyArray2, PyArray3, PyArrayDyn, PyReadonlyArrayDyn};
use pyo3::prelude::*;
use scintpix_io::{DecoderConfig, RecordDecoder};

fn io_error(context: &str, err: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyIOError::new_err(format!("{context}: {err}"))
}

fn value_error(context: &str, err: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(format!("{context}: {err}"))
}

fn decode_error(context: &str, err: scintpix_io::Error) -> PyErr {
    match err {
        scintpix_io::Error::FileAccess { .. } | scintpix_io::Error::Io(_) => io_error(context, err),
        _ => value_error(context, err),
    }
}

/// Import a scintillator record file.
///
/// Returns ``(images, energies, positions, labels)`` with shapes
/// ``(n, 16, 16)``, ``(n, 2)``, ``(n, 4)`` and ``(n,)``. With ``num_samples``
/// a random, label-balanced selection of that many events is returned.
#[pyfunction]
#[pyo3(signature = (path, num_samples=None, seed=None))]
fn import_data<'py>(
    py: Python<'py>,
    path: &str,
    num_samples: Option<usize>,
    seed: Option<u64>,
) -> PyResult<(
    Bound<'py, PyArray3<f64>>,
    Bound<'py, PyArray2<f64>>,
    Bound<'py, PyArray2<f64>>,
    Bound<'py, PyArray1<u8>>,
)> {
    let config = DecoderConfig { num_samples, seed };
    let dataset = py
        .allow_threads(|| RecordDecoder::new().with_config(config).decode(path))
        .map_err(|e| decode_error(&format!("import_data: {path}"), e))?;

    let (images, energies, positions, labels) = dataset.into_parts();
    Ok((
        images.into_pyarray(py),
        energies.into_pyarray(py),
        positions.into_pyarray(py),
        labels.into_pyarray(py),
    ))
}

/// Normalize an image set with global statistics.
///
/// Each value ``x`` becomes ``(x - mean) / (max - min)`` where the statistics
/// are taken over the whole array. Raises ``ValueError`` for an empty array or
/// when every value is equal.
#[pyfunction]
fn normalize_image_data<'py>(
    py: Python<'py>,
    images: PyReadonlyArrayDyn<'py, f64>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let normalized = scintpix_core::normalize(&images.as_array())
        .map_err(|e| value_error("normalize_image_data", e))?;
    Ok(normalized.images.into_pyarray(py))
}

/// Global ``(min, max, mean)`` of an image set.
#[pyfunction]
fn image_stats(images: PyReadonlyArrayDyn<'_, f64>) -> PyResult<(f64, f64, f64)> {
    let stats = scintpix_core::ImageStats::compute(&images.as_array())
        .map_err(|e| value_error("image_stats", e))?;
    Ok((stats.min, stats.max, stats.mean))
}

#[pymodule]
fn scintpix(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("RECORD_LEN", scintpix_core::layout::RECORD_LEN)?;
    m.add("IMAGE_SIDE", scintpix_core::layout::IMAGE_SIDE)?;
    m.add_function(wrap_pyfunction!(import_data, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_image_data, m)?)?;
    m.add_function(wrap_pyfunction!(image_stats, m)?)?;
    Ok(())
}
