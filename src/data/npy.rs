//! `.npy` readers for image tensors, labels and poison indices

use crate::{Error, Result};
use ndarray::{Array1, Array3, Array4};
use ndarray_npy::ReadNpyExt;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

fn open(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::Config(format!(
            "File not found: {}",
            path.display()
        ))),
        Err(e) => Err(Error::Io(e)),
    }
}

fn npy_error(path: &Path, message: impl Into<String>) -> Error {
    Error::Npy {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn to_usize(path: &Path, values: impl Iterator<Item = i64>) -> Result<Vec<usize>> {
    values
        .map(|v| usize::try_from(v).map_err(|_| npy_error(path, format!("negative value {v}"))))
        .collect()
}

/// Read a 1-D integer array as unsigned indices
///
/// Accepts i64, i32, u64, u32 and u8 element types. Negative values are
/// rejected.
pub fn read_index_array(path: impl AsRef<Path>) -> Result<Vec<usize>> {
    let path = path.as_ref();

    if let Ok(arr) = Array1::<i64>::read_npy(open(path)?) {
        return to_usize(path, arr.iter().copied());
    }
    if let Ok(arr) = Array1::<i32>::read_npy(open(path)?) {
        return to_usize(path, arr.iter().map(|&v| i64::from(v)));
    }
    if let Ok(arr) = Array1::<u64>::read_npy(open(path)?) {
        return arr
            .iter()
            .map(|&v| {
                usize::try_from(v).map_err(|_| npy_error(path, format!("value {v} too large")))
            })
            .collect();
    }
    if let Ok(arr) = Array1::<u32>::read_npy(open(path)?) {
        return Ok(arr.iter().map(|&v| v as usize).collect());
    }
    if let Ok(arr) = Array1::<u8>::read_npy(open(path)?) {
        return Ok(arr.iter().map(|&v| usize::from(v)).collect());
    }

    Err(npy_error(
        path,
        "expected a 1-D integer array (i64, i32, u64, u32 or u8)",
    ))
}

/// Read an N×H×W×C image tensor
///
/// `u8` pixels are scaled to [0, 1]; floating point data is taken as is.
pub fn read_image_array(path: impl AsRef<Path>) -> Result<Array4<f32>> {
    let path = path.as_ref();

    if let Ok(arr) = Array4::<u8>::read_npy(open(path)?) {
        return Ok(arr.mapv(|v| f32::from(v) / 255.0));
    }
    if let Ok(arr) = Array4::<f32>::read_npy(open(path)?) {
        return Ok(arr);
    }
    if let Ok(arr) = Array4::<f64>::read_npy(open(path)?) {
        return Ok(arr.mapv(|v| v as f32));
    }

    Err(npy_error(
        path,
        "expected a 4-D N×H×W×C array of u8, f32 or f64",
    ))
}

/// Read an H×W×C trigger pattern
pub fn read_pattern_array(path: impl AsRef<Path>) -> Result<Array3<f32>> {
    let path = path.as_ref();

    if let Ok(arr) = Array3::<f32>::read_npy(open(path)?) {
        return Ok(arr);
    }
    if let Ok(arr) = Array3::<u8>::read_npy(open(path)?) {
        return Ok(arr.mapv(|v| f32::from(v) / 255.0));
    }
    if let Ok(arr) = Array3::<f64>::read_npy(open(path)?) {
        return Ok(arr.mapv(|v| v as f32));
    }

    Err(npy_error(path, "expected a 3-D H×W×C array of u8, f32 or f64"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array4};
    use ndarray_npy::WriteNpyExt;
    use tempfile::TempDir;

    fn write<T: WriteNpyExt>(dir: &TempDir, name: &str, arr: &T) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        arr.write_npy(std::io::BufWriter::new(file)).unwrap();
        path
    }

    #[test]
    fn test_read_i64_indices() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "idx.npy", &arr1(&[3i64, 3, 7]));
        assert_eq!(read_index_array(&path).unwrap(), vec![3, 3, 7]);
    }

    #[test]
    fn test_read_i32_indices() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "idx.npy", &arr1(&[0i32, 5]));
        assert_eq!(read_index_array(&path).unwrap(), vec![0, 5]);
    }

    #[test]
    fn test_negative_index_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "idx.npy", &arr1(&[1i64, -2]));
        let err = read_index_array(&path).unwrap_err();
        assert!(matches!(err, Error::Npy { .. }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = read_index_array("/nonexistent/poison.npy").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_float_array_is_not_an_index_array() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "idx.npy", &arr1(&[1.0f32, 2.0]));
        assert!(matches!(read_index_array(&path), Err(Error::Npy { .. })));
    }

    #[test]
    fn test_read_u8_images_scaled() {
        let dir = TempDir::new().unwrap();
        let images = Array4::<u8>::from_elem((2, 3, 3, 1), 255);
        let path = write(&dir, "images.npy", &images);
        let loaded = read_image_array(&path).unwrap();
        assert_eq!(loaded.dim(), (2, 3, 3, 1));
        assert!(loaded.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_read_f32_images() {
        let dir = TempDir::new().unwrap();
        let images = Array4::<f32>::from_elem((1, 2, 2, 3), 0.25);
        let path = write(&dir, "images.npy", &images);
        let loaded = read_image_array(&path).unwrap();
        assert_eq!(loaded, images);
    }
}
