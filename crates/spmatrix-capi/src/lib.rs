//! C API for spmatrix
//!
//! This crate exposes f64 dense and sparse matrices to C and other languages
//! through opaque handles. Handles are created by `*_new` / `*_zeros` /
//! `*_from_data` functions and must be freed with the matching `*_release`.
//!
//! All extern "C" functions are inherently unsafe as they work with raw pointers
//! from foreign code. Panics are caught at the boundary and reported as
//! `SPM_INTERNAL_ERROR`.

#![allow(clippy::not_unsafe_ptr_arg_deref)]

use libc::{c_double, c_int, size_t};
use spmatrix::operations::{multiply_and_add, scale_and_accumulate};
use spmatrix::{DenseMatrix, MatrixError, SparseFormat, SparseMatrix};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use tracing::debug;

// Status codes
pub type StatusCode = c_int;

pub const SPM_SUCCESS: StatusCode = 0;
pub const SPM_INVALID_ARGUMENT: StatusCode = -1;
pub const SPM_SHAPE_MISMATCH: StatusCode = -2;
pub const SPM_FORMAT_MISMATCH: StatusCode = -3;
pub const SPM_INDEX_OUT_OF_RANGE: StatusCode = -4;
pub const SPM_INCONSISTENT_BULK_LOAD: StatusCode = -5;
pub const SPM_INTERNAL_ERROR: StatusCode = -6;

// Format tags
pub const SPM_FORMAT_CSC: c_int = 0;
pub const SPM_FORMAT_BLOCK_COL: c_int = 1;

/// Opaque dense matrix handle.
pub struct spm_dense_f64 {
    inner: DenseMatrix<f64>,
}

/// Opaque sparse matrix handle.
pub struct spm_sparse_f64 {
    inner: SparseMatrix<f64>,
}

fn status_of(err: &MatrixError) -> StatusCode {
    debug!(error = %err, "spmatrix call failed");
    match err {
        MatrixError::ShapeMismatch { .. } | MatrixError::LengthMismatch { .. } => {
            SPM_SHAPE_MISMATCH
        }
        MatrixError::FormatMismatch { .. } => SPM_FORMAT_MISMATCH,
        MatrixError::IndexOutOfRange { .. } | MatrixError::SliceOutOfRange { .. } => {
            SPM_INDEX_OUT_OF_RANGE
        }
        MatrixError::InconsistentBulkLoad { .. } => SPM_INCONSISTENT_BULK_LOAD,
    }
}

fn format_from_tag(tag: c_int) -> Option<SparseFormat> {
    match tag {
        SPM_FORMAT_CSC => Some(SparseFormat::Csc),
        SPM_FORMAT_BLOCK_COL => Some(SparseFormat::BlockCol),
        _ => None,
    }
}

fn format_to_tag(format: SparseFormat) -> c_int {
    match format {
        SparseFormat::Csc => SPM_FORMAT_CSC,
        SparseFormat::BlockCol => SPM_FORMAT_BLOCK_COL,
    }
}

/// Borrow `len` elements at `data`; `None` if `data` is null and `len > 0`.
///
/// # Safety
/// A non-null `data` must point to `len` readable elements.
unsafe fn input_slice<'a, T>(data: *const T, len: size_t) -> Option<&'a [T]> {
    if len == 0 {
        Some(&[])
    } else if data.is_null() {
        None
    } else {
        Some(unsafe { std::slice::from_raw_parts(data, len) })
    }
}

/// Run `f` behind `catch_unwind` and map its result to a status code.
fn call(f: impl FnOnce() -> Result<(), MatrixError>) -> StatusCode {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => SPM_SUCCESS,
        Ok(Err(err)) => status_of(&err),
        Err(_) => SPM_INTERNAL_ERROR,
    }
}

/// Run a constructor behind `catch_unwind`, writing the status to `status`.
///
/// # Safety
/// `status` must be non-null and writable.
unsafe fn construct<T>(
    status: *mut StatusCode,
    f: impl FnOnce() -> Result<T, StatusCode>,
) -> *mut T {
    let (out, code) = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => (Box::into_raw(Box::new(value)), SPM_SUCCESS),
        Ok(Err(code)) => (ptr::null_mut(), code),
        Err(_) => (ptr::null_mut(), SPM_INTERNAL_ERROR),
    };
    unsafe {
        *status = code;
    }
    out
}

// ============================================================================
// Dense matrix
// ============================================================================

/// Create a zero-filled `rows x cols` dense matrix.
///
/// # Returns
/// Pointer to new matrix, or null on error
#[unsafe(no_mangle)]
pub extern "C" fn spm_dense_f64_zeros(
    rows: size_t,
    cols: size_t,
    status: *mut StatusCode,
) -> *mut spm_dense_f64 {
    if status.is_null() {
        return ptr::null_mut();
    }
    unsafe {
        construct(status, || {
            Ok(spm_dense_f64 {
                inner: DenseMatrix::zeros(rows, cols),
            })
        })
    }
}

/// Create a dense matrix from `len` column-major values.
///
/// # Arguments
/// * `data` - Pointer to data array (column-major order)
/// * `len` - Length of data array, must equal `rows * cols`
/// * `status` - Pointer to receive status code
///
/// # Returns
/// Pointer to new matrix, or null on error
#[unsafe(no_mangle)]
pub extern "C" fn spm_dense_f64_from_data(
    data: *const c_double,
    len: size_t,
    rows: size_t,
    cols: size_t,
    status: *mut StatusCode,
) -> *mut spm_dense_f64 {
    if status.is_null() {
        return ptr::null_mut();
    }
    unsafe {
        construct(status, || {
            let values = input_slice(data, len).ok_or(SPM_INVALID_ARGUMENT)?;
            DenseMatrix::from_vec(values.to_vec(), rows, cols)
                .map(|inner| spm_dense_f64 { inner })
                .map_err(|err| status_of(&err))
        })
    }
}

/// Release (free) a dense matrix.
#[unsafe(no_mangle)]
pub extern "C" fn spm_dense_f64_release(matrix: *mut spm_dense_f64) {
    if !matrix.is_null() {
        unsafe {
            let _ = Box::from_raw(matrix);
        }
    }
}

/// Write the shape to `out_rows` and `out_cols`.
#[unsafe(no_mangle)]
pub extern "C" fn spm_dense_f64_shape(
    matrix: *const spm_dense_f64,
    out_rows: *mut size_t,
    out_cols: *mut size_t,
) -> StatusCode {
    if matrix.is_null() || out_rows.is_null() || out_cols.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe {
        let (rows, cols) = (*matrix).inner.shape();
        *out_rows = rows;
        *out_cols = cols;
        Ok(())
    })
}

/// Get pointer to the column-major element buffer.
///
/// # Safety
/// The returned pointer is only valid while the matrix exists and is not
/// resized.
#[unsafe(no_mangle)]
pub extern "C" fn spm_dense_f64_data(matrix: *const spm_dense_f64) -> *const c_double {
    if matrix.is_null() {
        return ptr::null();
    }
    let read = AssertUnwindSafe(|| unsafe { (*matrix).inner.data().as_ptr() });
    catch_unwind(read).unwrap_or(ptr::null())
}

/// Get element `(row, col)`.
#[unsafe(no_mangle)]
pub extern "C" fn spm_dense_f64_get(
    matrix: *const spm_dense_f64,
    row: size_t,
    col: size_t,
    out: *mut c_double,
) -> StatusCode {
    if matrix.is_null() || out.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe {
        let m = &(*matrix).inner;
        match m.get(row, col) {
            Some(&v) => {
                *out = v;
                Ok(())
            }
            None => Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: m.rows(),
                cols: m.cols(),
            }),
        }
    })
}

/// Set element `(row, col)`.
#[unsafe(no_mangle)]
pub extern "C" fn spm_dense_f64_set(
    matrix: *mut spm_dense_f64,
    row: size_t,
    col: size_t,
    value: c_double,
) -> StatusCode {
    if matrix.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe { (*matrix).inner.set(row, col, value) })
}

/// Fill with independent samples from `U[low, high)` using `seed`.
#[unsafe(no_mangle)]
pub extern "C" fn spm_dense_f64_set_uniform_random(
    matrix: *mut spm_dense_f64,
    low: c_double,
    high: c_double,
    seed: u64,
) -> StatusCode {
    if matrix.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe {
        (*matrix).inner.set_uniform_random_value(low, high, seed);
        Ok(())
    })
}

// ============================================================================
// Sparse matrix
// ============================================================================

/// Create an empty sparse matrix.
///
/// # Arguments
/// * `format` - `SPM_FORMAT_CSC` or `SPM_FORMAT_BLOCK_COL`
/// * `nnz_hint` - Initial capacity; storage grows as needed
/// * `status` - Pointer to receive status code
///
/// # Returns
/// Pointer to new matrix, or null on error
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_new(
    format: c_int,
    rows: size_t,
    cols: size_t,
    nnz_hint: size_t,
    status: *mut StatusCode,
) -> *mut spm_sparse_f64 {
    if status.is_null() {
        return ptr::null_mut();
    }
    unsafe {
        construct(status, || {
            let format = format_from_tag(format).ok_or(SPM_INVALID_ARGUMENT)?;
            Ok(spm_sparse_f64 {
                inner: SparseMatrix::new(format, rows, cols, nnz_hint),
            })
        })
    }
}

/// Release (free) a sparse matrix.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_release(matrix: *mut spm_sparse_f64) {
    if !matrix.is_null() {
        unsafe {
            let _ = Box::from_raw(matrix);
        }
    }
}

/// Write the format tag to `out`.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_format(
    matrix: *const spm_sparse_f64,
    out: *mut c_int,
) -> StatusCode {
    if matrix.is_null() || out.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe {
        *out = format_to_tag((*matrix).inner.format());
        Ok(())
    })
}

/// Write the shape to `out_rows` and `out_cols`.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_shape(
    matrix: *const spm_sparse_f64,
    out_rows: *mut size_t,
    out_cols: *mut size_t,
) -> StatusCode {
    if matrix.is_null() || out_rows.is_null() || out_cols.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe {
        let (rows, cols) = (*matrix).inner.shape();
        *out_rows = rows;
        *out_cols = cols;
        Ok(())
    })
}

/// Number of stored elements.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_nnz(matrix: *const spm_sparse_f64) -> size_t {
    if matrix.is_null() {
        return 0;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { (*matrix).inner.nnz() })).unwrap_or(0)
}

/// Replace the contents with raw CSC arrays.
///
/// # Arguments
/// * `col_ptr` - `cols + 1` column offsets
/// * `row_idx` - `nnz` row indices
/// * `values` - `nnz` values
///
/// On error the matrix is unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_set_from_csc(
    matrix: *mut spm_sparse_f64,
    col_ptr: *const size_t,
    row_idx: *const size_t,
    values: *const c_double,
    nnz: size_t,
    rows: size_t,
    cols: size_t,
) -> StatusCode {
    if matrix.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    let Some(ptr_len) = cols.checked_add(1) else {
        return SPM_INVALID_ARGUMENT;
    };
    let inputs = unsafe {
        (
            input_slice(col_ptr, ptr_len),
            input_slice(row_idx, nnz),
            input_slice(values, nnz),
        )
    };
    let (Some(col_ptr), Some(row_idx), Some(values)) = inputs else {
        return SPM_INVALID_ARGUMENT;
    };
    call(|| unsafe {
        (*matrix)
            .inner
            .set_matrix_from_csc_format(col_ptr, row_idx, values, nnz, rows, cols)
    })
}

/// Replace the contents with block-column data.
///
/// # Arguments
/// * `block_ids` - `num_blocks` ascending column ids
/// * `values` - `rows * num_blocks` column-major block values
///
/// On error the matrix is unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_set_from_sbc(
    matrix: *mut spm_sparse_f64,
    block_ids: *const size_t,
    values: *const c_double,
    num_blocks: size_t,
    rows: size_t,
    cols: size_t,
) -> StatusCode {
    if matrix.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    let Some(value_len) = rows.checked_mul(num_blocks) else {
        return SPM_INVALID_ARGUMENT;
    };
    let inputs = unsafe {
        (
            input_slice(block_ids, num_blocks),
            input_slice(values, value_len),
        )
    };
    let (Some(block_ids), Some(values)) = inputs else {
        return SPM_INVALID_ARGUMENT;
    };
    call(|| unsafe {
        (*matrix)
            .inner
            .set_matrix_from_sbc_format(block_ids, values, num_blocks, rows, cols)
    })
}

/// Get element `(row, col)`; unstored elements read as zero.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_get(
    matrix: *const spm_sparse_f64,
    row: size_t,
    col: size_t,
    out: *mut c_double,
) -> StatusCode {
    if matrix.is_null() || out.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe {
        *out = (*matrix).inner.get(row, col)?;
        Ok(())
    })
}

/// Insert or overwrite element `(row, col)`.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_set(
    matrix: *mut spm_sparse_f64,
    row: size_t,
    col: size_t,
    value: c_double,
) -> StatusCode {
    if matrix.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe { (*matrix).inner.set_value(row, col, value) })
}

/// Copy the CSC arrays into caller buffers.
///
/// # Arguments
/// * `col_ptr` - Output buffer of `cols + 1` elements
/// * `row_idx` - Output buffer of `nnz` elements
/// * `values` - Output buffer of `nnz` elements
///
/// Returns `SPM_FORMAT_MISMATCH` for a block-column matrix.
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_export_csc(
    matrix: *const spm_sparse_f64,
    col_ptr: *mut size_t,
    row_idx: *mut size_t,
    values: *mut c_double,
) -> StatusCode {
    if matrix.is_null() || col_ptr.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    let result = catch_unwind(AssertUnwindSafe(|| unsafe {
        let csc = match (*matrix).inner.as_csc() {
            Ok(csc) => csc,
            Err(err) => return status_of(&err),
        };
        let nnz = csc.nnz();
        if nnz > 0 && (row_idx.is_null() || values.is_null()) {
            return SPM_INVALID_ARGUMENT;
        }
        ptr::copy_nonoverlapping(csc.col_ptr().as_ptr(), col_ptr, csc.col_ptr().len());
        if nnz > 0 {
            ptr::copy_nonoverlapping(csc.row_idx().as_ptr(), row_idx, nnz);
            ptr::copy_nonoverlapping(csc.values().as_ptr(), values, nnz);
        }
        SPM_SUCCESS
    }));

    result.unwrap_or(SPM_INTERNAL_ERROR)
}

/// Dense copy of columns `start..start + count`.
///
/// # Returns
/// Pointer to new dense matrix, or null on error
#[unsafe(no_mangle)]
pub extern "C" fn spm_sparse_f64_copy_column_slice_to_dense(
    matrix: *const spm_sparse_f64,
    start: size_t,
    count: size_t,
    status: *mut StatusCode,
) -> *mut spm_dense_f64 {
    if status.is_null() {
        return ptr::null_mut();
    }
    if matrix.is_null() {
        unsafe {
            *status = SPM_INVALID_ARGUMENT;
        }
        return ptr::null_mut();
    }
    unsafe {
        construct(status, || {
            (*matrix)
                .inner
                .copy_column_slice_to_dense(start, count)
                .map(|inner| spm_dense_f64 { inner })
                .map_err(|err| status_of(&err))
        })
    }
}

// ============================================================================
// Kernels
// ============================================================================

/// `result += alpha * op(a) * op(b)` with dense `a`, sparse `b` and a
/// block-column `result`. Nonzero `transpose_*` flags select the transpose.
#[unsafe(no_mangle)]
pub extern "C" fn spm_multiply_and_add_f64(
    alpha: c_double,
    a: *const spm_dense_f64,
    transpose_a: c_int,
    b: *const spm_sparse_f64,
    transpose_b: c_int,
    result: *mut spm_sparse_f64,
) -> StatusCode {
    if a.is_null() || b.is_null() || result.is_null() {
        return SPM_INVALID_ARGUMENT;
    }
    if ptr::eq(b, result) {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe {
        multiply_and_add(
            alpha,
            &(*a).inner,
            transpose_a != 0,
            &(*b).inner,
            transpose_b != 0,
            &mut (*result).inner,
        )
    })
}

/// `acc += scale * addend` with a block-column `acc`.
#[unsafe(no_mangle)]
pub extern "C" fn spm_scale_and_accumulate_f64(
    scale: c_double,
    acc: *mut spm_sparse_f64,
    addend: *const spm_sparse_f64,
) -> StatusCode {
    if acc.is_null() || addend.is_null() || ptr::eq(acc, addend) {
        return SPM_INVALID_ARGUMENT;
    }
    call(|| unsafe { scale_and_accumulate(scale, &mut (*acc).inner, &(*addend).inner) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csc_fixture(status: &mut StatusCode) -> *mut spm_sparse_f64 {
        let m = spm_sparse_f64_new(SPM_FORMAT_CSC, 4, 2, 0, &raw mut *status);
        assert_eq!(*status, SPM_SUCCESS);
        let col_ptr = [0usize, 1, 3];
        let row_idx = [3usize, 2, 3];
        let values = [4.0, 5.0, 6.0f64];
        let code = spm_sparse_f64_set_from_csc(
            m,
            col_ptr.as_ptr(),
            row_idx.as_ptr(),
            values.as_ptr(),
            3,
            4,
            2,
        );
        assert_eq!(code, SPM_SUCCESS);
        m
    }

    #[test]
    fn test_dense_from_data() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0f64];
        let mut status: StatusCode = -999;

        let m = spm_dense_f64_from_data(data.as_ptr(), data.len(), 2, 3, &mut status);
        assert_eq!(status, SPM_SUCCESS);
        assert!(!m.is_null());

        let (mut rows, mut cols) = (0, 0);
        assert_eq!(spm_dense_f64_shape(m, &mut rows, &mut cols), SPM_SUCCESS);
        assert_eq!((rows, cols), (2, 3));

        let mut val = 0.0;
        assert_eq!(spm_dense_f64_get(m, 1, 2, &mut val), SPM_SUCCESS);
        assert_eq!(val, 6.0);
        assert_eq!(spm_dense_f64_get(m, 2, 0, &mut val), SPM_INDEX_OUT_OF_RANGE);

        let bad = spm_dense_f64_from_data(data.as_ptr(), 5, 2, 3, &mut status);
        assert!(bad.is_null());
        assert_eq!(status, SPM_SHAPE_MISMATCH);

        spm_dense_f64_release(m);
    }

    #[test]
    fn test_sparse_csc_readback() {
        let mut status: StatusCode = -999;
        let m = csc_fixture(&mut status);
        assert_eq!(spm_sparse_f64_nnz(m), 3);

        for row in 0..4 {
            for col in 0..2 {
                let mut val = -1.0;
                assert_eq!(spm_sparse_f64_get(m, row, col, &mut val), SPM_SUCCESS);
                let expected = match (row, col) {
                    (3, 0) => 4.0,
                    (2, 1) => 5.0,
                    (3, 1) => 6.0,
                    _ => 0.0,
                };
                assert_eq!(val, expected);
            }
        }

        let mut col_ptr = [0usize; 3];
        let mut row_idx = [0usize; 3];
        let mut values = [0.0f64; 3];
        let code = spm_sparse_f64_export_csc(
            m,
            col_ptr.as_mut_ptr(),
            row_idx.as_mut_ptr(),
            values.as_mut_ptr(),
        );
        assert_eq!(code, SPM_SUCCESS);
        assert_eq!(col_ptr, [0, 1, 3]);
        assert_eq!(row_idx, [3, 2, 3]);
        assert_eq!(values, [4.0, 5.0, 6.0]);

        spm_sparse_f64_release(m);
    }

    #[test]
    fn test_sparse_bulk_load_errors() {
        let mut status: StatusCode = -999;
        let m = csc_fixture(&mut status);

        let col_ptr = [0usize, 2, 1];
        let row_idx = [0usize, 1];
        let values = [1.0, 2.0f64];
        let code = spm_sparse_f64_set_from_csc(
            m,
            col_ptr.as_ptr(),
            row_idx.as_ptr(),
            values.as_ptr(),
            2,
            4,
            2,
        );
        assert_eq!(code, SPM_INCONSISTENT_BULK_LOAD);
        assert_eq!(spm_sparse_f64_nnz(m), 3);

        assert_eq!(
            spm_sparse_f64_set_from_csc(m, ptr::null(), row_idx.as_ptr(), values.as_ptr(), 2, 4, 2),
            SPM_INVALID_ARGUMENT
        );

        let bad = spm_sparse_f64_new(7, 2, 2, 0, &mut status);
        assert!(bad.is_null());
        assert_eq!(status, SPM_INVALID_ARGUMENT);

        spm_sparse_f64_release(m);
    }

    #[test]
    fn test_sbc_load_and_slice() {
        let mut status: StatusCode = -999;
        let m = spm_sparse_f64_new(SPM_FORMAT_CSC, 4, 4, 0, &mut status);
        let ids = [0usize, 1];
        let values = [0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 5.0, 6.0f64];
        assert_eq!(
            spm_sparse_f64_set_from_sbc(m, ids.as_ptr(), values.as_ptr(), 2, 4, 4),
            SPM_SUCCESS
        );
        let mut format = -1;
        assert_eq!(spm_sparse_f64_format(m, &mut format), SPM_SUCCESS);
        assert_eq!(format, SPM_FORMAT_BLOCK_COL);

        let mut col_ptr = [0usize; 5];
        assert_eq!(
            spm_sparse_f64_export_csc(m, col_ptr.as_mut_ptr(), ptr::null_mut(), ptr::null_mut()),
            SPM_FORMAT_MISMATCH
        );

        let d = spm_sparse_f64_copy_column_slice_to_dense(m, 1, 2, &mut status);
        assert_eq!(status, SPM_SUCCESS);
        let data = unsafe { std::slice::from_raw_parts(spm_dense_f64_data(d), 8) };
        assert_eq!(data, &[0.0, 0.0, 5.0, 6.0, 0.0, 0.0, 0.0, 0.0]);

        let none = spm_sparse_f64_copy_column_slice_to_dense(m, 3, 2, &mut status);
        assert!(none.is_null());
        assert_eq!(status, SPM_INDEX_OUT_OF_RANGE);

        spm_dense_f64_release(d);
        spm_sparse_f64_release(m);
    }

    #[test]
    fn test_multiply_and_accumulate() {
        let mut status: StatusCode = -999;
        // A = [[1, 2], [3, 4], [5, 6], [7, 8]] in column-major order
        let a_data = [1.0, 3.0, 5.0, 7.0, 2.0, 4.0, 6.0, 8.0f64];
        let a = spm_dense_f64_from_data(a_data.as_ptr(), 8, 4, 2, &mut status);
        let s1 = csc_fixture(&mut status);
        let result = spm_sparse_f64_new(SPM_FORMAT_BLOCK_COL, 4, 4, 0, &mut status);

        let code = spm_multiply_and_add_f64(1.0, a, 0, s1, 1, result);
        assert_eq!(code, SPM_SUCCESS);
        // result[:, 3] = 4 * A[:, 0] + 6 * A[:, 1]
        let mut val = 0.0;
        assert_eq!(spm_sparse_f64_get(result, 0, 3, &mut val), SPM_SUCCESS);
        assert_eq!(val, 4.0 + 12.0);
        // result[:, 2] = 5 * A[:, 1]
        assert_eq!(spm_sparse_f64_get(result, 3, 2, &mut val), SPM_SUCCESS);
        assert_eq!(val, 40.0);

        let acc = spm_sparse_f64_new(SPM_FORMAT_BLOCK_COL, 4, 4, 0, &mut status);
        assert_eq!(spm_sparse_f64_set(acc, 1, 0, 1.0), SPM_SUCCESS);
        assert_eq!(spm_scale_and_accumulate_f64(0.5, acc, result), SPM_SUCCESS);
        assert_eq!(spm_sparse_f64_get(acc, 3, 2, &mut val), SPM_SUCCESS);
        assert_eq!(val, 20.0);
        assert_eq!(spm_sparse_f64_get(acc, 1, 0, &mut val), SPM_SUCCESS);
        assert_eq!(val, 1.0);

        let aliased = spm_multiply_and_add_f64(1.0, a, 0, s1, 1, s1);
        assert_eq!(aliased, SPM_INVALID_ARGUMENT);
        let wrong_format = spm_scale_and_accumulate_f64(1.0, s1, result);
        assert_eq!(wrong_format, SPM_FORMAT_MISMATCH);

        spm_dense_f64_release(a);
        spm_sparse_f64_release(s1);
        spm_sparse_f64_release(result);
        spm_sparse_f64_release(acc);
    }
}
