#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! A [`Tensor`] owns a contiguous row-major buffer together with its shape and strides. It is
//! the storage behind every image and every rectification map in the workspace.
//!
//! ```rust
//! use zed_tensor::Tensor2;
//!
//! let map = Tensor2::<f32>::from_shape_vec([2, 3], vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]).unwrap();
//! assert_eq!(map.get([1, 2]), Some(&2.0));
//! assert_eq!(map.strides, [3, 1]);
//! ```

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;
