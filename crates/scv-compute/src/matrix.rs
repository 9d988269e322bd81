//! Shared matrix handle with blocking and non-blocking operations.
//!
//! Every operation goes through one `prepare_*` step that validates the
//! arguments against the current matrix and returns a [`Job`]. The blocking
//! form runs the job on the caller's thread; the `*_async` form queues it on
//! the global [`Executor`] and hands back a [`Pending`]. Validation errors are
//! returned from both forms before anything is queued, so a [`Pending`] only
//! ever carries the outcome of the computation itself.
//!
//! In-place operations (`add`, `multiply`, `set`, `draw_*`) write through the
//! handle and return it; everything else returns a new, independent matrix.
//!
//! No lock is held across a row-parallel kernel. Warp, rotate, resize, color
//! and blur jobs copy the source out under a short read lock and compute on
//! the copy; in-place jobs hold the write lock over sequential loops only.
//! A worker that picks up another queued job while it waits inside a
//! parallel section therefore never holds a guard on the same matrix.

use crate::pool::{Executor, Job, Pending};
use scv_core::{ColorScalar, Encoding, MatrixInit, PixelMatrix, Point, Rect, Result};
use scv_ops::arithmetic::{self, ArithOp};
use scv_ops::{BlurOptions, Conversion, RotateSpec, SizeSpec, WarpOptions};
use scv_ops::{channels, color, draw, filter, region, resize, transform, warp};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[cfg(feature = "io")]
use scv_io::{EncodeFormat, codec, file};
#[cfg(feature = "io")]
use std::path::Path;

/// Generates the blocking and non-blocking entry points of one operation.
macro_rules! dual {
    (
        $(#[cfg($cfg:meta)])?
        $(#[doc = $doc:expr])*
        fn $name:ident / $name_async:ident = $prepare:ident(&self $(, $arg:ident: $ty:ty)*) -> $out:ty;
    ) => {
        $(#[cfg($cfg)])?
        $(#[doc = $doc])*
        pub fn $name(&self $(, $arg: $ty)*) -> Result<$out> {
            (self.$prepare($($arg),*)?)()
        }

        $(#[cfg($cfg)])?
        #[doc = concat!("Non-blocking [`", stringify!($name), "`](Self::", stringify!($name), ").")]
        pub fn $name_async(&self $(, $arg: $ty)*) -> Result<Pending<$out>> {
            let job = self.$prepare($($arg),*)?;
            Ok(Executor::global()?.submit(job))
        }
    };
    (
        $(#[cfg($cfg:meta)])?
        $(#[doc = $doc:expr])*
        fn $name:ident / $name_async:ident = $prepare:ident($($arg:ident: $ty:ty),*) -> $out:ty;
    ) => {
        $(#[cfg($cfg)])?
        $(#[doc = $doc])*
        pub fn $name($($arg: $ty),*) -> Result<$out> {
            (Self::$prepare($($arg),*)?)()
        }

        $(#[cfg($cfg)])?
        #[doc = concat!("Non-blocking [`", stringify!($name), "`](Self::", stringify!($name), ").")]
        pub fn $name_async($($arg: $ty),*) -> Result<Pending<$out>> {
            let job = Self::$prepare($($arg),*)?;
            Ok(Executor::global()?.submit(job))
        }
    };
}

/// Right-hand side of [`Matrix::add`] and [`Matrix::multiply`].
#[derive(Debug, Clone)]
pub enum Operand {
    /// Applied to every sample.
    Scalar(f64),
    /// Applied per channel by role.
    Color(ColorScalar),
    /// Applied element-wise.
    Matrix(Matrix),
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Scalar(v)
    }
}

impl From<ColorScalar> for Operand {
    fn from(c: ColorScalar) -> Self {
        Operand::Color(c)
    }
}

impl From<&Matrix> for Operand {
    fn from(m: &Matrix) -> Self {
        Operand::Matrix(m.clone())
    }
}

/// An [`Operand`] with its matrix copied out of the shared handle.
enum Frozen {
    Scalar(f64),
    Color(ColorScalar),
    Matrix(PixelMatrix),
}

impl Frozen {
    fn operand(&self) -> arithmetic::Operand<'_> {
        match self {
            Frozen::Scalar(v) => arithmetic::Operand::Scalar(*v),
            Frozen::Color(c) => arithmetic::Operand::Color(*c),
            Frozen::Matrix(m) => arithmetic::Operand::Matrix(m),
        }
    }
}

/// Cloneable handle to a shared [`PixelMatrix`].
///
/// Cloning the handle aliases the matrix; [`clone_matrix`](Self::clone_matrix)
/// copies it.
///
/// ```rust
/// use scv_compute::Matrix;
/// use scv_core::{Encoding, Rect};
///
/// let m = Matrix::new(4, 4, Encoding::Gray).unwrap();
/// let same = m.add(10.0).unwrap();
/// assert!(same.ptr_eq(&m));
///
/// let pending = m.crop_async(Rect::new(1.0, 1.0, 2.0, 2.0)).unwrap();
/// let part = pending.wait().unwrap();
/// assert_eq!(part.to_vec(), vec![10.0; 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix {
    inner: Arc<RwLock<PixelMatrix>>,
}

impl From<PixelMatrix> for Matrix {
    fn from(m: PixelMatrix) -> Self {
        Self {
            inner: Arc::new(RwLock::new(m)),
        }
    }
}

impl Matrix {
    /// A zero-filled `width × height` matrix.
    pub fn new(width: usize, height: usize, encoding: Encoding) -> Result<Self> {
        PixelMatrix::new(width, height, encoding).map(Self::from)
    }

    /// Constructs from any accepted JSON form (record, rows or dims).
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::create(MatrixInit::from_json(value)?)
    }

    fn read(&self) -> RwLockReadGuard<'_, PixelMatrix> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PixelMatrix> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with shared access to the matrix.
    pub fn with<R>(&self, f: impl FnOnce(&PixelMatrix) -> R) -> R {
        f(&self.read())
    }

    /// Copies the current contents out of the handle.
    pub fn snapshot(&self) -> PixelMatrix {
        self.read().clone()
    }

    /// Whether both handles point at the same matrix.
    pub fn ptr_eq(&self, other: &Matrix) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.read().width()
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.read().height()
    }

    /// `(width, height)`
    pub fn dims(&self) -> (usize, usize) {
        self.read().dims()
    }

    /// Sample encoding.
    pub fn encoding(&self) -> Encoding {
        self.read().encoding()
    }

    /// Channels per pixel.
    pub fn channels(&self) -> usize {
        self.read().channels()
    }

    /// Channel-planar sample values.
    pub fn to_vec(&self) -> Vec<f64> {
        self.read().to_vec()
    }

    /// Interleaved raw bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.read().to_bytes()
    }

    // ------------------------------------------------------------------
    // prepare steps
    // ------------------------------------------------------------------

    /// Validates construction arguments.
    pub fn prepare_create(init: MatrixInit) -> Result<Job<Matrix>> {
        let m = PixelMatrix::from_init(init)?;
        debug!(op = "create", width = m.width(), height = m.height(), encoding = %m.encoding());
        Ok(Box::new(move || Ok(Matrix::from(m))))
    }

    /// Validates a crop of `rect`.
    pub fn prepare_crop(&self, rect: Rect) -> Result<Job<Matrix>> {
        let region = region::crop_region(&self.read(), &rect)?;
        debug!(op = "crop", x = region.x, y = region.y, width = region.width, height = region.height);
        let src = self.clone();
        Ok(Box::new(move || Ok(Matrix::from(region::extract(&src.read(), region)?))))
    }

    /// Validates writing `source` at `at`; `source` is copied now.
    pub fn prepare_set(&self, source: &Matrix, at: Point) -> Result<Job<Matrix>> {
        let source = source.snapshot();
        region::set_region(&self.read(), &source, at)?;
        debug!(op = "set", x = at.x, y = at.y, width = source.width(), height = source.height());
        let target = self.clone();
        Ok(Box::new(move || {
            region::set(&mut target.write(), &source, at)?;
            Ok(target)
        }))
    }

    /// Prepares a deep copy.
    pub fn prepare_clone_matrix(&self) -> Result<Job<Matrix>> {
        let src = self.clone();
        Ok(Box::new(move || Ok(Matrix::from(src.snapshot()))))
    }

    fn prepare_arith(&self, op: ArithOp, operand: Operand) -> Result<Job<Matrix>> {
        let frozen = match operand {
            Operand::Scalar(v) => Frozen::Scalar(v),
            Operand::Color(c) => Frozen::Color(c),
            Operand::Matrix(m) => Frozen::Matrix(m.snapshot()),
        };
        arithmetic::validate(&self.read(), op, &frozen.operand())?;
        debug!(op = ?op, "arithmetic");
        let target = self.clone();
        Ok(Box::new(move || {
            arithmetic::apply(&mut target.write(), op, &frozen.operand())?;
            Ok(target)
        }))
    }

    /// Validates an in-place addition.
    pub fn prepare_add(&self, operand: impl Into<Operand>) -> Result<Job<Matrix>> {
        self.prepare_arith(ArithOp::Add, operand.into())
    }

    /// Validates an in-place multiplication.
    pub fn prepare_multiply(&self, operand: impl Into<Operand>) -> Result<Job<Matrix>> {
        self.prepare_arith(ArithOp::Multiply, operand.into())
    }

    /// Prepares a channel split.
    pub fn prepare_split(&self) -> Result<Job<Vec<Matrix>>> {
        let src = self.clone();
        Ok(Box::new(move || {
            Ok(channels::split(&src.read())?.into_iter().map(Matrix::from).collect())
        }))
    }

    /// Validates a merge of `parts`; the parts are copied now.
    pub fn prepare_merge(parts: &[Matrix]) -> Result<Job<Matrix>> {
        let parts: Vec<PixelMatrix> = parts.iter().map(Matrix::snapshot).collect();
        let encoding = channels::merge_encoding(&parts.iter().collect::<Vec<_>>())?;
        debug!(op = "merge", parts = parts.len(), encoding = %encoding);
        Ok(Box::new(move || {
            let refs: Vec<&PixelMatrix> = parts.iter().collect();
            Ok(Matrix::from(channels::merge(&refs)?))
        }))
    }

    /// Validates a table lookup; `table` is copied now.
    pub fn prepare_lookup(&self, table: &Matrix) -> Result<Job<Matrix>> {
        let table = table.snapshot();
        channels::validate_lookup(&self.read(), &table)?;
        debug!(op = "lookup", table = %table.encoding());
        let src = self.clone();
        Ok(Box::new(move || Ok(Matrix::from(channels::lookup(&src.read(), &table)?))))
    }

    /// Prepares a 2×3 rotation transform.
    pub fn prepare_rotation_matrix(center: Point, angle: f64, scale: f64) -> Result<Job<Matrix>> {
        Ok(Box::new(move || {
            Ok(Matrix::from(warp::rotation_matrix(center, angle, scale)))
        }))
    }

    /// Validates an affine warp; `transform` is copied now.
    pub fn prepare_warp_affine(&self, transform: &Matrix, options: WarpOptions) -> Result<Job<Matrix>> {
        let transform = transform.snapshot();
        warp::transform_coefficients(&transform)?;
        debug!(op = "warp_affine", border = ?options.border);
        let src = self.clone();
        Ok(Box::new(move || {
            Ok(Matrix::from(warp::warp_affine(&src.snapshot(), &transform, &options)?))
        }))
    }

    /// Validates a rotation.
    pub fn prepare_rotate(&self, spec: RotateSpec) -> Result<Job<Matrix>> {
        warp::rotate_params(&self.read(), &spec)?;
        let src = self.clone();
        Ok(Box::new(move || Ok(Matrix::from(warp::rotate(&src.snapshot(), &spec)?))))
    }

    /// Validates a resize and resolves its target size.
    pub fn prepare_resize(&self, spec: SizeSpec) -> Result<Job<Matrix>> {
        let (width, height) = {
            let m = self.read();
            spec.target_size(m.width(), m.height())?
        };
        debug!(op = "resize", width, height);
        let src = self.clone();
        Ok(Box::new(move || {
            Ok(Matrix::from(resize::resize_to(&src.snapshot(), width, height)?))
        }))
    }

    /// Prepares a horizontal flip.
    pub fn prepare_flip_left_right(&self) -> Result<Job<Matrix>> {
        let src = self.clone();
        Ok(Box::new(move || Ok(Matrix::from(transform::flip_left_right(&src.read())))))
    }

    /// Prepares a vertical flip.
    pub fn prepare_flip_up_down(&self) -> Result<Job<Matrix>> {
        let src = self.clone();
        Ok(Box::new(move || Ok(Matrix::from(transform::flip_up_down(&src.read())))))
    }

    /// Validates a color conversion.
    pub fn prepare_convert_color(&self, conversion: Conversion) -> Result<Job<Matrix>> {
        color::validate_conversion(&self.read(), conversion)?;
        debug!(op = "convert_color", conversion = %conversion);
        let src = self.clone();
        Ok(Box::new(move || {
            Ok(Matrix::from(color::convert_color(&src.snapshot(), conversion)?))
        }))
    }

    /// Validates a color temperature shift.
    pub fn prepare_color_temperature(&self, kelvin: f64, strength: f64) -> Result<Job<Matrix>> {
        color::validate_temperature(&self.read(), kelvin, strength)?;
        let src = self.clone();
        Ok(Box::new(move || {
            Ok(Matrix::from(color::color_temperature(&src.snapshot(), kelvin, strength)?))
        }))
    }

    /// Validates blur options.
    pub fn prepare_gaussian_blur(&self, options: BlurOptions) -> Result<Job<Matrix>> {
        filter::validate_blur(&options)?;
        let src = self.clone();
        Ok(Box::new(move || {
            Ok(Matrix::from(filter::gaussian_blur(&src.snapshot(), &options)?))
        }))
    }

    /// Validates an in-place rectangle.
    pub fn prepare_draw_rectangle(&self, rect: Rect, color: ColorScalar, thickness: i32) -> Result<Job<Matrix>> {
        draw::validate_rectangle(&rect, thickness)?;
        let target = self.clone();
        Ok(Box::new(move || {
            draw::draw_rectangle(&mut target.write(), &rect, &color, thickness)?;
            Ok(target)
        }))
    }

    /// Validates an in-place line.
    pub fn prepare_draw_line(&self, from: Point, to: Point, color: ColorScalar, thickness: i32) -> Result<Job<Matrix>> {
        draw::validate_line(from, to, thickness)?;
        let target = self.clone();
        Ok(Box::new(move || {
            draw::draw_line(&mut target.write(), from, to, &color, thickness)?;
            Ok(target)
        }))
    }

    /// Validates an encode.
    #[cfg(feature = "io")]
    pub fn prepare_encode(&self, format: EncodeFormat) -> Result<Job<Vec<u8>>> {
        codec::validate_encode(&self.read())?;
        let src = self.clone();
        Ok(Box::new(move || codec::encode(&src.read(), format)))
    }

    /// Validates a decode hint; `bytes` are copied now.
    #[cfg(feature = "io")]
    pub fn prepare_decode(bytes: &[u8], hint: Option<Encoding>) -> Result<Job<Matrix>> {
        codec::validate_hint(hint)?;
        let bytes = bytes.to_vec();
        Ok(Box::new(move || codec::decode(&bytes, hint).map(Matrix::from)))
    }

    /// Validates a file read.
    #[cfg(feature = "io")]
    pub fn prepare_read_image(path: &Path, hint: Option<Encoding>) -> Result<Job<Matrix>> {
        codec::validate_hint(hint)?;
        let path = path.to_path_buf();
        Ok(Box::new(move || file::read_image(&path, hint).map(Matrix::from)))
    }

    /// Validates a file write: extension and encoding.
    #[cfg(feature = "io")]
    pub fn prepare_write_image(&self, path: &Path) -> Result<Job<()>> {
        file::validate_write(&self.read(), path)?;
        let path = path.to_path_buf();
        let src = self.clone();
        Ok(Box::new(move || file::write_image(&src.read(), &path)))
    }

    // ------------------------------------------------------------------
    // entry points
    // ------------------------------------------------------------------

    dual! {
        /// Constructs a matrix from any accepted form.
        fn create / create_async = prepare_create(init: MatrixInit) -> Matrix;
    }

    dual! {
        /// Copies `rect` into a new matrix.
        fn crop / crop_async = prepare_crop(&self, rect: Rect) -> Matrix;
    }

    dual! {
        /// Overwrites the region at `at` with `source`, in place.
        fn set / set_async = prepare_set(&self, source: &Matrix, at: Point) -> Matrix;
    }

    dual! {
        /// Copies the matrix into a new, independent handle.
        fn clone_matrix / clone_matrix_async = prepare_clone_matrix(&self) -> Matrix;
    }

    dual! {
        /// Adds `operand` in place.
        fn add / add_async = prepare_add(&self, operand: impl Into<Operand>) -> Matrix;
    }

    dual! {
        /// Multiplies by `operand` in place.
        fn multiply / multiply_async = prepare_multiply(&self, operand: impl Into<Operand>) -> Matrix;
    }

    dual! {
        /// Splits into one single-channel matrix per channel.
        fn split / split_async = prepare_split(&self) -> Vec<Matrix>;
    }

    dual! {
        /// Interleaves 1, 3 or 4 single-channel matrices.
        fn merge / merge_async = prepare_merge(parts: &[Matrix]) -> Matrix;
    }

    dual! {
        /// Remaps every sample through a 256-entry `table`.
        fn lookup / lookup_async = prepare_lookup(&self, table: &Matrix) -> Matrix;
    }

    dual! {
        /// Builds the 2×3 Float transform rotating by `angle` degrees about
        /// `center` and scaling by `scale`.
        fn rotation_matrix / rotation_matrix_async = prepare_rotation_matrix(center: Point, angle: f64, scale: f64) -> Matrix;
    }

    dual! {
        /// Warps through a forward 2×3 transform.
        fn warp_affine / warp_affine_async = prepare_warp_affine(&self, transform: &Matrix, options: WarpOptions) -> Matrix;
    }

    dual! {
        /// Rotates about a center, filling uncovered pixels with zero.
        fn rotate / rotate_async = prepare_rotate(&self, spec: RotateSpec) -> Matrix;
    }

    dual! {
        /// Resizes through the pyramid and bicubic stages.
        fn resize / resize_async = prepare_resize(&self, spec: SizeSpec) -> Matrix;
    }

    dual! {
        /// Mirrors columns.
        fn flip_left_right / flip_left_right_async = prepare_flip_left_right(&self) -> Matrix;
    }

    dual! {
        /// Mirrors rows.
        fn flip_up_down / flip_up_down_async = prepare_flip_up_down(&self) -> Matrix;
    }

    dual! {
        /// Converts between Gray, BGR and BGRA.
        fn convert_color / convert_color_async = prepare_convert_color(&self, conversion: Conversion) -> Matrix;
    }

    dual! {
        /// Shifts colors toward the tint of `kelvin`.
        fn color_temperature / color_temperature_async = prepare_color_temperature(&self, kelvin: f64, strength: f64) -> Matrix;
    }

    dual! {
        /// Gaussian blur into a new matrix.
        fn gaussian_blur / gaussian_blur_async = prepare_gaussian_blur(&self, options: BlurOptions) -> Matrix;
    }

    dual! {
        /// Draws a rectangle outline (or fill, for negative `thickness`) in place.
        fn draw_rectangle / draw_rectangle_async = prepare_draw_rectangle(&self, rect: Rect, color: ColorScalar, thickness: i32) -> Matrix;
    }

    dual! {
        /// Draws a line in place.
        fn draw_line / draw_line_async = prepare_draw_line(&self, from: Point, to: Point, color: ColorScalar, thickness: i32) -> Matrix;
    }

    dual! {
        #[cfg(feature = "io")]
        /// Encodes as PNG or JPEG.
        fn encode / encode_async = prepare_encode(&self, format: EncodeFormat) -> Vec<u8>;
    }

    dual! {
        #[cfg(feature = "io")]
        /// Decodes a PNG or JPEG payload, optionally converting to `hint`.
        fn decode / decode_async = prepare_decode(bytes: &[u8], hint: Option<Encoding>) -> Matrix;
    }

    dual! {
        #[cfg(feature = "io")]
        /// Reads an image file.
        fn read_image / read_image_async = prepare_read_image(path: &Path, hint: Option<Encoding>) -> Matrix;
    }

    dual! {
        #[cfg(feature = "io")]
        /// Writes the matrix to `path`, choosing the format by extension.
        fn write_image / write_image_async = prepare_write_image(&self, path: &Path) -> ();
    }
}
