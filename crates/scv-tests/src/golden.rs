//! Golden vector tests.
//!
//! Each case in `golden/vectors.json` names an input matrix, one operation
//! and either the expected matrix or the expected error kind. Every case runs
//! twice, once through the blocking entry point and once through the worker
//! pool, and both runs must agree with the vector.
//!
//! Matrices use the JSON construction forms: a `{width, height, type, data}`
//! record with channel-planar data, or rows of numbers for Float.

use scv_compute::{Executor, Job, Matrix};
use scv_core::{Point, Rect, Result};
use scv_ops::{BlurOptions, Conversion, RotateSpec, SizeSpec, WarpOptions};
use serde::Deserialize;
use serde_json::Value;

const VECTORS: &str = include_str!("../golden/vectors.json");

#[derive(Debug, Deserialize)]
struct GoldenFile {
    #[allow(dead_code)]
    version: String,
    cases: Vec<GoldenCase>,
}

#[derive(Debug, Deserialize)]
struct GoldenCase {
    name: String,
    input: Value,
    op: GoldenOp,
    #[serde(default)]
    expected: Option<Value>,
    /// Debug name of the expected [`scv_core::ErrorKind`].
    #[serde(default)]
    error: Option<String>,
    /// Decimal places compared; exact when absent.
    #[serde(default)]
    precision: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum GoldenOp {
    Identity,
    Crop {
        rect: Rect,
    },
    Add {
        operand: f64,
    },
    Multiply {
        operand: f64,
    },
    WarpAffine {
        transform: Value,
        #[serde(default)]
        options: WarpOptions,
    },
    RotationWarp {
        center: Point,
        angle: f64,
        #[serde(default)]
        options: WarpOptions,
    },
    Rotate {
        spec: RotateSpec,
    },
    FlipLeftRight,
    FlipUpDown,
    GaussianBlur {
        #[serde(default)]
        options: BlurOptions,
    },
    ConvertColor {
        conversion: Conversion,
    },
    ColorTemperature {
        kelvin: f64,
        strength: f64,
    },
    Resize {
        spec: Value,
    },
}

/// Validates the operation against `m` and returns its job.
fn prepare(m: &Matrix, op: &GoldenOp) -> Result<Job<Matrix>> {
    match op {
        GoldenOp::Identity => m.prepare_clone_matrix(),
        GoldenOp::Crop { rect } => m.prepare_crop(*rect),
        GoldenOp::Add { operand } => m.prepare_add(*operand),
        GoldenOp::Multiply { operand } => m.prepare_multiply(*operand),
        GoldenOp::WarpAffine { transform, options } => {
            m.prepare_warp_affine(&Matrix::from_json(transform)?, *options)
        }
        GoldenOp::RotationWarp { center, angle, options } => {
            let transform = Matrix::rotation_matrix(*center, *angle, 1.0)?;
            m.prepare_warp_affine(&transform, *options)
        }
        GoldenOp::Rotate { spec } => m.prepare_rotate(*spec),
        GoldenOp::FlipLeftRight => m.prepare_flip_left_right(),
        GoldenOp::FlipUpDown => m.prepare_flip_up_down(),
        GoldenOp::GaussianBlur { options } => m.prepare_gaussian_blur(*options),
        GoldenOp::ConvertColor { conversion } => m.prepare_convert_color(*conversion),
        GoldenOp::ColorTemperature { kelvin, strength } => m.prepare_color_temperature(*kelvin, *strength),
        GoldenOp::Resize { spec } => m.prepare_resize(SizeSpec::from_json(Some(spec))?),
    }
}

fn run(case: &GoldenCase, queued: bool) -> Result<Matrix> {
    let m = Matrix::from_json(&case.input)?;
    let job = prepare(&m, &case.op)?;
    if queued {
        Executor::global()?.submit(job).wait()
    } else {
        job()
    }
}

fn rounded(values: Vec<f64>, precision: Option<i32>) -> Vec<f64> {
    match precision {
        Some(p) => {
            let f = 10f64.powi(p);
            values.into_iter().map(|v| (v * f).round()).collect()
        }
        None => values,
    }
}

fn check(case: &GoldenCase, queued: bool) {
    let mode = if queued { "queued" } else { "blocking" };
    let outcome = run(case, queued);
    match (&case.expected, &case.error) {
        (Some(expected), None) => {
            let actual = outcome.unwrap_or_else(|e| panic!("{} ({mode}): unexpected error: {e}", case.name));
            let expected = Matrix::from_json(expected).unwrap();
            assert_eq!(actual.dims(), expected.dims(), "{} ({mode}): dims", case.name);
            assert_eq!(actual.encoding(), expected.encoding(), "{} ({mode}): encoding", case.name);
            assert_eq!(
                rounded(actual.to_vec(), case.precision),
                rounded(expected.to_vec(), case.precision),
                "{} ({mode}): samples",
                case.name
            );
        }
        (None, Some(kind)) => {
            let err = match outcome {
                Ok(m) => panic!("{} ({mode}): expected {kind} error, got {:?}", case.name, m.dims()),
                Err(e) => e,
            };
            assert_eq!(&format!("{:?}", err.kind()), kind, "{} ({mode}): {err}", case.name);
        }
        _ => panic!("{}: a case needs exactly one of `expected` and `error`", case.name),
    }
}

fn cases() -> Vec<GoldenCase> {
    let file: GoldenFile = serde_json::from_str(VECTORS).expect("golden/vectors.json is malformed");
    file.cases
}

#[test]
fn test_golden_vectors_blocking() {
    let cases = cases();
    assert!(!cases.is_empty());
    for case in &cases {
        check(case, false);
    }
}

#[test]
fn test_golden_vectors_queued() {
    for case in &cases() {
        check(case, true);
    }
}

#[test]
fn test_golden_names_unique() {
    let mut names: Vec<String> = cases().into_iter().map(|c| c.name).collect();
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), total);
}
