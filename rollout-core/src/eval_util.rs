//! Statistics of paths for evaluation reports.
use crate::{
    path::Path,
    record::{Record, RecordValue},
    Env,
};

fn min(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::NAN, f32::min)
}

fn max(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::NAN, f32::max)
}

fn mean(vs: &[f32]) -> f32 {
    if vs.is_empty() {
        f32::NAN
    } else {
        vs.iter().sum::<f32>() / vs.len() as f32
    }
}

fn std(vs: &[f32]) -> f32 {
    let m = mean(vs);
    mean(&vs.iter().map(|v| (v - m) * (v - m)).collect::<Vec<_>>()).sqrt()
}

/// Returns `Mean`, `Std`, `Max` and `Min` of the values, keyed `"{name} {stat}"`.
///
/// The keys are the same for empty input, with `NaN` values.
pub fn create_stats(name: &str, vs: &[f32]) -> Record {
    Record::from_slice(&[
        (format!("{} Mean", name), RecordValue::Scalar(mean(vs))),
        (format!("{} Std", name), RecordValue::Scalar(std(vs))),
        (format!("{} Max", name), RecordValue::Scalar(max(vs))),
        (format!("{} Min", name), RecordValue::Scalar(min(vs))),
    ])
}

/// Returns the sum of rewards of each path.
pub fn get_returns<E: Env>(paths: &[Path<E>]) -> Vec<f32> {
    paths.iter().map(|p| p.total_return()).collect()
}

/// Returns the mean of the returns of the paths.
pub fn get_average_returns<E: Env>(paths: &[Path<E>]) -> f32 {
    mean(&get_returns(paths))
}

/// Returns reward and return statistics of the paths.
///
/// Keys are prefixed with `stat_prefix`, e.g., `"Test Returns Mean"`.
pub fn get_generic_path_information<E: Env>(paths: &[Path<E>], stat_prefix: &str) -> Record {
    let rewards = paths
        .iter()
        .flat_map(|p| p.rewards.iter().copied())
        .collect::<Vec<_>>();
    let returns = get_returns(paths);

    let mut record = create_stats(&format!("{} Rewards", stat_prefix), &rewards);
    record.merge_inplace(create_stats(&format!("{} Returns", stat_prefix), &returns));
    record.insert(
        format!("{} Num Paths", stat_prefix),
        RecordValue::Scalar(paths.len() as f32),
    );
    record.insert(
        format!("{} Average Returns", stat_prefix),
        RecordValue::Scalar(mean(&returns)),
    );
    record
}
