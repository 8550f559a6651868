use std::collections::BTreeMap;

use chemtune_core::{CoreError, FormattedDataset, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Test size a caller should request: never more than what remains once the
/// training rows are removed.
pub fn capped_test_size(len: usize, train_size: usize, max_test_points: usize) -> usize {
    max_test_points.min(len.saturating_sub(train_size))
}

/// Deterministic subsample of `n` rows, used to cut a training pool down to
/// the swept training size.
pub fn subsample(data: &FormattedDataset, n: usize, seed: u64) -> Result<FormattedDataset> {
    if n > data.len() {
        return Err(CoreError::Data(format!(
            "cannot subsample {} rows from {}",
            n,
            data.len()
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..data.len()).collect();
    indices.shuffle(&mut rng);
    indices.truncate(n);
    Ok(data.select(&indices))
}

/// Deterministic disjoint train/test split. With `stratify` the split keeps
/// per-class proportions within rounding of the per-class allocation; labels
/// must then be class labels.
pub fn train_test_split(
    data: &FormattedDataset,
    train_size: usize,
    test_size: usize,
    stratify: bool,
    seed: u64,
) -> Result<(FormattedDataset, FormattedDataset)> {
    if train_size == 0 || test_size == 0 {
        return Err(CoreError::Validation(
            "train and test sizes must be positive".into(),
        ));
    }
    if train_size + test_size > data.len() {
        return Err(CoreError::Data(format!(
            "split of {}+{} exceeds {} available rows",
            train_size,
            test_size,
            data.len()
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let (train_idx, test_idx) = if stratify {
        stratified_indices(data, train_size, test_size, &mut rng)?
    } else {
        let mut indices: Vec<usize> = (0..data.len()).collect();
        indices.shuffle(&mut rng);
        let train = indices[..train_size].to_vec();
        let test = indices[train_size..train_size + test_size].to_vec();
        (train, test)
    };

    Ok((data.select(&train_idx), data.select(&test_idx)))
}

fn stratified_indices(
    data: &FormattedDataset,
    train_size: usize,
    test_size: usize,
    rng: &mut StdRng,
) -> Result<(Vec<usize>, Vec<usize>)> {
    // BTreeMap keeps class iteration order deterministic.
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, sample) in data.samples.iter().enumerate() {
        let class = sample.label.as_class().ok_or_else(|| {
            CoreError::Validation("stratified split requires class labels".into())
        })?;
        groups.entry(class).or_default().push(i);
    }
    for indices in groups.values_mut() {
        indices.shuffle(rng);
    }

    let total = data.len();
    let class_sizes: Vec<(usize, usize)> = groups.iter().map(|(c, v)| (*c, v.len())).collect();

    let train_quota = allocate(&class_sizes, train_size, total);
    let mut train_idx = Vec::with_capacity(train_size);
    let mut remaining: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for ((class, indices), quota) in groups.into_iter().zip(train_quota.iter()) {
        let (head, tail) = indices.split_at((*quota).min(indices.len()));
        train_idx.extend_from_slice(head);
        remaining.insert(class, tail.to_vec());
    }

    let remaining_sizes: Vec<(usize, usize)> =
        remaining.iter().map(|(c, v)| (*c, v.len())).collect();
    let remaining_total: usize = remaining_sizes.iter().map(|(_, n)| n).sum();
    let test_quota = allocate(&remaining_sizes, test_size, remaining_total);
    let mut test_idx = Vec::with_capacity(test_size);
    for ((_, indices), quota) in remaining.into_iter().zip(test_quota.iter()) {
        test_idx.extend(indices.into_iter().take(*quota));
    }

    Ok((train_idx, test_idx))
}

/// Largest-remainder allocation of `target` slots across classes,
/// proportional to class size and clamped to what each class holds.
fn allocate(class_sizes: &[(usize, usize)], target: usize, total: usize) -> Vec<usize> {
    if total == 0 || target == 0 {
        return vec![0; class_sizes.len()];
    }

    let mut quotas: Vec<usize> = Vec::with_capacity(class_sizes.len());
    let mut remainders: Vec<(f64, usize)> = Vec::with_capacity(class_sizes.len());
    for (slot, (_, size)) in class_sizes.iter().enumerate() {
        let exact = target as f64 * *size as f64 / total as f64;
        quotas.push((exact.floor() as usize).min(*size));
        remainders.push((exact - exact.floor(), slot));
    }

    // Hand out leftover slots by largest fractional part, then to any class
    // with spare rows.
    remainders.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    let mut assigned: usize = quotas.iter().sum();
    for &(_, slot) in &remainders {
        if assigned >= target {
            break;
        }
        if quotas[slot] < class_sizes[slot].1 {
            quotas[slot] += 1;
            assigned += 1;
        }
    }
    while assigned < target {
        let mut progressed = false;
        for (slot, (_, size)) in class_sizes.iter().enumerate() {
            if assigned >= target {
                break;
            }
            if quotas[slot] < *size {
                quotas[slot] += 1;
                assigned += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    quotas
}
