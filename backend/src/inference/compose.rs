use rand::Rng;
use shared::{ClassificationEntry, HealthReport};

/// Number of classes reported per image.
pub const TOP_K: usize = 2;
pub const PLACEHOLDER_LABEL: &str = "placeholder";
const UNKNOWN_LABEL: &str = "unknown";

// Placeholder score range until a dermatology model replaces the random draw.
const ACNE_MIN: f64 = 70.0;
const ACNE_MAX: f64 = 95.0;

/// Indices and probabilities of the `k` most likely classes, most likely
/// first. Ties go to the lower index.
pub fn top_k(predictions: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = predictions.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}

/// Always returns exactly `TOP_K` entries. Without a label table nothing is
/// decoded and fixed placeholders are returned instead; a prediction vector
/// shorter than `TOP_K` is padded with zero-probability `unknown` entries.
pub fn top_classes(predictions: &[f32], labels: Option<&[&str]>) -> Vec<ClassificationEntry> {
    let Some(labels) = labels else {
        return vec![placeholder(); TOP_K];
    };

    let mut classes: Vec<ClassificationEntry> = top_k(predictions, TOP_K)
        .into_iter()
        .map(|(index, probability)| ClassificationEntry {
            label: labels.get(index).copied().unwrap_or(UNKNOWN_LABEL).to_string(),
            probability: round_to(f64::from(probability), 3),
        })
        .collect();
    classes.resize_with(TOP_K, || ClassificationEntry {
        label: UNKNOWN_LABEL.to_string(),
        probability: 0.0,
    });
    classes
}

/// Draws `(acne, eczema)`. The two always sum to 100 and carry no
/// information about the image.
pub fn health_scores<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let acne = round_to(rng.random_range(ACNE_MIN..=ACNE_MAX), 2);
    (acne, round_to(100.0 - acne, 2))
}

pub fn compose<R: Rng + ?Sized>(
    predictions: &[f32],
    labels: Option<&[&str]>,
    rng: &mut R,
) -> HealthReport {
    let (acne, eczema) = health_scores(rng);
    HealthReport {
        acne,
        eczema,
        model_top_classes: top_classes(predictions, labels),
    }
}

fn placeholder() -> ClassificationEntry {
    ClassificationEntry {
        label: PLACEHOLDER_LABEL.to_string(),
        probability: 0.0,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
