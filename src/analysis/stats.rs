//! Descriptive statistics and the Kruskal–Wallis H test.
//!
//! The p-value is the chi-squared survival function with k-1 degrees of
//! freedom, evaluated through the regularized upper incomplete gamma
//! function.

use serde::{Deserialize, Serialize};

use crate::error::{SurveyError, SurveyResult};

const GAMMA_EPS: f64 = 1e-15;
const GAMMA_MAX_ITER: usize = 500;

/// Named group of observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub values: Vec<f64>,
}

impl Group {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptives {
    pub name: String,
    pub n: usize,
    pub mean: f64,
    /// `None` below two observations
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KruskalWallis {
    pub statistic: f64,
    pub p_value: f64,
    pub df: usize,
}

pub fn mean(values: &[f64]) -> SurveyResult<f64> {
    if values.is_empty() {
        return Err(SurveyError::insufficient("values", "mean of an empty group"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std_dev(values: &[f64]) -> SurveyResult<f64> {
    if values.len() < 2 {
        return Err(SurveyError::insufficient(
            "values",
            format!("sample standard deviation needs 2 observations, got {}", values.len()),
        ));
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((ss / (values.len() - 1) as f64).sqrt())
}

/// Mean and sample standard deviation of a named group
pub fn describe(name: &str, values: &[f64]) -> SurveyResult<Descriptives> {
    if values.is_empty() {
        return Err(SurveyError::insufficient(name, "group has no observations"));
    }
    Ok(Descriptives {
        name: name.to_string(),
        n: values.len(),
        mean: mean(values)?,
        std_dev: sample_std_dev(values).ok(),
    })
}

/// Average ranks (1-based) and the tie term Σ(t³ - t)
pub fn rank_with_ties(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // positions i..j share the average of ranks i+1..=j
        let avg = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        i = j;
    }
    (ranks, tie_term)
}

/// Kruskal–Wallis H test across two or more independent groups.
///
/// Groups may differ in size. Ties get average ranks and the statistic is
/// tie-corrected.
pub fn kruskal_wallis(groups: &[Group]) -> SurveyResult<KruskalWallis> {
    if groups.len() < 2 {
        return Err(SurveyError::insufficient(
            "groups",
            format!("Kruskal-Wallis needs at least 2 groups, got {}", groups.len()),
        ));
    }
    if let Some(empty) = groups.iter().find(|g| g.values.is_empty()) {
        return Err(SurveyError::insufficient(&empty.name, "group has no observations"));
    }
    if let Some(bad) = groups.iter().find(|g| g.values.iter().any(|v| !v.is_finite())) {
        return Err(SurveyError::Validation(format!(
            "group '{}' contains a non-finite value",
            bad.name
        )));
    }

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.values.iter().copied()).collect();
    let n = pooled.len() as f64;
    let (ranks, tie_term) = rank_with_ties(&pooled);

    let correction = 1.0 - tie_term / (n * n * n - n);
    if correction <= 0.0 {
        return Err(SurveyError::insufficient("groups", "all observations are identical"));
    }

    let mut offset = 0;
    let mut rank_term = 0.0;
    for group in groups {
        let size = group.values.len();
        let rank_sum: f64 = ranks[offset..offset + size].iter().sum();
        rank_term += rank_sum * rank_sum / size as f64;
        offset += size;
    }

    let h = (12.0 / (n * (n + 1.0)) * rank_term - 3.0 * (n + 1.0)) / correction;
    let df = groups.len() - 1;
    Ok(KruskalWallis {
        statistic: h,
        p_value: chi_squared_sf(h, df as f64),
        df,
    })
}

/// Upper tail of the chi-squared distribution
pub fn chi_squared_sf(x: f64, df: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    regularized_gamma_q(df / 2.0, x / 2.0)
}

/// Natural log of Γ(x), Lanczos approximation (g = 7, n = 9)
pub fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // reflection
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut a = COEF[0];
    let t = x + 7.5;
    for (i, c) in COEF.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Q(a, x) = Γ(a, x) / Γ(a)
pub fn regularized_gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < a + 1.0 {
        1.0 - gamma_p_series(a, x)
    } else {
        gamma_q_continued_fraction(a, x)
    }
}

fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut del = sum;
    for _ in 0..GAMMA_MAX_ITER {
        ap += 1.0;
        del *= x / ap;
        sum += del;
        if del.abs() < sum.abs() * GAMMA_EPS {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

// Modified Lentz evaluation
fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    let tiny = f64::MIN_POSITIVE / GAMMA_EPS;
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / tiny;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=GAMMA_MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < tiny {
            d = tiny;
        }
        c = b + an / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < GAMMA_EPS {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values).unwrap(), 5.0);
        assert!(close(sample_std_dev(&values).unwrap(), 2.138_089_935_299_395, 1e-12));
    }

    #[test]
    fn test_describe_names_the_group() {
        let err = describe("neutral", &[]).unwrap_err();
        assert!(matches!(err, SurveyError::InsufficientData { group, .. } if group == "neutral"));
        let single = describe("neutral", &[1.0]).unwrap();
        assert_eq!(single.std_dev, None);
        assert_eq!(single.mean, 1.0);
    }

    #[test]
    fn test_rank_with_ties() {
        let (ranks, ties) = rank_with_ties(&[3.0, 1.0, 3.0, 2.0]);
        assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
        assert_eq!(ties, 6.0);
    }

    #[test]
    fn test_ln_gamma_known_values() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-13));
        assert!(close(ln_gamma(5.0), 24f64.ln(), 1e-12));
        assert!(close(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), 1e-12));
    }

    #[test]
    fn test_chi_squared_sf() {
        // df = 2 has the closed form exp(-x/2)
        for x in [0.5, 2.0, 7.5, 20.0] {
            assert!(close(chi_squared_sf(x, 2.0), (-x / 2.0f64).exp(), 1e-12));
        }
        // df = 1 critical value at alpha = 0.05
        assert!(close(chi_squared_sf(3.841_458_820_694_124, 1.0), 0.05, 1e-9));
        assert_eq!(chi_squared_sf(0.0, 3.0), 1.0);
    }

    #[test]
    fn test_kruskal_wallis_without_ties() {
        let groups = vec![
            Group::new("a", [1.0, 2.0, 3.0]),
            Group::new("b", [4.0, 5.0, 6.0]),
            Group::new("c", [7.0, 8.0, 9.0]),
        ];
        let result = kruskal_wallis(&groups).unwrap();
        // rank sums 6, 15, 24 over N = 9
        assert!(close(result.statistic, 7.2, 1e-12));
        assert!(close(result.p_value, (-3.6f64).exp(), 1e-12));
        assert_eq!(result.df, 2);
    }

    #[test]
    fn test_kruskal_wallis_rejects_empty_group() {
        let groups = vec![Group::new("a", [1.0]), Group::new("neutral", []), Group::new("b", [2.0])];
        let err = kruskal_wallis(&groups).unwrap_err();
        assert!(matches!(err, SurveyError::InsufficientData { group, .. } if group == "neutral"));
    }

    #[test]
    fn test_kruskal_wallis_identical_values() {
        let groups = vec![Group::new("a", [3.0, 3.0]), Group::new("b", [3.0])];
        assert!(matches!(kruskal_wallis(&groups), Err(SurveyError::InsufficientData { .. })));
    }
}
