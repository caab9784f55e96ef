use num::ToPrimitive;

/// 比率 (num / den)
/// 0.0 when the denominator is zero
///
/// # Arguments
/// * `num` - 分子
/// * `den` - 分母
#[inline]
pub fn ratio<A, B>(num: A, den: B) -> f64
where
    A: ToPrimitive,
    B: ToPrimitive,
{
    let den = den.to_f64().unwrap_or(0.0);
    if den == 0.0 {
        return 0.0;
    }
    num.to_f64().unwrap_or(0.0) / den
}

/// TF-IDF score, `tf * log10(num_docs / df)`
///
/// # Arguments
/// * `tf` - term frequency, a raw count or a proportion
/// * `df` - number of documents containing the term
/// * `num_docs` - number of documents in the collection
///
/// # Returns
/// * `f64` - the score, 0.0 when `df` or `num_docs` is zero
#[inline]
pub fn tfidf<T, D, C>(tf: T, df: D, num_docs: C) -> f64
where
    T: ToPrimitive,
    D: ToPrimitive,
    C: ToPrimitive,
{
    let df = df.to_f64().unwrap_or(0.0);
    let num_docs = num_docs.to_f64().unwrap_or(0.0);
    if df <= 0.0 || num_docs <= 0.0 {
        return 0.0;
    }
    tf.to_f64().unwrap_or(0.0) * (num_docs / df).log10()
}

/// `x * ln(y)` with `0 * ln(0) = 0`
#[inline]
pub fn xlogy(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    x * y.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(3u64, 4usize), 0.75);
        assert_eq!(ratio(3u64, 0u64), 0.0);
        assert_eq!(ratio(0.0f64, 2u32), 0.0);
    }

    #[test]
    fn tfidf_uses_base_ten_log() {
        assert!((tfidf(2u64, 1u64, 100u64) - 4.0).abs() < 1e-12);
        assert!((tfidf(0.5f64, 10u64, 10usize)).abs() < 1e-12);
        assert_eq!(tfidf(5u64, 0u64, 100u64), 0.0);
        assert_eq!(tfidf(5u64, 3u64, 0u64), 0.0);
    }

    #[test]
    fn xlogy_is_zero_at_zero() {
        assert_eq!(xlogy(0.0, 0.0), 0.0);
        assert!((xlogy(2.0, std::f64::consts::E) - 2.0).abs() < 1e-12);
    }
}
