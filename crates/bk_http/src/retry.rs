//! Retry eligibility and backoff.
//!
//! The delay before retry `n` (counting from zero) is `0.5s * 2^n`, capped at
//! [`MAX_DELAY`], then shifted by a jitter of at most [`MAX_JITTER`] either
//! way. A parseable `Retry-After` header replaces the computed delay and is
//! honored without jitter. The result never exceeds [`MAX_DELAY`].

use core::time::Duration;

use http::{HeaderMap, StatusCode, header};

pub const INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const MAX_DELAY: Duration = Duration::from_secs(60);
pub const MAX_JITTER: Duration = Duration::from_millis(500);

/// Returns `true` for statuses worth another attempt: 409, 429 and 5xx.
pub fn is_retryable(status: StatusCode) -> bool {
    matches!(status.as_u16(), 409 | 429) || status.is_server_error()
}

/// Reads `Retry-After` given in whole seconds.
///
/// HTTP dates are not supported and read as absent.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(header::RETRY_AFTER)?.to_str().ok()?;
    let secs: u64 = value.trim().parse().ok()?;
    Some(Duration::from_secs(secs))
}

/// The delay before retry number `retry`, given the server's hint and a
/// per-attempt random `seed`.
pub fn backoff(retry: u32, retry_after: Option<Duration>, seed: u64) -> Duration {
    if let Some(hint) = retry_after {
        return hint.min(MAX_DELAY);
    }

    let factor = 1_u32.checked_shl(retry).unwrap_or(u32::MAX);
    let capped = INITIAL_DELAY.saturating_mul(factor).min(MAX_DELAY);

    let jitter_ms = jitter(seed) * MAX_JITTER.as_millis() as f64;
    let delay_ms = (capped.as_millis() as f64 + jitter_ms).max(0.0);
    Duration::from_millis(delay_ms as u64).min(MAX_DELAY)
}

/// Maps a seed to `[-1.0, 1.0)`.
fn jitter(seed: u64) -> f64 {
    let mantissa = (mix64(seed) >> 11) as f64;
    let unit = mantissa / ((1_u64 << 53) as f64);
    unit * 2.0 - 1.0
}

#[inline]
fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn retryable_statuses() {
        for code in [409, 429, 500, 502, 503, 599] {
            assert!(is_retryable(StatusCode::from_u16(code).unwrap()), "{code}");
        }
        for code in [200, 400, 401, 403, 404, 422] {
            assert!(!is_retryable(StatusCode::from_u16(code).unwrap()), "{code}");
        }
    }

    #[test]
    fn retry_after_seconds_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));

        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn exponential_with_bounded_jitter() {
        for seed in 0..200_u64 {
            for retry in 0..4 {
                let base = INITIAL_DELAY * (1 << retry);
                let delay = backoff(retry, None, seed);
                assert!(delay + MAX_JITTER >= base, "retry {retry} seed {seed}: {delay:?}");
                assert!(delay <= base + MAX_JITTER, "retry {retry} seed {seed}: {delay:?}");
            }
        }
    }

    #[test]
    fn never_exceeds_the_cap() {
        for seed in 0..200_u64 {
            assert!(backoff(7, None, seed) <= MAX_DELAY);
            assert!(backoff(40, None, seed) <= MAX_DELAY);
            assert!(backoff(60, None, seed) >= MAX_DELAY - MAX_JITTER);
        }
    }

    #[test]
    fn server_hint_wins() {
        assert_eq!(backoff(0, Some(Duration::from_secs(2)), 7), Duration::from_secs(2));
        assert_eq!(backoff(0, Some(Duration::from_secs(120)), 7), MAX_DELAY);
        assert_eq!(backoff(3, Some(Duration::ZERO), 7), Duration::ZERO);
    }

    #[test]
    fn jitter_range() {
        for seed in 0..1000_u64 {
            let j = jitter(seed);
            assert!((-1.0..1.0).contains(&j));
        }
    }
}
