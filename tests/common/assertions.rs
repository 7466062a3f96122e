//! Domain-specific assertion macros for quina harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! part of a served draw or page is wrong.

// ---------------------------------------------------------------------------
// Draw assertions
// ---------------------------------------------------------------------------

/// Assert that a `DrawResult` has the expected draw number, date and numbers.
///
/// ```rust
/// assert_draw!(draw, "6907", "19th December 2025", [23, 41, 46, 58, 66]);
/// ```
#[macro_export]
macro_rules! assert_draw {
    ($draw:expr, $number:expr, $date:expr, [$($n:expr),* $(,)?]) => {{
        let draw: &quina_core::DrawResult = &$draw;
        let expected: Vec<serde_json::Value> = vec![$(serde_json::json!($n)),*];
        pretty_assertions::assert_eq!(draw.draw_number, $number, "drawNumber of {:?}", draw);
        pretty_assertions::assert_eq!(draw.date, $date, "date of draw {}", draw.draw_number);
        pretty_assertions::assert_eq!(draw.numbers, expected, "numbers of draw {}", draw.draw_number);
    }};
}

/// Assert that draws are ordered newest first by numeric draw number.
#[macro_export]
macro_rules! assert_newest_first {
    ($draws:expr) => {{
        let draws: &[quina_core::DrawResult] = &$draws;
        for pair in draws.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if let (Some(x), Some(y)) = (a.numeric_draw_number(), b.numeric_draw_number()) {
                assert!(
                    x >= y,
                    "assert_newest_first! failed: draw {} comes before draw {}",
                    a.draw_number,
                    b.draw_number
                );
            }
        }
    }};
}

// ---------------------------------------------------------------------------
// Page assertions
// ---------------------------------------------------------------------------

/// Assert the shape of a `/api/results` JSON body: `latest` is null exactly
/// when the page is empty, and `previous` has `$previous` entries.
#[macro_export]
macro_rules! assert_page_shape {
    ($body:expr, latest: $latest:expr, previous: $previous:expr) => {{
        let body: &serde_json::Value = &$body;
        let latest: Option<&str> = $latest;
        match latest {
            Some(n) => pretty_assertions::assert_eq!(
                body["latest"]["drawNumber"],
                serde_json::json!(n),
                "latest draw in {}",
                body
            ),
            None => assert!(body["latest"].is_null(), "expected null latest in {}", body),
        }
        let previous = body["previous"]
            .as_array()
            .unwrap_or_else(|| panic!("previous is not an array in {}", body));
        pretty_assertions::assert_eq!(previous.len(), $previous, "previous count in {}", body);
        let stamp = body["lastUpdated"]
            .as_str()
            .unwrap_or_else(|| panic!("lastUpdated missing in {}", body));
        assert!(
            chrono::DateTime::parse_from_rfc3339(stamp).is_ok() && stamp.ends_with('Z'),
            "lastUpdated {:?} is not ISO-8601 UTC",
            stamp
        );
    }};
}
