// Page/limit parsing for list endpoints.
// Never fails: bad input falls back to defaults and out-of-range values are clamped.

use std::num::IntErrorKind;

use crate::config::PaginationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub skip: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    default_limit: u32,
    max_limit: u32,
}

impl Paginator {
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn from_config(config: &PaginationConfig) -> Self {
        Self::new(config.default_limit, config.max_limit)
    }

    /// Convert raw `page`/`limit` query values into a bounded request.
    pub fn paginate(&self, page: Option<&str>, limit: Option<&str>) -> PageRequest {
        let page = match parse_param(page) {
            Some(p) if p >= 1 => p.min(u32::MAX as i64) as u32,
            _ => 1,
        };

        let limit = match parse_param(limit) {
            Some(l) => l.clamp(1, self.max_limit as i64) as u32,
            None => self.default_limit,
        };

        let skip = (page as u64 - 1).saturating_mul(limit as u64);

        PageRequest { page, limit, skip }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::from_config(&PaginationConfig::default())
    }
}

// Integers only; anything else (empty, "abc", "2.5") counts as absent.
// Integers outside the i64 range saturate so they still clamp.
fn parse_param(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    match s.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Number of pages needed to hold `total` records, `limit` per page.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let req = Paginator::default().paginate(None, None);
        assert_eq!(req, PageRequest { page: 1, limit: 10, skip: 0 });
    }

    #[test]
    fn second_page_skips_first_limit_records() {
        let req = Paginator::default().paginate(Some("2"), Some("10"));
        assert_eq!(req.skip, 10);
        assert_eq!(total_pages(25, req.limit), 3);
    }

    #[test]
    fn non_positive_or_non_numeric_page_defaults_to_one() {
        let paginator = Paginator::default();
        for raw in ["0", "-3", "abc", "", "1.5", " "] {
            assert_eq!(paginator.paginate(Some(raw), None).page, 1, "page {:?}", raw);
        }
    }

    #[test]
    fn limit_is_clamped() {
        let paginator = Paginator::default();
        assert_eq!(paginator.paginate(None, Some("1000")).limit, 100);
        assert_eq!(paginator.paginate(None, Some("0")).limit, 1);
        assert_eq!(paginator.paginate(None, Some("-5")).limit, 1);
        assert_eq!(paginator.paginate(None, Some("nope")).limit, 10);
        assert_eq!(
            paginator.paginate(None, Some("100000000000000000000")).limit,
            100
        );
        assert_eq!(
            paginator.paginate(None, Some("-100000000000000000000")).limit,
            1
        );
    }

    #[test]
    fn page_beyond_i64_saturates() {
        let paginator = Paginator::default();
        assert_eq!(
            paginator.paginate(Some("100000000000000000000"), None).page,
            u32::MAX
        );
        assert_eq!(
            paginator.paginate(Some("-100000000000000000000"), None).page,
            1
        );
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let req = Paginator::default().paginate(Some("99999999999"), Some("100"));
        assert_eq!(req.page, u32::MAX);
        assert_eq!(req.skip, (u32::MAX as u64 - 1) * 100);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        for total in 0..50u64 {
            for limit in 1..12u32 {
                let expected = (total as f64 / limit as f64).ceil() as u64;
                assert_eq!(total_pages(total, limit), expected);
            }
        }
    }

    #[test]
    fn default_limit_never_exceeds_max() {
        let paginator = Paginator::new(500, 50);
        assert_eq!(paginator.paginate(None, None).limit, 50);
    }
}
