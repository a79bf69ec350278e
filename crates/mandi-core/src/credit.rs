//! # Tiered Credit/Discount Calculator
//!
//! Converts a continuous settlement-slider position (0-100) into a
//! discrete day count and an associated discount/interest rate, then
//! computes the payable total for the breakdown table.
//!
//! ## Segment Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  discount tiers        synthetic gap           interest tiers           │
//! │  ┌──────────────┐      ┌──────────────┐      ┌──────────────┐          │
//! │  │ 0-15d  -5%   │      │ 16-44d   0%  │      │ 45-60d  +2%  │          │
//! │  └──────────────┘      └──────────────┘      └──────────────┘          │
//! │                                                                         │
//! │  slider 0 ────────────────── 50 ─────────────────────── 100            │
//! │  Each segment owns an equal slice of the slider; the position within   │
//! │  a slice interpolates linearly between the segment's day bounds.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Admin configuration is sanitized (sorted, overlaps dropped) before
//! segments are built. The calculator is total: every finite subtotal
//! and slider position yields a quote, never an error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Rate, RepaymentRules, Tier};

// =============================================================================
// Segments
// =============================================================================

/// What a segment does to the payable amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Paying early: amount is subtracted.
    Discount,
    /// The standard window: no adjustment.
    None,
    /// Paying late: amount is added.
    Interest,
}

/// One slice of the slider: a day range with a rate and a kind.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// First day of the range (inclusive).
    pub start: i64,
    /// Last day of the range (inclusive).
    pub end: i64,
    /// Rate applied within this segment.
    pub rate: Rate,
    /// Discount, standard window, or interest.
    pub kind: SegmentKind,
    /// Configured display name, if any.
    pub name: Option<String>,
}

impl Segment {
    fn from_tier(tier: &Tier, kind: SegmentKind) -> Segment {
        Segment {
            start: tier.start,
            end: tier.end,
            rate: Rate::from_percentage(tier.rate),
            kind,
            name: tier.name.clone(),
        }
    }

    /// Display label: the configured name, else a generated day-range
    /// label ("0-15 days"; interest reads open-ended, "After 45 days").
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => match self.kind {
                SegmentKind::Interest => format!("After {} days", self.start),
                _ => format!("{}-{} days", self.start, self.end),
            },
        }
    }
}

/// Builds the ordered segment list for a rule configuration:
/// sanitized discount tiers, a synthetic zero-rate segment spanning any
/// gap between the last discount tier and the first interest tier, then
/// sanitized interest tiers.
///
/// Both lists empty → empty segment list (the quote degenerates).
pub fn build_segments(rules: &RepaymentRules) -> Vec<Segment> {
    let clean = rules.sanitized();
    let mut segments: Vec<Segment> = clean
        .discount_tiers
        .iter()
        .map(|t| Segment::from_tier(t, SegmentKind::Discount))
        .collect();

    if let (Some(last_discount), Some(first_interest)) =
        (clean.discount_tiers.last(), clean.interest_tiers.first())
    {
        if first_interest.start > last_discount.end + 1 {
            segments.push(Segment {
                start: last_discount.end + 1,
                end: first_interest.start - 1,
                rate: Rate::zero(),
                kind: SegmentKind::None,
                name: None,
            });
        }
    }

    segments.extend(
        clean
            .interest_tiers
            .iter()
            .map(|t| Segment::from_tier(t, SegmentKind::Interest)),
    );

    segments
}

// =============================================================================
// Credit Quote
// =============================================================================

/// The breakdown-table row for one slider position.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreditQuote {
    /// The active segment's rate.
    pub rate: Rate,
    /// Adjustment amount in paise (always >= 0).
    pub amount_paise: i64,
    /// Final payable amount in paise.
    pub payable_paise: i64,
    /// Human label for the active segment.
    pub label: String,
    /// Discount, standard window, or interest.
    pub kind: SegmentKind,
    /// Settlement day the slider position resolves to.
    pub days: i64,
}

/// Maps a slider position onto the segment list and computes the payable
/// total.
///
/// ## Position mapping
/// The 0-100 range is divided into N equal portions (N = segment count).
/// The active segment is `floor(progress / portion)`, clamped to the last
/// index at the right boundary. The fractional position inside the
/// portion interpolates linearly between the segment's day bounds,
/// rounded to the nearest whole day.
///
/// ## Payable
/// `amount = subtotal × rate`; discount subtracts, interest adds, the
/// standard window leaves the subtotal unchanged.
///
/// Out-of-range progress is clamped into [0, 100]; an empty rule
/// configuration yields the degenerate "No rules" quote.
pub fn credit_quote(subtotal_paise: i64, progress: f64, rules: &RepaymentRules) -> CreditQuote {
    let segments = build_segments(rules);
    if segments.is_empty() {
        return CreditQuote {
            rate: Rate::zero(),
            amount_paise: 0,
            payable_paise: subtotal_paise,
            label: "No rules".to_string(),
            kind: SegmentKind::None,
            days: 0,
        };
    }

    let progress = if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let portion = 100.0 / segments.len() as f64;
    let index = ((progress / portion).floor() as usize).min(segments.len() - 1);
    let segment = &segments[index];

    // Exactly 1.0 at the right boundary so days lands on the last `end`.
    let fraction = if progress >= 100.0 {
        1.0
    } else {
        (progress - index as f64 * portion) / portion
    };
    let days = (segment.start as f64 + fraction * (segment.end - segment.start) as f64).round() as i64;

    let subtotal = Money::from_paise(subtotal_paise);
    let amount = subtotal.apply_rate(segment.rate);
    let payable = match segment.kind {
        SegmentKind::Discount => subtotal - amount,
        SegmentKind::Interest => subtotal + amount,
        SegmentKind::None => subtotal,
    };

    CreditQuote {
        rate: segment.rate,
        amount_paise: amount.paise(),
        payable_paise: payable.paise(),
        label: segment.label(),
        kind: segment.kind,
        days,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(start: i64, end: i64, rate: f64) -> Tier {
        Tier {
            start,
            end,
            rate,
            name: None,
        }
    }

    fn named(start: i64, end: i64, rate: f64, name: &str) -> Tier {
        Tier {
            start,
            end,
            rate,
            name: Some(name.to_string()),
        }
    }

    /// Discount 0-15 @5%, interest 45-60 @2%: the configuration used by
    /// the vendor bulk-order slider.
    fn rules() -> RepaymentRules {
        RepaymentRules {
            discount_tiers: vec![tier(0, 15, 5.0)],
            interest_tiers: vec![tier(45, 60, 2.0)],
        }
    }

    const SUBTOTAL: i64 = 1_000_000; // ₹10,000.00

    #[test]
    fn test_segments_include_synthetic_gap() {
        let segments = build_segments(&rules());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].kind, SegmentKind::Discount);
        assert_eq!(segments[1].kind, SegmentKind::None);
        assert_eq!((segments[1].start, segments[1].end), (16, 44));
        assert!(segments[1].rate.is_zero());
        assert_eq!(segments[2].kind, SegmentKind::Interest);
    }

    #[test]
    fn test_no_synthetic_segment_for_adjacent_tiers() {
        let rules = RepaymentRules {
            discount_tiers: vec![tier(0, 15, 5.0)],
            interest_tiers: vec![tier(16, 30, 2.0)],
        };
        let segments = build_segments(&rules);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.kind != SegmentKind::None));
    }

    #[test]
    fn test_no_synthetic_segment_without_both_lists() {
        let only_discounts = RepaymentRules {
            discount_tiers: vec![tier(0, 15, 5.0)],
            interest_tiers: vec![],
        };
        assert_eq!(build_segments(&only_discounts).len(), 1);

        let only_interest = RepaymentRules {
            discount_tiers: vec![],
            interest_tiers: vec![tier(45, 60, 2.0)],
        };
        let segments = build_segments(&only_interest);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Interest);
    }

    #[test]
    fn test_segments_built_from_unsorted_config() {
        let rules = RepaymentRules {
            discount_tiers: vec![tier(16, 30, 3.0), tier(0, 15, 5.0)],
            interest_tiers: vec![tier(45, 60, 2.0)],
        };
        let segments = build_segments(&rules);
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments[1].start, 16);
        // Gap 31-44 becomes the synthetic window.
        assert_eq!((segments[2].start, segments[2].end), (31, 44));
        assert_eq!(segments[3].kind, SegmentKind::Interest);
    }

    #[test]
    fn test_quote_at_left_boundary() {
        let quote = credit_quote(SUBTOTAL, 0.0, &rules());
        assert_eq!(quote.kind, SegmentKind::Discount);
        assert_eq!(quote.days, 0);
        assert_eq!(quote.rate.bps(), 500);
        assert_eq!(quote.amount_paise, 50_000); // ₹500
        assert_eq!(quote.payable_paise, 950_000); // ₹9,500
    }

    #[test]
    fn test_quote_mid_slider_hits_standard_window() {
        let quote = credit_quote(SUBTOTAL, 50.0, &rules());
        assert_eq!(quote.kind, SegmentKind::None);
        assert!(quote.rate.is_zero());
        assert_eq!(quote.amount_paise, 0);
        assert_eq!(quote.payable_paise, SUBTOTAL);
        // Halfway through the 16-44 window.
        assert_eq!(quote.days, 30);
    }

    #[test]
    fn test_quote_at_right_boundary() {
        let quote = credit_quote(SUBTOTAL, 100.0, &rules());
        assert_eq!(quote.kind, SegmentKind::Interest);
        assert_eq!(quote.days, 60);
        assert_eq!(quote.rate.bps(), 200);
        assert_eq!(quote.amount_paise, 20_000); // ₹200
        assert_eq!(quote.payable_paise, 1_020_000); // ₹10,200
    }

    #[test]
    fn test_boundary_days_equal_segment_bounds() {
        // progress = 0 resolves to the first segment's start; progress = 100
        // to the last segment's end, for any segment count.
        for rules in [
            rules(),
            RepaymentRules {
                discount_tiers: vec![tier(3, 10, 5.0)],
                interest_tiers: vec![],
            },
        ] {
            let segments = build_segments(&rules);
            let low = credit_quote(SUBTOTAL, 0.0, &rules);
            let high = credit_quote(SUBTOTAL, 100.0, &rules);
            assert_eq!(low.days, segments.first().unwrap().start);
            assert_eq!(high.days, segments.last().unwrap().end);
        }
    }

    #[test]
    fn test_discount_and_interest_signs() {
        let discount = credit_quote(SUBTOTAL, 0.0, &rules());
        assert!(discount.amount_paise >= 0);
        assert_eq!(discount.payable_paise, SUBTOTAL - discount.amount_paise);

        let interest = credit_quote(SUBTOTAL, 100.0, &rules());
        assert!(interest.amount_paise >= 0);
        assert_eq!(interest.payable_paise, SUBTOTAL + interest.amount_paise);
    }

    #[test]
    fn test_empty_rules_degenerate_quote() {
        let quote = credit_quote(SUBTOTAL, 50.0, &RepaymentRules::default());
        assert_eq!(quote.rate, Rate::zero());
        assert_eq!(quote.amount_paise, 0);
        assert_eq!(quote.payable_paise, SUBTOTAL);
        assert_eq!(quote.label, "No rules");
        assert_eq!(quote.kind, SegmentKind::None);
        assert_eq!(quote.days, 0);
    }

    #[test]
    fn test_progress_clamped_into_range() {
        let below = credit_quote(SUBTOTAL, -20.0, &rules());
        assert_eq!(below.days, 0);

        let above = credit_quote(SUBTOTAL, 250.0, &rules());
        assert_eq!(above.days, 60);
    }

    #[test]
    fn test_labels() {
        let rules = RepaymentRules {
            discount_tiers: vec![named(0, 15, 5.0, "Early payment")],
            interest_tiers: vec![tier(45, 60, 2.0)],
        };
        let segments = build_segments(&rules);
        assert_eq!(segments[0].label(), "Early payment");
        assert_eq!(segments[1].label(), "16-44 days");
        assert_eq!(segments[2].label(), "After 45 days");
    }

    #[test]
    fn test_fractional_rate_tier() {
        // 2.5% on ₹10,000 = ₹250
        let rules = RepaymentRules {
            discount_tiers: vec![tier(0, 10, 2.5)],
            interest_tiers: vec![],
        };
        let quote = credit_quote(SUBTOTAL, 0.0, &rules);
        assert_eq!(quote.rate.bps(), 250);
        assert_eq!(quote.amount_paise, 25_000);
    }
}
