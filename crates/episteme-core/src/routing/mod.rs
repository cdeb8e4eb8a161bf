//! Mode Routing
//!
//! Maps a vector set and a threshold profile to a [`Mode`]. Rules are
//! evaluated in strict priority order and the first match wins:
//!
//! | # | condition                                   | mode                       |
//! |---|---------------------------------------------|----------------------------|
//! | 1 | `context < context_low`                     | `load_context`             |
//! | 2 | `uncertainty > uncertainty_high`            | `clarify`                  |
//! | 3 | `know < know_low`                           | `investigate`              |
//! | 4 | `clarity < clarity_low`                     | `cautious_implementation`  |
//! | 5 | `know >= know_high && clarity >= clarity_high` | `confident_implementation` |
//! | 6 | otherwise                                   | `cautious_implementation`  |
//!
//! A missing or invalid profile, or non-finite vectors, yield `unknown` with
//! confidence 0.

use episteme_common::{Mode, RoutingDecision, ThresholdProfile, VectorSet};

const EPSILON: f64 = 1e-9;

/// Fraction of the available room by which `distance` clears a cutoff
fn normalized(distance: f64, room: f64) -> f64 {
    if room <= EPSILON {
        if distance >= 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        (distance / room).clamp(0.0, 1.0)
    }
}

/// How far `value` sits below `cutoff`, relative to the room below it
fn margin_below(value: f64, cutoff: f64) -> f64 {
    normalized(cutoff - value, cutoff)
}

/// How far `value` sits above `cutoff`, relative to the room above it
fn margin_above(value: f64, cutoff: f64) -> f64 {
    normalized(value - cutoff, 1.0 - cutoff)
}

/// Route a vector set to a mode
///
/// `_context` is the request summary; the threshold rules do not read it,
/// it is accepted so context-sensitive rules can be added without changing
/// callers. Pure and deterministic.
pub fn route(
    vectors: &VectorSet,
    _context: &str,
    thresholds: Option<&ThresholdProfile>,
) -> RoutingDecision {
    let Some(t) = thresholds else {
        return RoutingDecision::unknown("no threshold profile supplied");
    };
    if let Err(e) = t.validate() {
        return RoutingDecision::unknown(format!("malformed thresholds: {}", e));
    }
    if !vectors.is_well_formed() {
        return RoutingDecision::unknown("malformed vectors: non-finite value");
    }

    let v = vectors.clamped();

    if v.context < t.context_low {
        return RoutingDecision::new(
            Mode::LoadContext,
            margin_below(v.context, t.context_low),
            format!(
                "load_context: context {:.2} < context_low {:.2}",
                v.context, t.context_low
            ),
        );
    }

    if v.uncertainty > t.uncertainty_high {
        return RoutingDecision::new(
            Mode::Clarify,
            margin_above(v.uncertainty, t.uncertainty_high),
            format!(
                "clarify: uncertainty {:.2} > uncertainty_high {:.2}",
                v.uncertainty, t.uncertainty_high
            ),
        );
    }

    if v.know < t.know_low {
        return RoutingDecision::new(
            Mode::Investigate,
            margin_below(v.know, t.know_low),
            format!("investigate: know {:.2} < know_low {:.2}", v.know, t.know_low),
        );
    }

    if v.clarity < t.clarity_low {
        return RoutingDecision::new(
            Mode::CautiousImplementation,
            margin_below(v.clarity, t.clarity_low),
            format!(
                "cautious_implementation: clarity {:.2} < clarity_low {:.2}",
                v.clarity, t.clarity_low
            ),
        );
    }

    if v.know >= t.know_high && v.clarity >= t.clarity_high {
        let confidence =
            margin_above(v.know, t.know_high).min(margin_above(v.clarity, t.clarity_high));
        return RoutingDecision::new(
            Mode::ConfidentImplementation,
            confidence,
            format!(
                "confident_implementation: know {:.2} >= {:.2}, clarity {:.2} >= {:.2}",
                v.know, t.know_high, v.clarity, t.clarity_high
            ),
        );
    }

    // Fallback: confidence is the largest remaining shortfall to the
    // confident bar, as a fraction of the low..high band.
    let know_gap = normalized((t.know_high - v.know).max(0.0), t.know_high - t.know_low);
    let clarity_gap = normalized(
        (t.clarity_high - v.clarity).max(0.0),
        t.clarity_high - t.clarity_low,
    );
    RoutingDecision::new(
        Mode::CautiousImplementation,
        know_gap.max(clarity_gap),
        format!(
            "cautious_implementation (default): know {:.2}, clarity {:.2} below confident bar",
            v.know, v.clarity
        ),
    )
}
