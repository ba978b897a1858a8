// crates/curtail-core/src/runtime/report.rs
// ============================================================================
// Module: Curtail Violation Report
// Description: Batch evaluation across all subscribers.
// Purpose: Produce ordered violation tables and SMS eligibility lists.
// Dependencies: crate::core, crate::runtime::{evaluator, tiers}, rayon, serde, tracing
// ============================================================================

//! ## Overview
//! [`evaluate_all`] maps every subscriber through [`evaluate`] in parallel and
//! then sorts the results, so output order never depends on scheduling.
//! Violations come first, highest percentage first; everything else follows
//! in subscriber id order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::core::RestrictionBook;
use crate::core::Subscriber;
use crate::core::SubscriberId;
use crate::core::TariffCode;
use crate::runtime::evaluator::Assessment;
use crate::runtime::evaluator::EvaluationPolicy;
use crate::runtime::evaluator::evaluate;
use crate::runtime::tiers::ActionThresholds;
use crate::runtime::tiers::ActionTier;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Evaluation outcome for one subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberAssessment {
    /// Subscriber identifier.
    pub id: SubscriberId,
    /// Subscriber display name.
    pub name: String,
    /// Tariff used to resolve restrictions.
    pub tariff: TariffCode,
    /// Evaluation result.
    pub assessment: Assessment,
    /// Enforcement tier for violations.
    pub tier: Option<ActionTier>,
}

impl SubscriberAssessment {
    /// Violation percentage, or `0` for non-violations.
    #[must_use]
    pub fn violation_pct(&self) -> f64 {
        self.assessment.violation().map_or(0.0, |violation| violation.violation_pct)
    }
}

/// Outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Subscribers evaluated.
    pub evaluated: usize,
    /// Violations detected.
    pub violating: usize,
    /// Compliant subscribers.
    pub compliant: usize,
    /// Subscribers excluded from classification.
    pub excluded: usize,
    /// Violations in the warning tier.
    pub warning_notice: usize,
    /// Violations in the pressure-reduction tier.
    pub pressure_reduction: usize,
    /// Violations in the cutoff tier.
    pub supply_cutoff: usize,
}

/// Batch evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    /// Policy used for every subscriber.
    pub policy: EvaluationPolicy,
    /// Thresholds used for tiering.
    pub thresholds: ActionThresholds,
    /// Ordered per-subscriber outcomes.
    pub assessments: Vec<SubscriberAssessment>,
    /// Outcome counts.
    pub summary: ReportSummary,
}

impl ViolationReport {
    /// Iterates violating subscribers in report order.
    pub fn violations(&self) -> impl Iterator<Item = &SubscriberAssessment> {
        self.assessments.iter().filter(|entry| entry.assessment.is_violation())
    }

    /// Iterates subscribers assigned to `tier`.
    pub fn in_tier(&self, tier: ActionTier) -> impl Iterator<Item = &SubscriberAssessment> {
        self.assessments.iter().filter(move |entry| entry.tier == Some(tier))
    }

    /// Subscribers eligible for an SMS notice (any tier).
    #[must_use]
    pub fn sms_recipients(&self) -> Vec<&SubscriberAssessment> {
        self.assessments.iter().filter(|entry| entry.tier.is_some()).collect()
    }
}

// ============================================================================
// SECTION: Batch Evaluation
// ============================================================================

/// Evaluates every subscriber and assembles an ordered report.
#[must_use]
pub fn evaluate_all(
    subscribers: &[Subscriber],
    restrictions: &RestrictionBook,
    policy: EvaluationPolicy,
    thresholds: ActionThresholds,
) -> ViolationReport {
    let mut assessments: Vec<SubscriberAssessment> = subscribers
        .par_iter()
        .map(|subscriber| {
            let assessment = evaluate(subscriber, restrictions.get(&subscriber.tariff), policy);
            let tier = assessment
                .violation()
                .and_then(|violation| thresholds.classify(violation.violation_pct));
            debug!(
                subscriber = %subscriber.id,
                tariff = %subscriber.tariff,
                violation = assessment.is_violation(),
                tier = tier.map(ActionTier::as_str),
                "subscriber evaluated"
            );
            SubscriberAssessment {
                id: subscriber.id.clone(),
                name: subscriber.name.clone(),
                tariff: subscriber.tariff.clone(),
                assessment,
                tier,
            }
        })
        .collect();
    assessments.sort_by(report_order);

    let unconfigured: BTreeSet<&TariffCode> = subscribers
        .iter()
        .map(|subscriber| &subscriber.tariff)
        .filter(|tariff| restrictions.get(tariff).is_none())
        .collect();
    for tariff in unconfigured {
        warn!(tariff = %tariff, "no restriction configured; treating as 0%");
    }

    let summary = summarize(&assessments);
    ViolationReport {
        policy,
        thresholds,
        assessments,
        summary,
    }
}

/// Violations by descending percentage, then everything by subscriber id.
fn report_order(left: &SubscriberAssessment, right: &SubscriberAssessment) -> Ordering {
    right
        .assessment
        .is_violation()
        .cmp(&left.assessment.is_violation())
        .then_with(|| right.violation_pct().total_cmp(&left.violation_pct()))
        .then_with(|| left.id.cmp(&right.id))
}

/// Counts outcomes and tiers.
fn summarize(assessments: &[SubscriberAssessment]) -> ReportSummary {
    let mut summary = ReportSummary {
        evaluated: assessments.len(),
        ..ReportSummary::default()
    };
    for entry in assessments {
        match entry.assessment {
            Assessment::Violation(_) => summary.violating += 1,
            Assessment::Compliant(_) => summary.compliant += 1,
            Assessment::Excluded(_) => summary.excluded += 1,
        }
        match entry.tier {
            Some(ActionTier::WarningNotice) => summary.warning_notice += 1,
            Some(ActionTier::PressureReduction) => summary.pressure_reduction += 1,
            Some(ActionTier::SupplyCutoff) => summary.supply_cutoff += 1,
            None => {}
        }
    }
    summary
}
