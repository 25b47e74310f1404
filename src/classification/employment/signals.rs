use crate::classification::domain::EmploymentCategory;
use serde::Serialize;

/// Independent pieces of evidence considered by the employment classifier, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    InternKeyword,
    CampusKeyword,
    PartTimeKeyword,
    Duration,
    ExperienceYears,
    ManagerTitle,
    RawType,
}

impl SignalKind {
    pub fn weight(&self) -> u8 {
        match self {
            SignalKind::InternKeyword | SignalKind::CampusKeyword | SignalKind::PartTimeKeyword => {
                3
            }
            SignalKind::Duration => 2,
            SignalKind::ExperienceYears | SignalKind::ManagerTitle => 3,
            SignalKind::RawType => 4,
        }
    }
}

/// A signal that fired, and whether it changed the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalOutcome {
    pub signal: SignalKind,
    pub category: EmploymentCategory,
    pub weight: u8,
    pub applied: bool,
}

/// Running decision. A signal replaces it only with a strictly greater weight.
#[derive(Debug, Default)]
pub(crate) struct WeightedDecision {
    category: Option<EmploymentCategory>,
    weight: u8,
    trail: Vec<SignalOutcome>,
}

impl WeightedDecision {
    pub(crate) fn offer(&mut self, signal: SignalKind, category: EmploymentCategory) {
        let applied = signal.weight() > self.weight;
        self.record(signal, category, applied);
    }

    /// Part-time keywords may also replace an intern or campus decision held at the same weight.
    pub(crate) fn offer_part_time(&mut self) {
        let signal = SignalKind::PartTimeKeyword;
        let displaces_student_hire = signal.weight() == self.weight
            && matches!(
                self.category,
                Some(EmploymentCategory::Intern | EmploymentCategory::FullTimeCampus)
            );
        let applied = signal.weight() > self.weight || displaces_student_hire;
        self.record(signal, EmploymentCategory::PartTime, applied);
    }

    pub(crate) fn finish(self) -> (EmploymentCategory, u8, Vec<SignalOutcome>) {
        (
            self.category.unwrap_or(EmploymentCategory::FullTimeSocial),
            self.weight,
            self.trail,
        )
    }

    fn record(&mut self, signal: SignalKind, category: EmploymentCategory, applied: bool) {
        if applied {
            self.category = Some(category);
            self.weight = signal.weight();
        }
        self.trail.push(SignalOutcome {
            signal,
            category,
            weight: signal.weight(),
            applied,
        });
    }
}
