//! Application state and its transitions
//!
//! [`AppState::apply`] is a pure reducer: old state plus an [`Action`] gives
//! the new state. Requests to the model are tagged with a [`RequestTicket`]
//! carrying the view and navigation generation at dispatch time; a result
//! whose ticket no longer matches is stale and its display payload is
//! dropped. Claim records are kept even when stale, since the claim was
//! filed and assessed either way.

use std::collections::HashSet;

use hoken_ai::{Lesson, Proposal, ProposalRequest};
use hoken_domain::{Claim, Policy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Top-level screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    #[default]
    Home,
    Products,
    Learn,
    Simulation,
    MyPage,
    ClaimsCenter,
}

/// Operations that call the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Explain,
    Proposal,
    Adjudicate,
    Lesson,
    Speech,
    Image,
}

/// Tag attached to one dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub operation: Operation,
    pub view: View,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub enum Action {
    Navigate(View),
    ExplanationReady {
        ticket: RequestTicket,
        text: String,
    },
    ProposalReady {
        ticket: RequestTicket,
        request: ProposalRequest,
        proposal: Proposal,
    },
    /// Append a policy issued from the current proposal
    SignContract { policy: Policy },
    ClaimAdjudicated {
        ticket: RequestTicket,
        claim: Claim,
    },
    LessonReady {
        ticket: RequestTicket,
        lesson: Lesson,
    },
    /// A request finished with nothing to show (speech, image)
    RequestCompleted { ticket: RequestTicket },
    RequestFailed {
        ticket: RequestTicket,
        message: String,
    },
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    view: View,
    generation: u64,
    next_ticket: u64,
    in_flight: HashSet<Operation>,
    explanation: Option<String>,
    /// Proposal on screen together with the form that produced it
    proposal: Option<(ProposalRequest, Proposal)>,
    lesson: Option<Lesson>,
    last_error: Option<String>,
    policies: Vec<Policy>,
    claims: Vec<Claim>,
}

impl AppState {
    /// State after startup, with the stored lists loaded once
    pub fn with_records(policies: Vec<Policy>, claims: Vec<Claim>) -> Self {
        Self {
            policies,
            claims,
            ..Self::default()
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn proposal(&self) -> Option<&Proposal> {
        self.proposal.as_ref().map(|(_, p)| p)
    }

    /// Form that produced the proposal on screen
    pub fn proposal_request(&self) -> Option<&ProposalRequest> {
        self.proposal.as_ref().map(|(r, _)| r)
    }

    pub fn lesson(&self) -> Option<&Lesson> {
        self.lesson.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Most recent first
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn active_policies(&self) -> impl Iterator<Item = &Policy> {
        self.policies.iter().filter(|p| p.is_active())
    }

    pub fn is_in_flight(&self, operation: Operation) -> bool {
        self.in_flight.contains(&operation)
    }

    /// Switch view. Every navigation invalidates outstanding tickets.
    pub fn navigate(&mut self, view: View) {
        self.view = view;
        self.generation += 1;
    }

    /// Mark `operation` as in flight, or `None` if it already is
    pub fn begin(&mut self, operation: Operation) -> Option<RequestTicket> {
        if !self.in_flight.insert(operation) {
            debug!(?operation, "request already in flight, not dispatching");
            return None;
        }
        self.next_ticket += 1;
        Some(RequestTicket {
            id: self.next_ticket,
            operation,
            view: self.view,
            generation: self.generation,
        })
    }

    /// Whether a result for `ticket` would still be shown
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.view == self.view && ticket.generation == self.generation
    }

    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::Navigate(view) => self.navigate(view),
            Action::ExplanationReady { ticket, text } => {
                if self.finish(&ticket) {
                    self.explanation = Some(text);
                    self.last_error = None;
                }
            }
            Action::ProposalReady {
                ticket,
                request,
                proposal,
            } => {
                if self.finish(&ticket) {
                    self.proposal = Some((request, proposal));
                    self.last_error = None;
                }
            }
            Action::SignContract { policy } => {
                self.policies.push(policy);
                self.proposal = None;
                self.navigate(View::MyPage);
            }
            Action::ClaimAdjudicated { ticket, claim } => {
                self.finish(&ticket);
                self.claims.insert(0, claim);
            }
            Action::LessonReady { ticket, lesson } => {
                if self.finish(&ticket) {
                    self.lesson = Some(lesson);
                    self.last_error = None;
                }
            }
            Action::RequestCompleted { ticket } => {
                self.finish(&ticket);
            }
            Action::RequestFailed { ticket, message } => {
                if self.finish(&ticket) {
                    self.last_error = Some(message);
                }
            }
            Action::Reset => {
                self.policies.clear();
                self.claims.clear();
                self.explanation = None;
                self.proposal = None;
                self.lesson = None;
                self.last_error = None;
            }
        }
        self
    }

    /// Release the operation and report whether the ticket is still current
    fn finish(&mut self, ticket: &RequestTicket) -> bool {
        self.in_flight.remove(&ticket.operation);
        let current = self.is_current(ticket);
        if !current {
            warn!(
                ticket = ticket.id,
                operation = ?ticket.operation,
                "discarding stale response"
            );
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hoken_domain::{
        Assessment, ClaimStatus, InsuranceCategory, PolicyDraft, PolicyHolder, CUSTOM_PRODUCT_ID,
    };

    fn policy(id: &str) -> Policy {
        Policy::issue(
            id.to_string(),
            format!("POL-20261019-{}", id),
            PolicyDraft {
                product_id: CUSTOM_PRODUCT_ID.to_string(),
                plan_name: "plan".to_string(),
                category: InsuranceCategory::Medical,
                premium: 5000,
                coverage_details: "cover".to_string(),
            },
            PolicyHolder {
                contractor_name: "a".to_string(),
                insured_name: "a".to_string(),
                beneficiary: "b".to_string(),
            },
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        )
    }

    fn claim(id: &str, policy: &Policy) -> Claim {
        Claim::file(
            id.to_string(),
            policy,
            "incident",
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            Assessment {
                status: ClaimStatus::Approved,
                payout_amount: 10_000,
                reasoning: "ok".to_string(),
                next_steps: String::new(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_navigate_bumps_generation() {
        let state = AppState::default();
        assert_eq!(state.view(), View::Home);
        let state = state.apply(Action::Navigate(View::Learn));
        assert_eq!(state.view(), View::Learn);
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn test_same_operation_not_dispatched_twice() {
        let mut state = AppState::default();
        let ticket = state.begin(Operation::Explain).unwrap();
        assert!(state.begin(Operation::Explain).is_none());
        assert!(state.begin(Operation::Proposal).is_some());

        let mut state = state.apply(Action::ExplanationReady {
            ticket,
            text: "done".to_string(),
        });
        assert!(!state.is_in_flight(Operation::Explain));
        assert!(state.begin(Operation::Explain).is_some());
    }

    #[test]
    fn test_stale_explanation_discarded() {
        let mut state = AppState::default().apply(Action::Navigate(View::Learn));
        let ticket = state.begin(Operation::Explain).unwrap();

        let state = state
            .apply(Action::Navigate(View::Products))
            .apply(Action::Navigate(View::Learn))
            .apply(Action::ExplanationReady {
                ticket,
                text: "late".to_string(),
            });
        assert_eq!(state.explanation(), None);
        assert!(!state.is_in_flight(Operation::Explain));
    }

    #[test]
    fn test_current_explanation_shown() {
        let mut state = AppState::default().apply(Action::Navigate(View::Learn));
        let ticket = state.begin(Operation::Explain).unwrap();
        let state = state.apply(Action::ExplanationReady {
            ticket,
            text: "保険(ほけん)".to_string(),
        });
        assert_eq!(state.explanation(), Some("保険(ほけん)"));
    }

    #[test]
    fn test_stale_claim_still_recorded() {
        let p = policy("A");
        let mut state = AppState::with_records(vec![p.clone()], Vec::new())
            .apply(Action::Navigate(View::ClaimsCenter));
        let ticket = state.begin(Operation::Adjudicate).unwrap();
        let state = state
            .apply(Action::Navigate(View::Home))
            .apply(Action::ClaimAdjudicated {
                ticket,
                claim: claim("C1", &p),
            });
        assert_eq!(state.claims().len(), 1);
    }

    #[test]
    fn test_claims_prepended() {
        let p = policy("A");
        let mut state = AppState::with_records(vec![p.clone()], Vec::new());
        for id in ["C1", "C2"] {
            let ticket = state.begin(Operation::Adjudicate).unwrap();
            state = state.apply(Action::ClaimAdjudicated {
                ticket,
                claim: claim(id, &p),
            });
        }
        let ids: Vec<_> = state.claims().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["C2", "C1"]);
    }

    #[test]
    fn test_sign_appends_and_clears_proposal() {
        let mut state = AppState::with_records(vec![policy("A")], Vec::new())
            .apply(Action::Navigate(View::Simulation));
        let ticket = state.begin(Operation::Proposal).unwrap();
        let state = state
            .apply(Action::ProposalReady {
                ticket,
                request: ProposalRequest::default(),
                proposal: Proposal::fallback(),
            })
            .apply(Action::SignContract { policy: policy("B") });

        let ids: Vec<_> = state.policies().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert!(state.proposal().is_none());
        assert_eq!(state.view(), View::MyPage);
    }

    #[test]
    fn test_failure_recorded_only_when_current() {
        let mut state = AppState::default();
        let ticket = state.begin(Operation::Lesson).unwrap();
        let state = state.apply(Action::RequestFailed {
            ticket,
            message: "boom".to_string(),
        });
        assert_eq!(state.last_error(), Some("boom"));

        let mut state = state;
        let ticket = state.begin(Operation::Lesson).unwrap();
        let state = state
            .apply(Action::Reset)
            .apply(Action::Navigate(View::Home))
            .apply(Action::RequestFailed {
                ticket,
                message: "late".to_string(),
            });
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_reset_clears_records() {
        let p = policy("A");
        let state = AppState::with_records(vec![p.clone()], vec![claim("C1", &p)]).apply(Action::Reset);
        assert!(state.policies().is_empty());
        assert!(state.claims().is_empty());
    }
}
