//! Session controller
//!
//! Owns the application state, the model handle and the record stores.
//! User actions go through here: required inputs are checked, one request
//! is dispatched, the result is folded into the state, and the affected
//! list is written back whole.
//!
//! Each model operation comes in two halves. `begin_*` checks inputs and
//! returns a [`Pending`] request; once resolved, `finish_*` (or
//! [`Session::complete`] for media) folds it back in. The async wrappers
//! (`explain`, `simulate`, ...) run both halves back to back.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::NaiveDate;
use hoken_ai::{
    adjudicate_claim, explain_term, generate_lesson, generate_proposal, synthesize_image,
    synthesize_speech, GeminiClient, GeneratedImage, GenerativeModel, Lesson, Proposal,
    ProposalRequest, SpeechAudio,
};
use hoken_domain::{
    new_claim_id, new_policy_id, new_policy_number, Claim, ClaimRepository, InsuranceProduct,
    Policy, PolicyDraft, PolicyRepository, CUSTOM_PRODUCT_ID,
};
use hoken_types::{Error, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::repository::open_file_stores;
use crate::state::{Action, AppState, Operation, RequestTicket, View};

pub struct Session {
    config: Config,
    state: AppState,
    model: Arc<dyn GenerativeModel>,
    policies: Box<dyn PolicyRepository>,
    claims: Box<dyn ClaimRepository>,
}

impl Session {
    /// Load stored records once and start at the home view
    pub fn open(
        config: Config,
        model: Arc<dyn GenerativeModel>,
        policies: Box<dyn PolicyRepository>,
        claims: Box<dyn ClaimRepository>,
    ) -> Result<Self> {
        let state = AppState::with_records(policies.load_all()?, claims.load_all()?);
        debug!(
            policies = state.policies().len(),
            claims = state.claims().len(),
            "session opened"
        );
        Ok(Self {
            config,
            state,
            model,
            policies,
            claims,
        })
    }

    /// File-backed stores and the Gemini client, both from `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(config.gemini_config()?)?);
        let (policies, claims) = open_file_stores(&config)?;
        Self::open(config, model, Box::new(policies), Box::new(claims))
    }

    /// Records only; no model is configured
    pub fn offline(config: Config) -> Result<Self> {
        let (policies, claims) = open_file_stores(&config)?;
        Self::open(config, Arc::new(Unconfigured), Box::new(policies), Box::new(claims))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn navigate(&mut self, view: View) {
        self.dispatch(Action::Navigate(view));
    }

    /// Explain a term. `None` when the topic is blank, a request is
    /// already running, or the view changed before the answer came back.
    pub async fn explain(&mut self, topic: &str) -> Result<Option<String>> {
        let Some(pending) = self.begin_explain(topic) else {
            return Ok(None);
        };
        Ok(self.finish_explain(pending.resolve().await))
    }

    pub fn begin_explain(&mut self, topic: &str) -> Option<Pending<String>> {
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            return None;
        }
        let ticket = self.state.begin(Operation::Explain)?;
        let model = Arc::clone(&self.model);
        Some(Pending::new(ticket, async move {
            explain_term(&*model, &topic).await
        }))
    }

    pub fn finish_explain(&mut self, resolved: Resolved<String>) -> Option<String> {
        let Resolved { ticket, value: text } = resolved;
        let shown = self.state.is_current(&ticket).then(|| text.clone());
        self.dispatch(Action::ExplanationReady { ticket, text });
        shown
    }

    pub async fn simulate(&mut self, request: ProposalRequest) -> Result<Option<Proposal>> {
        let Some(pending) = self.begin_simulate(request) else {
            return Ok(None);
        };
        Ok(self.finish_simulate(pending.resolve().await))
    }

    pub fn begin_simulate(
        &mut self,
        request: ProposalRequest,
    ) -> Option<Pending<(ProposalRequest, Proposal)>> {
        if !request.is_ready() {
            return None;
        }
        let ticket = self.state.begin(Operation::Proposal)?;
        let model = Arc::clone(&self.model);
        Some(Pending::new(ticket, async move {
            let proposal = generate_proposal(&*model, &request).await;
            (request, proposal)
        }))
    }

    pub fn finish_simulate(
        &mut self,
        resolved: Resolved<(ProposalRequest, Proposal)>,
    ) -> Option<Proposal> {
        let Resolved {
            ticket,
            value: (request, proposal),
        } = resolved;
        let shown = self.state.is_current(&ticket).then(|| proposal.clone());
        self.dispatch(Action::ProposalReady {
            ticket,
            request,
            proposal,
        });
        shown
    }

    /// Issue a policy from the proposal on screen and persist the list
    pub fn sign_contract(&mut self, today: NaiveDate) -> Result<Policy> {
        let (Some(request), Some(proposal)) =
            (self.state.proposal_request(), self.state.proposal())
        else {
            return Err(Error::ProposalMissing);
        };

        let draft = PolicyDraft {
            product_id: CUSTOM_PRODUCT_ID.to_string(),
            plan_name: proposal.plan_name.clone(),
            category: request.category,
            premium: proposal.premium,
            coverage_details: proposal.coverage_details.clone(),
        };
        let policy = Policy::issue(
            new_policy_id(),
            new_policy_number(today),
            draft,
            self.config.holder(),
            today,
        );

        self.dispatch(Action::SignContract {
            policy: policy.clone(),
        });
        self.policies.save_all(self.state.policies())?;
        info!(policy = %policy.policy_number, premium = policy.premium, "contract signed");
        Ok(policy)
    }

    /// File a claim against an active policy, matched by id or number.
    ///
    /// The claim is recorded and persisted whatever the verdict, including
    /// the fallback denial when the model is unreachable.
    pub async fn submit_claim(
        &mut self,
        policy_ref: &str,
        incident: &str,
        today: NaiveDate,
    ) -> Result<Option<Claim>> {
        let Some(pending) = self.begin_claim(policy_ref, incident, today)? else {
            return Ok(None);
        };
        self.finish_claim(pending.resolve().await).map(Some)
    }

    /// Errors before any request when the policy is unknown or not active
    pub fn begin_claim(
        &mut self,
        policy_ref: &str,
        incident: &str,
        today: NaiveDate,
    ) -> Result<Option<Pending<Result<Claim>>>> {
        let incident = incident.trim().to_string();
        if policy_ref.trim().is_empty() || incident.is_empty() {
            return Ok(None);
        }
        let policy = self
            .state
            .policies()
            .iter()
            .find(|p| p.matches(policy_ref))
            .cloned()
            .ok_or_else(|| Error::PolicyNotFound(policy_ref.trim().to_string()))?;
        if !policy.is_active() {
            return Err(Error::PolicyNotActive {
                policy_number: policy.policy_number,
                status: policy.status.to_string(),
            });
        }
        let Some(ticket) = self.state.begin(Operation::Adjudicate) else {
            return Ok(None);
        };

        let model = Arc::clone(&self.model);
        Ok(Some(Pending::new(ticket, async move {
            let verdict = adjudicate_claim(&*model, &policy, &incident).await;
            Claim::file(
                new_claim_id(today),
                &policy,
                &incident,
                today,
                verdict.into_assessment(),
            )
        })))
    }

    /// Record the claim even when the view has changed since filing
    pub fn finish_claim(&mut self, resolved: Resolved<Result<Claim>>) -> Result<Claim> {
        let Resolved { ticket, value } = resolved;
        let claim = match value {
            Ok(claim) => claim,
            Err(e) => {
                self.fail(ticket, &e);
                return Err(e);
            }
        };

        self.dispatch(Action::ClaimAdjudicated {
            ticket,
            claim: claim.clone(),
        });
        self.claims.save_all(self.state.claims())?;
        Ok(claim)
    }

    pub async fn lesson(
        &mut self,
        topic: &str,
        product: Option<&InsuranceProduct>,
    ) -> Result<Option<Lesson>> {
        let Some(pending) = self.begin_lesson(topic, product) else {
            return Ok(None);
        };
        self.finish_lesson(pending.resolve().await)
    }

    pub fn begin_lesson(
        &mut self,
        topic: &str,
        product: Option<&InsuranceProduct>,
    ) -> Option<Pending<Result<Lesson>>> {
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            return None;
        }
        let ticket = self.state.begin(Operation::Lesson)?;
        let model = Arc::clone(&self.model);
        let product = product.cloned();
        Some(Pending::new(ticket, async move {
            generate_lesson(&*model, &topic, product.as_ref()).await
        }))
    }

    /// `Ok(None)` when the lesson arrived after the view changed
    pub fn finish_lesson(
        &mut self,
        resolved: Resolved<Result<Lesson>>,
    ) -> Result<Option<Lesson>> {
        let Resolved { ticket, value } = resolved;
        match value {
            Ok(lesson) => {
                let shown = self.state.is_current(&ticket).then(|| lesson.clone());
                self.dispatch(Action::LessonReady { ticket, lesson });
                Ok(shown)
            }
            Err(e) => {
                self.fail(ticket, &e);
                Err(e)
            }
        }
    }

    pub async fn speak(&mut self, text: &str) -> Result<Option<SpeechAudio>> {
        let Some(pending) = self.begin_speech(text) else {
            return Ok(None);
        };
        self.complete(pending.resolve().await).map(Some)
    }

    pub fn begin_speech(&mut self, text: &str) -> Option<Pending<Result<SpeechAudio>>> {
        if text.trim().is_empty() {
            return None;
        }
        let ticket = self.state.begin(Operation::Speech)?;
        let model = Arc::clone(&self.model);
        let text = text.to_string();
        Some(Pending::new(ticket, async move {
            synthesize_speech(&*model, &text).await
        }))
    }

    pub async fn illustrate(&mut self, prompt: &str) -> Result<Option<GeneratedImage>> {
        let Some(pending) = self.begin_image(prompt) else {
            return Ok(None);
        };
        self.complete(pending.resolve().await).map(Some)
    }

    pub fn begin_image(&mut self, prompt: &str) -> Option<Pending<Result<GeneratedImage>>> {
        if prompt.trim().is_empty() {
            return None;
        }
        let ticket = self.state.begin(Operation::Image)?;
        let model = Arc::clone(&self.model);
        let prompt = prompt.to_string();
        Some(Pending::new(ticket, async move {
            synthesize_image(&*model, &prompt).await
        }))
    }

    /// Fold in a speech or image result. Media is returned even when stale;
    /// it carries no display state.
    pub fn complete<T>(&mut self, resolved: Resolved<Result<T>>) -> Result<T> {
        let Resolved { ticket, value } = resolved;
        match value {
            Ok(value) => {
                self.dispatch(Action::RequestCompleted { ticket });
                Ok(value)
            }
            Err(e) => {
                self.fail(ticket, &e);
                Err(e)
            }
        }
    }

    pub fn policies(&self) -> &[Policy] {
        self.state.policies()
    }

    pub fn active_policies(&self) -> Vec<&Policy> {
        self.state.active_policies().collect()
    }

    /// Most recent first
    pub fn claims(&self) -> &[Claim] {
        self.state.claims()
    }

    /// Drop every stored policy and claim
    pub fn reset(&mut self) -> Result<()> {
        self.policies.clear()?;
        self.claims.clear()?;
        self.dispatch(Action::Reset);
        info!("local records cleared");
        Ok(())
    }

    fn dispatch(&mut self, action: Action) {
        self.state = std::mem::take(&mut self.state).apply(action);
    }

    fn fail(&mut self, ticket: RequestTicket, error: &Error) {
        self.dispatch(Action::RequestFailed {
            ticket,
            message: error.to_string(),
        });
    }
}

/// A dispatched request. Resolving it does not borrow the session, so the
/// view can change or unrelated operations can start in the meantime.
pub struct Pending<T> {
    ticket: RequestTicket,
    future: Pin<Box<dyn Future<Output = T>>>,
}

impl<T> Pending<T> {
    fn new(ticket: RequestTicket, future: impl Future<Output = T> + 'static) -> Self {
        Self {
            ticket,
            future: Box::pin(future),
        }
    }

    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }

    /// Wait for the model
    pub async fn resolve(self) -> Resolved<T> {
        Resolved {
            ticket: self.ticket,
            value: self.future.await,
        }
    }
}

/// Outcome of a [`Pending`] request, to be handed back to the session
pub struct Resolved<T> {
    ticket: RequestTicket,
    value: T,
}

impl<T> Resolved<T> {
    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }
}

/// Stand-in model for sessions that only read or reset records
struct Unconfigured;

#[async_trait::async_trait]
impl GenerativeModel for Unconfigured {
    async fn generate(
        &self,
        _request: hoken_ai::GenerateRequest,
    ) -> std::result::Result<hoken_ai::GenerateResponse, hoken_types::AiError> {
        Err(hoken_types::AiError::Transport(
            "no API key configured".to_string(),
        ))
    }
}
