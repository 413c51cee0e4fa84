use crate::application::dto::SyncRequest;
use crate::eol_tracking::domain::{
    Entity, EntityPatch, EolClassification, ServiceOutcome, ServiceResult, SyncReport,
    SyncTarget, TargetReport,
};
use crate::eol_tracking::services::{CountDecision, EolClassifier, EolCounter};
use crate::ports::outbound::{
    CatalogRepository, Credential, CredentialProvider, ProgressReporter,
};
use crate::shared::error::{ErrorKind, SyncError};
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::cell::Cell;
use std::collections::HashSet;

/// What the run will do with one service once its count is known
#[derive(Debug, Clone, PartialEq, Eq)]
enum UpdatePlan {
    Write(usize),
    Unchanged(usize),
    Planned(usize),
    Skip(String),
}

/// SyncEolCountsUseCase - Core use case for EOL count synchronization
///
/// Authenticates once, then for each target fetches frameworks, classifies
/// them, fetches services and writes back each service's EOL count.
/// A failing target never stops the others; a failing update never stops
/// the rest of its target.
///
/// # Type Parameters
/// * `CP` - CredentialProvider implementation
/// * `CR` - CatalogRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct SyncEolCountsUseCase<CP, CR, PR> {
    credential_provider: CP,
    catalog: CR,
    progress_reporter: PR,
}

impl<CP, CR, PR> SyncEolCountsUseCase<CP, CR, PR>
where
    CP: CredentialProvider,
    CR: CatalogRepository,
    PR: ProgressReporter,
{
    /// Creates a new SyncEolCountsUseCase with injected dependencies
    pub fn new(credential_provider: CP, catalog: CR, progress_reporter: PR) -> Self {
        Self {
            credential_provider,
            catalog,
            progress_reporter,
        }
    }

    /// Executes the sync run
    ///
    /// # Returns
    /// A finished `SyncReport` with one entry per target, in request order
    ///
    /// # Errors
    /// Only run-level failures are returned as errors: an invalid request,
    /// or a credential that cannot be obtained or is rejected while fetching.
    /// Everything else is recorded in the report.
    pub async fn execute(&self, request: SyncRequest) -> Result<SyncReport> {
        Self::validate_request(&request)?;

        // Step 1: Authenticate once for the whole run
        let credential = self.authenticate().await?;

        // Step 2: Blueprint preflight
        let known_blueprints = self.load_known_blueprints(&credential).await?;

        // Step 3: Process each target independently
        let mut report = SyncReport::start(request.dry_run);
        for target in &request.targets {
            let target_report = self
                .sync_target(&credential, target, known_blueprints.as_ref(), &request)
                .await?;
            report.targets.push(target_report);
        }

        let report = report.finish();
        self.report_summary(&report);
        Ok(report)
    }

    fn validate_request(request: &SyncRequest) -> Result<()> {
        if request.targets.is_empty() {
            return Err(SyncError::config(
                "no sync targets configured",
                "Add at least one entry under 'targets' or remove the empty list",
            )
            .into());
        }

        if request.concurrency == 0 || request.concurrency > SyncRequest::MAX_CONCURRENCY {
            return Err(SyncError::config(
                format!("concurrency must be between 1 and {}", SyncRequest::MAX_CONCURRENCY),
                format!("Got {}", request.concurrency),
            )
            .into());
        }

        Ok(())
    }

    async fn authenticate(&self) -> Result<Credential> {
        self.progress_reporter
            .report("🔐 Authenticating with the catalog...");
        let credential = self.credential_provider.credential().await?;
        self.progress_reporter.report("✅ Credential obtained");
        Ok(credential)
    }

    /// Lists blueprint identifiers; `None` disables the preflight check
    async fn load_known_blueprints(
        &self,
        credential: &Credential,
    ) -> Result<Option<HashSet<String>>> {
        match self.catalog.list_blueprints(credential).await {
            Ok(identifiers) => Ok(Some(identifiers.into_iter().collect())),
            Err(e) if SyncError::kind_of(&e) == ErrorKind::Authentication => Err(e),
            Err(e) => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: Could not list blueprints, continuing without preflight check: {}",
                    first_line(&e.to_string())
                ));
                Ok(None)
            }
        }
    }

    async fn sync_target(
        &self,
        credential: &Credential,
        target: &SyncTarget,
        known_blueprints: Option<&HashSet<String>>,
        request: &SyncRequest,
    ) -> Result<TargetReport> {
        let mut target_report = TargetReport::new(target);
        self.progress_reporter.report(&format!(
            "🎯 Target '{}': {} -> {}",
            target.name(),
            target.framework_blueprint(),
            target.service_blueprint()
        ));

        if let Some(known) = known_blueprints {
            if let Err(e) = Self::check_blueprints_exist(target, known) {
                return self.fail_target(target_report, e);
            }
        }

        // Frameworks: fetch and classify
        let fetched = self
            .fetch_blueprint(credential, target.framework_blueprint(), &mut target_report)
            .await;
        let frameworks = match fetched {
            Ok(entities) => entities,
            Err(e) => return self.fail_target(target_report, e),
        };
        let classification = self.classify(&frameworks, &mut target_report);

        // Services: fetch, count and update
        let fetched = self
            .fetch_blueprint(credential, target.service_blueprint(), &mut target_report)
            .await;
        let services = match fetched {
            Ok(entities) => entities,
            Err(e) => return self.fail_target(target_report, e),
        };

        let plans = self.plan_updates(&services, target, &classification, request);
        target_report.services = self
            .apply_updates(credential, target, plans, request.concurrency)
            .await;

        Ok(target_report)
    }

    fn check_blueprints_exist(target: &SyncTarget, known: &HashSet<String>) -> Result<()> {
        for blueprint in [target.framework_blueprint(), target.service_blueprint()] {
            if !known.contains(blueprint) {
                return Err(SyncError::NotFound {
                    resource: format!("blueprint '{}'", blueprint),
                    body: "not listed by GET /v1/blueprints".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Records a target failure, or aborts the run if the credential was rejected
    fn fail_target(
        &self,
        target_report: TargetReport,
        err: anyhow::Error,
    ) -> Result<TargetReport> {
        let kind = SyncError::kind_of(&err);
        if kind == ErrorKind::Authentication {
            return Err(err);
        }

        self.progress_reporter.report_error(&format!(
            "❌ Target '{}' failed: {}",
            target_report.name, err
        ));
        Ok(target_report.fail(kind, err.to_string()))
    }

    /// Fetches all entities of a blueprint and checks them against the catalog's count
    ///
    /// Malformed records are dropped with a warning; the rest are kept.
    async fn fetch_blueprint(
        &self,
        credential: &Credential,
        blueprint: &str,
        target_report: &mut TargetReport,
    ) -> Result<Vec<Entity>> {
        self.progress_reporter.report(&format!(
            "📥 Fetching entities of blueprint '{}'...",
            blueprint
        ));
        let records = self.catalog.fetch_entities(credential, blueprint).await?;
        let received = records.len();

        let mut entities = Vec::with_capacity(received);
        for (index, record) in records.iter().enumerate() {
            match Entity::from_value(record) {
                Ok(entity) => entities.push(entity),
                Err(e) => self.warn(
                    target_report,
                    format!(
                        "skipped record {} of blueprint '{}': {}",
                        index + 1,
                        blueprint,
                        e
                    ),
                ),
            }
        }
        self.progress_reporter
            .report(&format!("✅ Fetched {} entit(y/ies)", entities.len()));

        match self.catalog.count_entities(credential, blueprint).await {
            Ok(expected) if expected > received => {
                self.warn(
                    target_report,
                    format!(
                        "blueprint '{}' reports {} entities but {} were returned; results may be truncated",
                        blueprint, expected, received
                    ),
                );
            }
            Ok(_) => {}
            Err(e) => {
                self.warn(
                    target_report,
                    format!(
                        "could not verify entity count of blueprint '{}': {}",
                        blueprint,
                        first_line(&e.to_string())
                    ),
                );
            }
        }

        Ok(entities)
    }

    fn classify(
        &self,
        frameworks: &[Entity],
        target_report: &mut TargetReport,
    ) -> EolClassification {
        let classification = EolClassifier::classify(frameworks);

        let warnings: Vec<String> = classification
            .unrecognized()
            .map(|(identifier, state)| match state {
                Some(state) => format!(
                    "framework '{}' has unrecognized state '{}'; treated as not EOL",
                    identifier, state
                ),
                None => format!("framework '{}' has no state; treated as not EOL", identifier),
            })
            .collect();
        for warning in warnings {
            self.warn(target_report, warning);
        }

        target_report.frameworks = classification.tally();
        target_report.eol_frameworks = classification
            .eol_identifiers()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.progress_reporter.report(&format!(
            "🧮 Classified {} framework(s): {} EOL, {} active, {} unrecognized",
            classification.len(),
            target_report.frameworks.eol,
            target_report.frameworks.active,
            target_report.frameworks.unrecognized
        ));

        classification
    }

    fn plan_updates(
        &self,
        services: &[Entity],
        target: &SyncTarget,
        classification: &EolClassification,
        request: &SyncRequest,
    ) -> Vec<(String, UpdatePlan)> {
        services
            .iter()
            .map(|service| {
                let decision = EolCounter::decide(
                    service,
                    target.relation(),
                    classification,
                    request.missing_relation_policy,
                );
                let plan = match decision {
                    CountDecision::Skip(reason) => UpdatePlan::Skip(reason),
                    CountDecision::Count(count)
                        if request.skip_unchanged
                            && service.count_property(target.property()) == Some(count as u64) =>
                    {
                        UpdatePlan::Unchanged(count)
                    }
                    CountDecision::Count(count) if request.dry_run => UpdatePlan::Planned(count),
                    CountDecision::Count(count) => UpdatePlan::Write(count),
                };
                (service.identifier().to_string(), plan)
            })
            .collect()
    }

    /// Resolves every plan, sending writes with bounded concurrency
    ///
    /// Outcomes keep the order of `plans`.
    async fn apply_updates(
        &self,
        credential: &Credential,
        target: &SyncTarget,
        plans: Vec<(String, UpdatePlan)>,
        concurrency: usize,
    ) -> Vec<ServiceOutcome> {
        let total = plans
            .iter()
            .filter(|(_, plan)| matches!(plan, UpdatePlan::Write(_)))
            .count();
        if total > 0 {
            self.progress_reporter.report(&format!(
                "📝 Updating '{}' on {} service(s)...",
                target.property(),
                total
            ));
        }

        let completed = Cell::new(0usize);
        stream::iter(plans)
            .map(|(service_id, plan)| {
                self.resolve_plan(credential, target, service_id, plan, &completed, total)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn resolve_plan(
        &self,
        credential: &Credential,
        target: &SyncTarget,
        service_id: String,
        plan: UpdatePlan,
        completed: &Cell<usize>,
        total: usize,
    ) -> ServiceOutcome {
        let result = match plan {
            UpdatePlan::Unchanged(count) => ServiceResult::Unchanged { count },
            UpdatePlan::Planned(count) => ServiceResult::Planned { count },
            UpdatePlan::Skip(reason) => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Skipping service '{}': {}",
                    service_id, reason
                ));
                ServiceResult::Skipped { reason }
            }
            UpdatePlan::Write(count) => {
                let result = self
                    .write_count(credential, target, &service_id, count)
                    .await;
                completed.set(completed.get() + 1);
                self.progress_reporter
                    .report_progress(completed.get(), total, Some(&service_id));
                result
            }
        };
        ServiceOutcome::new(service_id, result)
    }

    async fn write_count(
        &self,
        credential: &Credential,
        target: &SyncTarget,
        service_id: &str,
        count: usize,
    ) -> ServiceResult {
        let patch = EntityPatch::set_count(target.property(), count);
        match self
            .catalog
            .patch_entity(credential, target.service_blueprint(), service_id, &patch)
            .await
        {
            Ok(()) => ServiceResult::Updated { count },
            Err(e) => {
                let kind = SyncError::kind_of(&e);
                self.progress_reporter.report_error(&format!(
                    "❌ Failed to update service '{}': {}",
                    service_id,
                    first_line(&e.to_string())
                ));
                ServiceResult::Failed {
                    kind,
                    message: e.to_string(),
                }
            }
        }
    }

    fn warn(&self, target_report: &mut TargetReport, warning: String) {
        self.progress_reporter
            .report_error(&format!("⚠️  Warning: {}", warning));
        target_report.warnings.push(warning);
    }

    fn report_summary(&self, report: &SyncReport) {
        let summary = report.summary();
        let headline = if report.has_failures() {
            "⚠️  Sync finished with failures"
        } else if report.dry_run {
            "✨ Dry run finished, no updates were sent"
        } else {
            "✨ Sync finished"
        };
        self.progress_reporter.report_completion(&format!(
            "{}: {} target(s), {} failed | updated {}, unchanged {}, planned {}, skipped {}, failed {}",
            headline,
            summary.targets,
            summary.failed_targets,
            summary.updated,
            summary.unchanged,
            summary.planned,
            summary.skipped,
            summary.failed
        ));
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}
