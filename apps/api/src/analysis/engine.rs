//! Analysis orchestration.
//!
//! One request walks `Received -> Extracting -> Analyzing -> Completed`; any
//! failure moves it to `Failed` and is reported with the stage it stopped in.
//! The pipeline runs on the blocking pool under a time budget. The budget
//! is enforced twice: cooperatively between stages, and by `tokio::time::timeout`
//! around the task in case a single stage never returns.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::keywords::{extract_job_keywords, resume_keywords};
use crate::analysis::lexicon::Lexicon;
use crate::analysis::models::{AnalysisMetadata, AnalysisResult, TermSet, TermSource};
use crate::analysis::normalizer::{normalize, NormalizedDocument};
use crate::analysis::recommendations::{generate_recommendations, Gaps};
use crate::analysis::scoring::{score, Coverage};
use crate::analysis::skills::recognize_skills;
use crate::analysis::structure::analyze_structure;
use crate::config::Config;
use crate::errors::{AnalysisError, AnalysisFailure, AnalysisStage};
use crate::extraction::extract_text;

/// Minimum job description length, in characters after trimming.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume_bytes: Bytes,
    pub resume_filename: String,
    pub job_description: String,
}

/// Point in time after which the analysis must give up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Deadline {
            expires_at: Instant::now() + budget,
            budget,
        }
    }

    pub fn check(&self) -> Result<(), AnalysisError> {
        if Instant::now() >= self.expires_at {
            return Err(AnalysisError::Timeout(self.budget.as_secs()));
        }
        Ok(())
    }
}

/// Current stage of one analysis, readable from outside the worker thread.
#[derive(Debug, Clone)]
struct StageTracker {
    analysis_id: Uuid,
    filename: String,
    stage: Arc<Mutex<AnalysisStage>>,
}

impl StageTracker {
    fn new(filename: &str) -> Self {
        let tracker = StageTracker {
            analysis_id: Uuid::new_v4(),
            filename: filename.to_string(),
            stage: Arc::new(Mutex::new(AnalysisStage::Received)),
        };
        info!(
            analysis_id = %tracker.analysis_id,
            filename = %tracker.filename,
            "Analysis received"
        );
        tracker
    }

    fn advance(&self, next: AnalysisStage) {
        *self.stage.lock().unwrap_or_else(|e| e.into_inner()) = next;
        info!(
            analysis_id = %self.analysis_id,
            filename = %self.filename,
            "Analysis stage: {next}"
        );
    }

    /// Wraps `error` with the stage it happened in.
    fn fail(&self, error: AnalysisError) -> AnalysisFailure {
        let stage = {
            let mut current = self.stage.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *current, AnalysisStage::Failed)
        };
        warn!(
            analysis_id = %self.analysis_id,
            filename = %self.filename,
            %stage,
            code = error.code(),
            "Analysis failed: {error}"
        );
        AnalysisFailure {
            filename: self.filename.clone(),
            stage,
            error,
        }
    }
}

/// Runs analyses with a shared lexicon and fixed limits.
#[derive(Clone)]
pub struct Analyzer {
    lexicon: Arc<Lexicon>,
    keyword_limit: usize,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(lexicon: Arc<Lexicon>, keyword_limit: usize, timeout: Duration) -> Self {
        Analyzer {
            lexicon,
            keyword_limit,
            timeout,
        }
    }

    pub fn from_config(config: &Config, lexicon: Arc<Lexicon>) -> Self {
        Analyzer::new(lexicon, config.keyword_limit, config.analysis_timeout)
    }

    /// Analyzes one resume against one job description.
    pub async fn run(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
        let tracker = StageTracker::new(&request.resume_filename);
        let deadline = Deadline::after(self.timeout);

        let lexicon = Arc::clone(&self.lexicon);
        let keyword_limit = self.keyword_limit;
        let worker = tracker.clone();
        run_bounded(&tracker, self.timeout, move || {
            run_pipeline(&request, &lexicon, keyword_limit, deadline, &worker)
        })
        .await
    }
}

/// Runs `work` on the blocking pool and stops waiting for it after `budget`.
async fn run_bounded<F>(
    tracker: &StageTracker,
    budget: Duration,
    work: F,
) -> Result<AnalysisResult, AnalysisFailure>
where
    F: FnOnce() -> Result<AnalysisResult, AnalysisFailure> + Send + 'static,
{
    match tokio::time::timeout(budget, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) => Err(tracker.fail(AnalysisError::Internal(format!(
            "analysis task failed: {join_error}"
        )))),
        Err(_) => Err(tracker.fail(AnalysisError::Timeout(budget.as_secs()))),
    }
}

fn run_pipeline(
    request: &AnalysisRequest,
    lexicon: &Lexicon,
    keyword_limit: usize,
    deadline: Deadline,
    tracker: &StageTracker,
) -> Result<AnalysisResult, AnalysisFailure> {
    let job_description = request.job_description.trim();
    let actual = job_description.chars().count();
    if actual < MIN_JOB_DESCRIPTION_CHARS {
        return Err(tracker.fail(AnalysisError::JobDescriptionTooShort {
            actual,
            minimum: MIN_JOB_DESCRIPTION_CHARS,
        }));
    }

    deadline.check().map_err(|e| tracker.fail(e))?;
    tracker.advance(AnalysisStage::Extracting);
    let resume_text = extract_text(&request.resume_filename, &request.resume_bytes)
        .map_err(|e| tracker.fail(e))?;

    deadline.check().map_err(|e| tracker.fail(e))?;
    tracker.advance(AnalysisStage::Analyzing);
    let result = analyze_text(
        &resume_text,
        job_description,
        &request.resume_filename,
        lexicon,
        keyword_limit,
    );
    deadline.check().map_err(|e| tracker.fail(e))?;

    tracker.advance(AnalysisStage::Completed);
    info!(
        analysis_id = %tracker.analysis_id,
        overall_score = result.overall_score,
        keyword_score = result.keyword_score,
        tech_skill_score = result.tech_skill_score,
        "Analysis complete"
    );
    Ok(result)
}

/// Everything after extraction. Runs on the blocking pool.
/// `resume_text` must already be cleaned.
fn analyze_text(
    resume_text: &str,
    job_description: &str,
    filename: &str,
    lexicon: &Lexicon,
    keyword_limit: usize,
) -> AnalysisResult {
    let (resume, job) = rayon::join(
        || normalize(resume_text, lexicon),
        || normalize(job_description, lexicon),
    );

    let ((job_keywords, resume_keyword_set), ((job_skills, resume_skills), structure)) = rayon::join(
        || {
            rayon::join(
                || extract_job_keywords(&job, lexicon, keyword_limit),
                || resume_keywords(&resume, lexicon),
            )
        },
        || {
            rayon::join(
                || skill_sets(&job, &resume, lexicon),
                || analyze_structure(&resume, lexicon),
            )
        },
    );

    if job_skills.is_empty() {
        debug!("Job description names no known technical skills");
    }

    let keyword_overlap = job_keywords.partition(&resume_keyword_set);
    let skill_overlap = job_skills.partition(&resume_skills);

    let scores = score(
        Coverage {
            matched: keyword_overlap.matched.len(),
            total: job_keywords.len(),
        },
        Coverage {
            matched: skill_overlap.matched.len(),
            total: job_skills.len(),
        },
        &structure,
    );

    let recommendations = generate_recommendations(&Gaps {
        missing_skills: &skill_overlap.missing,
        missing_keywords: &keyword_overlap.missing,
        structure: &structure,
    });

    AnalysisResult {
        overall_score: scores.overall,
        keyword_score: scores.keyword,
        tech_skill_score: scores.tech_skill,
        keyword_matches: keyword_overlap.matched_labels(),
        keyword_misses: keyword_overlap.missing_labels(),
        tech_skill_matches: skill_overlap.matched_labels(),
        tech_skill_misses: skill_overlap.missing_labels(),
        recommendations,
        metadata: AnalysisMetadata {
            filename: filename.to_string(),
            resume_length: resume_text.chars().count(),
            job_description_length: job_description.chars().count(),
            total_job_keywords: job_keywords.len(),
            total_job_tech_skills: job_skills.len(),
        },
        structure,
    }
}

fn skill_sets(
    job: &NormalizedDocument,
    resume: &NormalizedDocument,
    lexicon: &Lexicon,
) -> (TermSet, TermSet) {
    (
        recognize_skills(job, &lexicon.skills, TermSource::JobDescription),
        recognize_skills(resume, &lexicon.skills, TermSource::Resume),
    )
}
