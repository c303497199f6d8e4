use super::generator::MinutesGenerator;
use super::progress::{GenerationState, ProgressLog};
use super::request::{MeetingRequest, ValidatedRequest, ValidationError};
use super::resources::RemoteResources;
use crate::output::OutputWriter;
use crate::uploads;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// A finished generation
#[derive(Debug)]
pub struct CompletedMinutes {
    pub meeting_name: String,
    pub meeting_topic: String,
    /// Generated Markdown, identical to what was written to `output_path`
    pub minutes: String,
    pub output_path: PathBuf,
    /// Name offered for download
    pub file_name: String,
    /// Remote deletions that failed; the local output stays valid
    pub cleanup_errors: Vec<String>,
    pub log: ProgressLog,
}

#[derive(Debug)]
pub enum MinutesOutcome {
    /// Validation stopped the run before anything remote was created
    Warning {
        warning: ValidationError,
        log: ProgressLog,
    },
    Completed(CompletedMinutes),
}

/// A generation that failed after validation
#[derive(Debug)]
pub struct GenerationFailure {
    pub error: anyhow::Error,
    pub cleanup_errors: Vec<String>,
    pub log: ProgressLog,
}

/// Runs the whole minutes workflow for one request
pub struct MinutesService {
    generator: MinutesGenerator,
    writer: OutputWriter,
}

impl MinutesService {
    pub fn new(generator: MinutesGenerator, writer: OutputWriter) -> Self {
        Self { generator, writer }
    }

    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }

    /// Validate, generate from every file in `upload_dir`, persist, clean up.
    pub async fn run(
        &self,
        request: &MeetingRequest,
        upload_dir: &Path,
    ) -> Result<MinutesOutcome, GenerationFailure> {
        let mut log = ProgressLog::new();

        log.transition(GenerationState::ValidatingInputs);
        let validated = match request.validate() {
            Ok(v) => v,
            Err(warning) => return Ok(Self::warn(log, warning)),
        };

        log.push(format!(
            "🔹 '{}' 주제에 대한 회의록 작성을 시작합니다...",
            validated.meeting_topic
        ));

        log.transition(GenerationState::ValidatingFiles);
        let files = match uploads::list(upload_dir) {
            Ok(names) => names
                .into_iter()
                .map(|name| upload_dir.join(name))
                .collect::<Vec<_>>(),
            Err(error) => {
                log.transition(GenerationState::Idle);
                return Err(GenerationFailure {
                    error,
                    cleanup_errors: Vec::new(),
                    log,
                });
            }
        };
        if files.is_empty() {
            return Ok(Self::warn(log, ValidationError::NoUploadedFiles));
        }

        let mut resources = RemoteResources::new();
        let result = self
            .generate_and_persist(&validated, &files, &mut resources, &mut log)
            .await;

        // Release runs on every path past validation
        log.transition(GenerationState::CleaningUp);
        let cleanup_errors = resources.release(self.generator.api()).await;

        match result {
            Ok((minutes, output_path)) => {
                log.transition(GenerationState::Done);
                let file_name = output_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| OutputWriter::file_name(&validated.meeting_name));

                info!(
                    "Minutes for '{}' written to {}",
                    validated.meeting_name,
                    output_path.display()
                );

                Ok(MinutesOutcome::Completed(CompletedMinutes {
                    meeting_name: validated.meeting_name,
                    meeting_topic: validated.meeting_topic,
                    minutes,
                    output_path,
                    file_name,
                    cleanup_errors,
                    log,
                }))
            }
            Err(error) => {
                error!("Minutes generation failed: {:#}", error);
                log.transition(GenerationState::Idle);
                Err(GenerationFailure {
                    error,
                    cleanup_errors,
                    log,
                })
            }
        }
    }

    async fn generate_and_persist(
        &self,
        request: &ValidatedRequest,
        files: &[PathBuf],
        resources: &mut RemoteResources,
        log: &mut ProgressLog,
    ) -> Result<(String, PathBuf)> {
        let minutes = self
            .generator
            .generate(request, files, resources, log)
            .await?;

        log.push(format!(
            "🔹 OpenAI {} 결과:\n{}",
            self.generator.model(),
            minutes
        ));

        log.transition(GenerationState::Persisting);
        let output_path = self.writer.write(&request.meeting_name, &minutes)?;

        log.push(format!(
            "✅ '{}' 주제에 대한 회의록 작성을 완료하였습니다!",
            request.meeting_topic
        ));

        Ok((minutes, output_path))
    }

    fn warn(mut log: ProgressLog, warning: ValidationError) -> MinutesOutcome {
        warn!("Minutes generation aborted: {}", warning);
        log.push(warning.to_string());
        log.transition(GenerationState::Idle);
        MinutesOutcome::Warning { warning, log }
    }
}
