// Integration tests for the minutes workflow
//
// These drive `MinutesService` against the in-memory provider and check the
// state machine, the persisted output and that remote resources never leak.

mod common;

use anyhow::Result;
use common::{fast_poll, FakeAssistantApi, SAMPLE_MINUTES};
use meeting_minutes::minutes::{GenerationState, MinutesOutcome, PollPolicy, ValidationError};
use meeting_minutes::openai::ExpiresAfter;
use meeting_minutes::uploads::{self, CollisionPolicy, UploadedFile};
use meeting_minutes::{MeetingRequest, MinutesGenerator, MinutesService, OutputWriter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn service(api: Arc<FakeAssistantApi>, output_dir: &Path) -> MinutesService {
    service_with_poll(api, output_dir, fast_poll())
}

fn service_with_poll(
    api: Arc<FakeAssistantApi>,
    output_dir: &Path,
    poll: PollPolicy,
) -> MinutesService {
    let generator = MinutesGenerator::new(api, "gpt-4o-mini", poll);
    MinutesService::new(
        generator,
        OutputWriter::new(output_dir, CollisionPolicy::Overwrite),
    )
}

fn upload_samples(dir: &Path) -> Result<()> {
    uploads::save(
        dir,
        &UploadedFile::new("transcript.txt", "팀장: 로드맵을 정리합시다.".as_bytes().to_vec()),
        CollisionPolicy::Overwrite,
    )?;
    uploads::save(
        dir,
        &UploadedFile::new("agenda.pdf", b"%PDF-1.4 agenda".to_vec()),
        CollisionPolicy::Overwrite,
    )?;
    Ok(())
}

#[tokio::test]
async fn test_empty_uploads_create_no_remote_resources() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let api = Arc::new(FakeAssistantApi::new());

    let outcome = service(Arc::clone(&api), output_dir.path())
        .run(&MeetingRequest::new("Q1 Planning", "Roadmap"), uploads_dir.path())
        .await
        .map_err(|f| f.error)?;

    match outcome {
        MinutesOutcome::Warning { warning, log } => {
            assert_eq!(warning, ValidationError::NoUploadedFiles);
            assert_eq!(log.state(), GenerationState::Idle);
            assert_eq!(
                log.lines(),
                [
                    "🔹 'Roadmap' 주제에 대한 회의록 작성을 시작합니다...".to_string(),
                    "⚠️ 업로드된 파일이 없습니다. 먼저 파일을 업로드하세요.".to_string(),
                ]
            );
        }
        other => panic!("expected warning, got {:?}", other),
    }

    assert!(api.calls().is_empty(), "no remote call may happen");
    Ok(())
}

#[tokio::test]
async fn test_missing_inputs_warn_before_anything_else() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    upload_samples(uploads_dir.path())?;
    let api = Arc::new(FakeAssistantApi::new());
    let service = service(Arc::clone(&api), output_dir.path());

    for (request, expected) in [
        (MeetingRequest::new("  ", "Roadmap"), ValidationError::EmptyMeetingName),
        (MeetingRequest::new("Q1 Planning", ""), ValidationError::EmptyMeetingTopic),
    ] {
        let outcome = service
            .run(&request, uploads_dir.path())
            .await
            .map_err(|f| f.error)?;

        match outcome {
            MinutesOutcome::Warning { warning, log } => {
                assert_eq!(warning, expected);
                assert_eq!(
                    log.history(),
                    [
                        GenerationState::Idle,
                        GenerationState::ValidatingInputs,
                        GenerationState::Idle
                    ]
                );
                assert_eq!(log.lines(), [expected.to_string()]);
            }
            other => panic!("expected warning, got {:?}", other),
        }
    }

    assert!(api.calls().is_empty());
    assert_eq!(std::fs::read_dir(output_dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_successful_generation_persists_and_cleans_up() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    upload_samples(uploads_dir.path())?;
    let api = Arc::new(FakeAssistantApi::new());

    let outcome = service(Arc::clone(&api), output_dir.path())
        .run(
            &MeetingRequest::new(" Q1 Planning ", " Roadmap "),
            uploads_dir.path(),
        )
        .await
        .map_err(|f| f.error)?;

    let done = match outcome {
        MinutesOutcome::Completed(done) => done,
        other => panic!("expected completion, got {:?}", other),
    };

    // Output file named from the meeting, same text as displayed
    assert_eq!(done.file_name, "회의록_Q1 Planning.txt");
    assert_eq!(done.output_path, output_dir.path().join("회의록_Q1 Planning.txt"));
    assert_eq!(std::fs::read_to_string(&done.output_path)?, done.minutes);
    assert_eq!(done.minutes, SAMPLE_MINUTES);
    assert!(done.log.text().contains(&done.minutes));
    assert!(done.cleanup_errors.is_empty());

    // Document shape
    let first_line = done.minutes.lines().next().unwrap_or_default();
    assert!(first_line.starts_with("# "));
    for field in meeting_minutes::minutes::METADATA_FIELDS {
        assert!(done.minutes.contains(&format!("<strong>{}</strong></th><td></td>", field)));
    }
    assert!(done.minutes.contains("## **아젠다**"));
    assert!(done.minutes.contains("### 1."));
    assert!(done.minutes.contains("**Action Items**"));
    assert!(done.minutes.contains("**결정 사항**"));

    // Progress text in order
    let lines = done.log.lines();
    assert_eq!(lines[0], "🔹 'Roadmap' 주제에 대한 회의록 작성을 시작합니다...");
    assert_eq!(lines[1], "📄 총 2개의 파일을 분석 중...");
    assert!(lines[2].starts_with("🔹 OpenAI gpt-4o-mini 결과:\n# Q1 Planning"));
    assert_eq!(lines[3], "✅ 'Roadmap' 주제에 대한 회의록 작성을 완료하였습니다!");

    assert_eq!(
        done.log.history(),
        [
            GenerationState::Idle,
            GenerationState::ValidatingInputs,
            GenerationState::ValidatingFiles,
            GenerationState::Indexing,
            GenerationState::Prompting,
            GenerationState::ExtractingResult,
            GenerationState::Persisting,
            GenerationState::CleaningUp,
            GenerationState::Done,
        ]
    );

    // Remote side: every upload indexed, then everything deleted
    assert_eq!(
        api.uploaded_names(),
        ["agenda.pdf (15 bytes)", "transcript.txt (37 bytes)"]
    );
    assert_eq!(api.expiry_policies(), [ExpiresAfter::last_active(1)]);
    assert_eq!(api.live_resources(), 0);

    let instructions = api.run_instructions();
    assert_eq!(instructions.len(), 1);
    assert!(instructions[0].contains("Roadmap이 주제이고 제목이 Q1 Planning인 회의록"));

    // Files go before their vector store
    let calls = api.calls();
    let last_file_delete = calls.iter().rposition(|c| c == "delete_file").unwrap();
    let store_delete = calls.iter().position(|c| c == "delete_vector_store").unwrap();
    assert!(last_file_delete < store_delete);
    Ok(())
}

#[tokio::test]
async fn test_repeated_meeting_name_overwrites_output() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    upload_samples(uploads_dir.path())?;

    let first = Arc::new(FakeAssistantApi {
        reply: "# first".to_string(),
        ..FakeAssistantApi::default()
    });
    let second = Arc::new(FakeAssistantApi {
        reply: "# second".to_string(),
        ..FakeAssistantApi::default()
    });
    let request = MeetingRequest::new("Weekly", "Status");

    service(first, output_dir.path())
        .run(&request, uploads_dir.path())
        .await
        .map_err(|f| f.error)?;
    service(second, output_dir.path())
        .run(&request, uploads_dir.path())
        .await
        .map_err(|f| f.error)?;

    let written = std::fs::read_to_string(output_dir.path().join("회의록_Weekly.txt"))?;
    assert_eq!(written, "# second");
    assert_eq!(std::fs::read_dir(output_dir.path())?.count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_run_still_releases_resources() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    upload_samples(uploads_dir.path())?;
    let api = Arc::new(FakeAssistantApi {
        run_status: "failed".to_string(),
        ..FakeAssistantApi::default()
    });

    let failure = service(Arc::clone(&api), output_dir.path())
        .run(&MeetingRequest::new("Q1 Planning", "Roadmap"), uploads_dir.path())
        .await
        .expect_err("run failure must surface");

    assert!(format!("{:#}", failure.error).contains("Generation failed"));
    assert!(failure.cleanup_errors.is_empty());
    assert_eq!(failure.log.state(), GenerationState::Idle);
    assert!(failure.log.history().contains(&GenerationState::CleaningUp));
    assert!(!failure.log.history().contains(&GenerationState::Persisting));

    assert_eq!(api.live_resources(), 0);
    assert_eq!(std::fs::read_dir(output_dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_failure_before_assistant_releases_uploads() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    upload_samples(uploads_dir.path())?;
    let api = Arc::new(FakeAssistantApi {
        fail_on: Some("create_file_batch"),
        ..FakeAssistantApi::default()
    });

    let failure = service(Arc::clone(&api), output_dir.path())
        .run(&MeetingRequest::new("Q1 Planning", "Roadmap"), uploads_dir.path())
        .await
        .expect_err("indexing failure must surface");

    assert!(format!("{:#}", failure.error).contains("create_file_batch failed"));
    // Uploaded files were never attached to the store but are still deleted
    assert_eq!(api.live_files(), 0);
    assert_eq!(api.live_vector_stores(), 0);
    assert!(!api.calls().contains(&"create_assistant".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_indexing_timeout_is_reported() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    upload_samples(uploads_dir.path())?;
    let api = Arc::new(FakeAssistantApi {
        batch_status: "in_progress".to_string(),
        ..FakeAssistantApi::default()
    });

    let failure = service(Arc::clone(&api), output_dir.path())
        .run(&MeetingRequest::new("Q1 Planning", "Roadmap"), uploads_dir.path())
        .await
        .expect_err("timeout must surface");

    assert!(format!("{:#}", failure.error).contains("Indexing did not finish"));
    assert_eq!(api.live_resources(), 0);
    Ok(())
}

#[tokio::test]
async fn test_failed_indexing_releases_resources() -> Result<()> {
    for status in ["failed", "cancelled"] {
        let uploads_dir = TempDir::new()?;
        let output_dir = TempDir::new()?;
        upload_samples(uploads_dir.path())?;
        let api = Arc::new(FakeAssistantApi {
            batch_status: status.to_string(),
            ..FakeAssistantApi::default()
        });

        let failure = service(Arc::clone(&api), output_dir.path())
            .run(&MeetingRequest::new("Q1 Planning", "Roadmap"), uploads_dir.path())
            .await
            .expect_err("indexing failure must surface");

        let message = format!("{:#}", failure.error);
        assert!(message.contains("Indexing failed"), "{}", message);
        assert!(message.contains(status), "{}", message);
        assert!(!api.calls().contains(&"create_assistant".to_string()));
        assert_eq!(api.live_resources(), 0);
        assert_eq!(failure.log.state(), GenerationState::Idle);
    }
    Ok(())
}

#[tokio::test]
async fn test_unbounded_poll_timeout_still_completes() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    upload_samples(uploads_dir.path())?;
    let api = Arc::new(FakeAssistantApi::new());
    let poll = PollPolicy {
        timeout: Duration::from_secs(u64::MAX),
        ..fast_poll()
    };

    let outcome = service_with_poll(Arc::clone(&api), output_dir.path(), poll)
        .run(&MeetingRequest::new("Q1 Planning", "Roadmap"), uploads_dir.path())
        .await
        .map_err(|f| f.error)?;

    assert!(matches!(outcome, MinutesOutcome::Completed(_)));
    assert_eq!(api.live_resources(), 0);
    Ok(())
}

#[tokio::test]
async fn test_cleanup_errors_keep_local_output() -> Result<()> {
    let uploads_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    upload_samples(uploads_dir.path())?;
    let api = Arc::new(FakeAssistantApi {
        fail_file_deletes: true,
        ..FakeAssistantApi::default()
    });

    let outcome = service(Arc::clone(&api), output_dir.path())
        .run(&MeetingRequest::new("Q1 Planning", "Roadmap"), uploads_dir.path())
        .await
        .map_err(|f| f.error)?;

    let done = match outcome {
        MinutesOutcome::Completed(done) => done,
        other => panic!("expected completion, got {:?}", other),
    };

    assert_eq!(done.cleanup_errors.len(), 2, "one error per file");
    assert!(done.output_path.exists());
    assert_eq!(done.log.state(), GenerationState::Done);
    // The rest of the cleanup still ran
    assert_eq!(api.live_vector_stores(), 0);
    assert_eq!(api.live_assistants(), 0);
    Ok(())
}
