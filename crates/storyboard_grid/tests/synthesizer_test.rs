// Primary/fallback behavior of the grid synthesizer.

mod test_utils;

use storyboard_core::GenerationConfig;
use storyboard_error::{GenerationErrorKind, StoryboardResult};
use storyboard_grid::{GridSynthesizer, PortraitKind, SceneRequest};
use storyboard_interface::ApiAccess;
use test_utils::{MockImageGenerator, MockResponse, test_grid};

fn scene() -> SceneRequest {
    SceneRequest::builder()
        .prompt("Scene: a storm over the harbor")
        .style("ink wash")
        .variations(vec!["wide".to_string(); 9])
        .build()
        .unwrap()
}

fn synthesizer(responses: Vec<MockResponse>) -> GridSynthesizer<MockImageGenerator> {
    GridSynthesizer::new(
        MockImageGenerator::new_sequence(responses),
        &GenerationConfig::default(),
        ApiAccess::granted(),
    )
}

#[tokio::test]
async fn test_primary_success_makes_one_call() -> StoryboardResult<()> {
    let grid = test_grid();
    let synth = synthesizer(vec![MockResponse::Image(grid.clone())]);

    let image = synth.synthesize(&scene()).await?;

    assert_eq!(image, grid);
    assert_eq!(synth.generator().call_count(), 1);
    assert_eq!(
        synth.generator().models(),
        vec![GenerationConfig::default().primary_image_model]
    );
    Ok(())
}

#[tokio::test]
async fn test_permission_error_falls_back_exactly_once() -> StoryboardResult<()> {
    let grid = test_grid();
    let synth = synthesizer(vec![
        MockResponse::Error(GenerationErrorKind::PermissionDenied("no access".into())),
        MockResponse::Image(grid.clone()),
    ]);

    let image = synth.synthesize(&scene()).await?;

    let config = GenerationConfig::default();
    assert_eq!(image, grid);
    assert_eq!(
        synth.generator().models(),
        vec![config.primary_image_model, config.fallback_image_model]
    );
    assert!(synth.access().has_access());
    Ok(())
}

#[tokio::test]
async fn test_fallback_error_is_returned_verbatim() {
    let synth = synthesizer(vec![
        MockResponse::Error(GenerationErrorKind::RateLimited("primary quota".into())),
        MockResponse::Error(GenerationErrorKind::RateLimited("fallback quota".into())),
        MockResponse::Image(test_grid()),
    ]);

    let err = synth.synthesize(&scene()).await.unwrap_err();

    assert_eq!(
        err.generation_kind(),
        Some(&GenerationErrorKind::RateLimited("fallback quota".into()))
    );
    assert_eq!(synth.generator().call_count(), 2);
    assert!(synth.access().has_access());
}

#[tokio::test]
async fn test_permission_denied_on_fallback_revokes_access() {
    let synth = synthesizer(vec![
        MockResponse::Error(GenerationErrorKind::Api {
            status_code: 500,
            message: "overloaded".into(),
        }),
        MockResponse::Error(GenerationErrorKind::PermissionDenied("billing".into())),
    ]);

    let err = synth.synthesize(&scene()).await.unwrap_err();

    assert!(err.generation_kind().unwrap().is_permission_denied());
    assert!(!synth.access().has_access());

    // Further calls are refused without touching the service
    let err = synth.synthesize(&scene()).await.unwrap_err();
    assert_eq!(err.generation_kind(), Some(&GenerationErrorKind::AccessRevoked));
    assert_eq!(synth.generator().call_count(), 2);

    synth.access().grant();
    assert!(synth.access().has_access());
}

#[tokio::test]
async fn test_text_only_responses_yield_no_image() {
    let synth = synthesizer(vec![
        MockResponse::TextOnly("I can't draw that".into()),
        MockResponse::TextOnly("Still can't".into()),
    ]);

    let err = synth.synthesize(&scene()).await.unwrap_err();

    assert_eq!(err.generation_kind(), Some(&GenerationErrorKind::NoImage));
    assert_eq!(synth.generator().call_count(), 2);
}

#[tokio::test]
async fn test_portrait_uses_same_fallback_policy() -> StoryboardResult<()> {
    let grid = test_grid();
    let synth = synthesizer(vec![
        MockResponse::TextOnly("refused".into()),
        MockResponse::Image(grid.clone()),
    ]);

    let image = synth
        .synthesize_portrait(PortraitKind::Character, "a tall sailor", "ink wash")
        .await?;

    assert_eq!(image, grid);
    assert_eq!(synth.generator().call_count(), 2);
    Ok(())
}
