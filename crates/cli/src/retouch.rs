use std::sync::Arc;

use anyhow::Context;
use atelier_core::prompt::BeautySelection;
use atelier_generation::download::download_image;
use atelier_generation::{
    GenerationConfig, GenerationEvent, GenerationOrchestrator, GenerationRequest, HttpJobApi,
    TaskPhase,
};
use tokio::sync::broadcast;

use crate::args::RetouchArgs;

pub async fn run(args: RetouchArgs) -> anyhow::Result<()> {
    let mut config = GenerationConfig::from_env()?;
    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }

    let mut selection = BeautySelection::new();
    for (category, id) in &args.options {
        selection.select_option(category, id)?;
    }

    let request = GenerationRequest {
        image_urls: args.images.clone(),
        selection,
        other_prompt: args.prompt.clone(),
        model_id: args.model.clone(),
        remaining_credits: args.credits,
    };

    let api = Arc::new(HttpJobApi::from_config(&config)?);
    let orchestrator = GenerationOrchestrator::new(api, config.poll_interval);
    let logger = tokio::spawn(log_events(orchestrator.subscribe()));

    let task_id = orchestrator.submit(&request).await?;
    println!("Task {task_id} submitted");

    let task = tokio::select! {
        task = orchestrator.wait_for_terminal() => task,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, cancelling generation");
            orchestrator.cancel().await;
            orchestrator.snapshot().await
        }
    };

    println!("Task {task_id} finished: {}", task.phase);
    for image in &task.images {
        println!("  {}", image.url);
    }

    if let (Some(dir), TaskPhase::Success) = (&args.out, task.phase) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for image in &task.images {
            let path = download_image(orchestrator.api().as_ref(), image, dir).await?;
            println!("Saved {}", path.display());
        }
    }

    orchestrator.shutdown().await;
    logger.abort();

    if task.phase != TaskPhase::Success {
        anyhow::bail!("Generation ended with status {}", task.phase);
    }
    Ok(())
}

async fn log_events(mut rx: broadcast::Receiver<GenerationEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => tracing::debug!(event = %json, "Generation event"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize generation event"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Generation event log lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
