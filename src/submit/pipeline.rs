use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::join_all;
use tokio::task;

use crate::export;
use crate::submit::{
    dependencies::SubmitDependencies,
    types::{LabelCard, SubmitError, SubmitRequest, SubmitResult},
};
use crate::util::label_to_words;

/// Classifies a drawing and illustrates every returned label.
///
/// A prediction failure fails the whole submission. Lookups for individual
/// labels run concurrently; a label whose image search fails or comes back
/// empty is logged and left out, the others are still returned in label order.
pub(crate) async fn perform_submission(
    request: SubmitRequest,
    dependencies: Arc<SubmitDependencies>,
) -> Result<SubmitResult, SubmitError> {
    log::info!("Submitting drawing ({} byte payload)", request.data_url.len());

    let labels = dependencies.predictor.predict(&request.data_url).await?;
    log::info!("Prediction returned {} labels: {:?}", labels.len(), labels);

    let speech_dir = request.speech_dir.as_deref();
    let cards = join_all(
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| enrich_label(index, label, &dependencies, speech_dir)),
    )
    .await
    .into_iter()
    .flatten()
    .collect();

    Ok(SubmitResult { labels, cards })
}

async fn enrich_label(
    index: usize,
    label: &str,
    dependencies: &SubmitDependencies,
    speech_dir: Option<&Path>,
) -> Option<LabelCard> {
    let words = label_to_words(label);

    let image_url = match &dependencies.image_search {
        Some(search) => match search.find_image(&words).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                log::warn!("No picture found for '{}'", words);
                return None;
            }
            Err(err) => {
                log::error!("Image search for '{}' failed: {}", words, err);
                return None;
            }
        },
        None => None,
    };

    let speech_url = match dependencies.speech.speech_url(&words) {
        Ok(url) => url,
        Err(err) => {
            log::error!("Could not build speech link for '{}': {}", words, err);
            return None;
        }
    };

    let speech_file = match speech_dir {
        Some(dir) => {
            let path = dir.join(speech_file_name(index, label));
            match fetch_speech_to(dependencies, &speech_url, path.clone()).await {
                Ok(()) => Some(path),
                Err(err) => {
                    log::warn!("Speech download for '{}' failed: {}", words, err);
                    None
                }
            }
        }
        None => None,
    };

    Some(LabelCard {
        label: label.to_string(),
        words,
        image_url,
        speech_url,
        speech_file,
    })
}

/// File name for a label's clip, prefixed with its rank so labels that
/// sanitize to the same stem never share a file.
fn speech_file_name(index: usize, label: &str) -> String {
    let stem: String = label
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        format!("{:02}.mp3", index + 1)
    } else {
        format!("{:02}_{stem}.mp3", index + 1)
    }
}

async fn fetch_speech_to(
    dependencies: &SubmitDependencies,
    url: &url::Url,
    path: PathBuf,
) -> Result<(), SubmitError> {
    let audio = dependencies.speech.fetch_speech(url).await?;
    let size = audio.len();
    let saved = path.clone();
    task::spawn_blocking(move || export::write_file(&path, &audio))
        .await
        .map_err(|e| {
            SubmitError::Save(std::io::Error::other(format!("Save task failed: {e}")))
        })??;
    log::debug!("Saved speech clip {} ({} bytes)", saved.display(), size);
    Ok(())
}
