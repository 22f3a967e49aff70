// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// [START speech_transcribe_batch_dynamic_batching_v2]
use crate::operations::LongRunning;
use cookbook_lro::{Poller, PollingOptions};
use cookbook_snippet::config;
use google_cloud_longrunning::model::Operation;
use google_cloud_speech_v2::client::Speech;
use google_cloud_speech_v2::model::{
    AutoDetectDecodingConfig, BatchRecognizeFileMetadata, BatchRecognizeResponse,
    InlineOutputConfig, RecognitionConfig, RecognitionOutputConfig, batch_recognize_request,
};

/// Transcribes an audio file stored in Cloud Storage.
///
/// Batch recognition is a long-running operation. The snippet starts the
/// operation, prints its name, and then polls until the transcript is ready.
#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    /// The audio file to transcribe.
    #[arg(default_value = "gs://cloud-samples-data/speech/hello.wav")]
    pub audio_uri: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let options = config::polling_options()?;
    let client = Speech::builder().build().await?;

    let operation = client
        .batch_recognize()
        .set_recognizer(format!(
            "projects/{}/locations/global/recognizers/_",
            args.project_id
        ))
        .set_files([BatchRecognizeFileMetadata::new().set_uri(args.audio_uri)])
        .set_recognition_output_config(
            RecognitionOutputConfig::new().set_inline_response_config(InlineOutputConfig::new()),
        )
        .set_processing_strategy(batch_recognize_request::ProcessingStrategy::DynamicBatching)
        .set_config(
            RecognitionConfig::new()
                .set_language_codes(["en-US"])
                .set_model("short")
                .set_auto_decoding_config(AutoDetectDecodingConfig::new()),
        )
        .send()
        .await?;
    println!("Long running operation started: {}", operation.name);

    let response = wait_for_response(&client, operation, options).await?;
    for transcript in transcripts(&response)? {
        println!("Transcript: {transcript}");
    }

    Ok(())
}
// [END speech_transcribe_batch_dynamic_batching_v2]

/// Polls `operation` until it completes.
///
/// Each poll is one `GetOperation` call. Errors embedded in the operation are
/// returned as [cookbook_lro::Error], with the details available via
/// [cookbook_lro::Error::operation_error].
pub async fn wait_for_response(
    client: &Speech,
    operation: Operation,
    options: PollingOptions,
) -> cookbook_lro::Result<BatchRecognizeResponse> {
    let client = client.clone();
    let query = move |name: String| {
        let client = client.clone();
        async move {
            client
                .get_operation()
                .set_name(name)
                .send()
                .await
                .map(LongRunning::<BatchRecognizeResponse>::from)
        }
    };
    cookbook_lro::new_poller_from_operation(options, LongRunning::from(operation), query)
        .until_done()
        .await
}

/// Extracts the transcripts from the response, ordered by file.
///
/// Fails if the service could not transcribe any of the files.
pub fn transcripts(response: &BatchRecognizeResponse) -> anyhow::Result<Vec<String>> {
    let mut files = response.results.iter().collect::<Vec<_>>();
    files.sort_by(|a, b| a.0.cmp(b.0));
    let mut transcripts = Vec::new();
    for (uri, result) in files {
        if let Some(status) = result.error.as_ref().filter(|s| s.code != 0) {
            anyhow::bail!("cannot transcribe {uri}: {}", status.message);
        }
        let alternatives = result
            .inline_result()
            .and_then(|r| r.transcript.as_ref())
            .into_iter()
            .flat_map(|t| t.results.iter())
            .flat_map(|r| r.alternatives.iter());
        transcripts.extend(alternatives.map(|a| a.transcript.clone()));
    }
    Ok(transcripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use google_cloud_rpc::model::Status;
    use google_cloud_speech_v2::model::{
        BatchRecognizeFileResult, BatchRecognizeResults, InlineResult, SpeechRecognitionAlternative,
        SpeechRecognitionResult,
    };

    fn file_result(transcript: &str) -> BatchRecognizeFileResult {
        let results = BatchRecognizeResults::new().set_results([SpeechRecognitionResult::new()
            .set_alternatives([SpeechRecognitionAlternative::new().set_transcript(transcript)])]);
        BatchRecognizeFileResult::new()
            .set_inline_result(InlineResult::new().set_transcript(results))
    }

    #[test]
    fn transcripts_by_file() -> anyhow::Result<()> {
        let response = BatchRecognizeResponse::new().set_results([
            ("gs://bucket/b.wav", file_result("world")),
            ("gs://bucket/a.wav", file_result("hello")),
        ]);
        let got = transcripts(&response)?;
        assert_eq!(got, vec!["hello", "world"]);
        Ok(())
    }

    #[test]
    fn transcripts_empty() -> anyhow::Result<()> {
        let got = transcripts(&BatchRecognizeResponse::new())?;
        assert!(got.is_empty(), "{got:?}");
        Ok(())
    }

    #[test]
    fn transcripts_error() {
        let failed = BatchRecognizeFileResult::new()
            .set_error(Status::default().set_code(3).set_message("unsupported encoding"));
        let response = BatchRecognizeResponse::new().set_results([
            ("gs://bucket/a.wav", file_result("hello")),
            ("gs://bucket/b.wav", failed),
        ]);
        let err = transcripts(&response).unwrap_err();
        assert!(err.to_string().contains("gs://bucket/b.wav"), "{err}");
        assert!(err.to_string().contains("unsupported encoding"), "{err}");
    }
}
