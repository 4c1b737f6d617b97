//! Subcommand implementations

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lipsync_core::FacialPose;
use lipsync_phoneme::FacialTargetTable;
use lipsync_timing::PronunciationDictionary;
use lipsync_track::{
    Easing, JawTrack, KeyframeTrack, LipsyncEngine, PipelineConfig, UtteranceRequest,
};

use crate::cli::{GenerateCommand, SampleCommand};
use crate::error::{CliError, CliResult};

/// Everything a generate request file may carry
#[derive(Debug, Clone, Deserialize)]
pub struct RequestFile {
    #[serde(flatten)]
    pub request: UtteranceRequest,
    #[serde(default)]
    pub config: PipelineConfig,
    /// Amplitude-derived jaw samples for word mode
    #[serde(default)]
    pub jaw: Option<JawTrack>,
    /// Syllabified pronunciations, word → syllables → phonemes
    #[serde(default)]
    pub pronunciations: HashMap<String, Vec<Vec<String>>>,
}

/// One sampled frame
#[derive(Debug, Clone, Serialize)]
pub struct SampledPose {
    pub time: f64,
    pub finished: bool,
    #[serde(flatten)]
    pub pose: FacialPose,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> CliResult<T> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply command line overrides on top of the file's configuration
pub fn effective_config(mut config: PipelineConfig, cmd: &GenerateCommand) -> PipelineConfig {
    if cmd.no_smoothing {
        config.smoothing.enabled = false;
    }
    if let Some(frames) = cmd.frames {
        config.smoothing.intermediate_frames = frames;
    }
    config
}

/// Build the track a request file describes
pub fn generate_track(file: RequestFile, config: PipelineConfig) -> CliResult<KeyframeTrack> {
    let engine = LipsyncEngine::new(FacialTargetTable::standard(), config);

    let track = if file.request.words.is_empty() {
        engine.generate(&file.request)?
    } else {
        let mut dictionary = PronunciationDictionary::new();
        for (word, syllables) in file.pronunciations {
            dictionary.insert(word, syllables);
        }
        debug!(entries = dictionary.len(), "word mode");
        engine.generate_from_words(&file.request, &dictionary, file.jaw.as_ref())?
    };
    Ok(track)
}

pub fn run_generate(cmd: &GenerateCommand, stdout: &mut dyn Write) -> CliResult<()> {
    let file: RequestFile = read_json(Path::new(&cmd.input))?;
    let config = effective_config(file.config.clone(), cmd);
    let track = generate_track(file, config)?;
    let json = track.to_json()?;

    match &cmd.output {
        Some(out) => {
            fs::write(out, json).map_err(|source| CliError::Write {
                path: out.into(),
                source,
            })?;
            info!(path = %out, keyframes = track.len(), "track written");
        }
        None => writeln!(stdout, "{json}")?,
    }
    Ok(())
}

/// Pose of a track at `time`
pub fn sample_track(track: &KeyframeTrack, time: f64, easing: Easing) -> SampledPose {
    SampledPose {
        time,
        finished: track.is_finished(time),
        pose: track.sample(time, easing),
    }
}

pub fn run_sample(cmd: &SampleCommand, stdout: &mut dyn Write) -> CliResult<()> {
    let track: KeyframeTrack = read_json(Path::new(&cmd.track))?;
    let sampled = sample_track(&track, cmd.time, cmd.easing);
    let json = serde_json::to_string_pretty(&sampled).map_err(|source| CliError::Json {
        path: cmd.track.clone().into(),
        source,
    })?;
    writeln!(stdout, "{json}")?;
    Ok(())
}
